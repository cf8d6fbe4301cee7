// src/evaluation/report.rs
//! Plain-text rendering of an evaluation result

use std::fmt;

use super::types::EvaluationResult;

pub const NO_MATCHED_KEYWORDS: &str = "No keywords matched.";
pub const NO_MISSING_KEYWORDS: &str = "All key skills were found!";

/// Score as displayed: the service value verbatim followed by `%`.
pub fn format_percentage(score: f64) -> String {
    format!("{}%", score)
}

/// Keywords as chips, in service order: `[rust] [tokio]`.
pub fn format_chips(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("[{}]", k))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display adapter for a result.
pub struct Report<'a>(pub &'a EvaluationResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "Evaluation Report")?;
        writeln!(f, "=================")?;
        writeln!(
            f,
            "{} ({})",
            format_percentage(result.overall_score),
            result.band().label()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", result.summary)?;
        writeln!(f)?;

        writeln!(f, "Matched Keywords/Skills:")?;
        writeln!(
            f,
            "  {}",
            chips_or(result.matched_keywords(), NO_MATCHED_KEYWORDS)
        )?;
        writeln!(f)?;

        writeln!(f, "Missing Keywords/Skills:")?;
        writeln!(
            f,
            "  {}",
            chips_or(result.missing_keywords(), NO_MISSING_KEYWORDS)
        )?;
        writeln!(f)?;

        writeln!(f, "Additional Feedback:")?;
        writeln!(f, "  {}", result.match_breakdown.feedback)
    }
}

pub fn render_report(result: &EvaluationResult) -> String {
    Report(result).to_string()
}

fn chips_or(keywords: &[String], empty: &str) -> String {
    if keywords.is_empty() {
        empty.to_string()
    } else {
        format_chips(keywords)
    }
}
