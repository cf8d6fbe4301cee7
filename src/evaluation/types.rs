// src/evaluation/types.rs
use serde::{Deserialize, Serialize};

/// Scored report returned by the evaluation service.
///
/// The service sends an empty `match_breakdown` when either document has no
/// usable text, so every nested field falls back to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub overall_score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub match_breakdown: MatchBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(default)]
    pub skills_and_keywords: SkillsAndKeywords,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsAndKeywords {
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Moderate,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            ScoreBand::Strong
        } else if score > 40.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong match",
            ScoreBand::Moderate => "moderate match",
            ScoreBand::Low => "low match",
        }
    }
}

impl EvaluationResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.overall_score)
    }

    pub fn matched_keywords(&self) -> &[String] {
        &self.match_breakdown.skills_and_keywords.matched_keywords
    }

    pub fn missing_keywords(&self) -> &[String] {
        &self.match_breakdown.skills_and_keywords.missing_keywords
    }
}
