// src/utils.rs
use std::path::Path;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Content type a browser would report for a picked file, by extension.
pub fn content_type_for_file_name(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("docx") => DOCX_CONTENT_TYPE,
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        Some("rtf") => "application/rtf",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Media type without parameters, lowercased: `Application/PDF; x=y` -> `application/pdf`.
pub fn content_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}
