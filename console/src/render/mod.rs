//! Markup rendering for the log stream and the dashboard sections

pub mod log_templates;
pub mod sections;

/// Escape text for inclusion in HTML element content or attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text and turn each newline into a line break
pub fn newline_to_break(s: &str) -> String {
    html_escape(s).replace('\n', "\n<br/>")
}
