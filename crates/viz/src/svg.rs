//! Text helpers for SVG and HTML output.

/// Escape HTML special characters to prevent markup injection.
#[must_use]
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A coordinate with at most two decimals and no trailing zeros.
#[must_use]
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// A percentage with one decimal, as shown in tooltips.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// A signed percentage with one decimal: `+3.2%`, `-1.0%`.
#[must_use]
pub fn signed_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}
