//! Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// CSS-safe class suffix: lowercase, spaces to dashes.
///
/// Usage in templates: `class="badge status-{{ row.status|slug }}"`
#[askama::filter_fn]
pub fn slug(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(css_slug(&value.to_string()))
}

fn css_slug(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Year shown in the footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_slug() {
        assert_eq!(css_slug("Delivered"), "delivered");
        assert_eq!(css_slug(" In  Transit "), "in-transit");
    }
}
