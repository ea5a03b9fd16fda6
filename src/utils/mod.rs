use anyhow::{anyhow, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Local, NaiveDate, Utc};
use std::path::Path;

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

pub fn today_iso() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

pub fn iso_date_in_days(days: i64) -> String {
    (Local::now() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// Human-readable number, user-editable afterwards and not guaranteed unique.
pub fn document_number(prefix: &str) -> String {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, tag[..4].to_uppercase())
}

// Malformed numeric edits degrade to zero instead of surfacing a parse
// error; negative input clamps to zero as well since every numeric field in
// the document model is non-negative.
pub fn parse_decimal_or_zero(value: &str) -> f64 {
    value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
        .unwrap_or(0.0)
}

pub fn parse_quantity_or_zero(value: &str) -> u32 {
    value.trim().parse::<i64>().map(|v| v.max(0) as u32).unwrap_or(0)
}

pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn normalize_date(value: &str) -> String {
    let raw = value.trim();
    if raw.is_empty() {
        return String::new();
    }

    let formats = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d", "%Y.%m.%d"];
    for fmt in formats.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw.to_string()
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// Escapes and keeps line breaks for multi-line fields (addresses, terms,
// bank details).
pub fn multiline_html(value: &str) -> String {
    escape_html(value).replace('\n', "<br />")
}

pub fn encode_mailto_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

pub const MAX_LOGO_BYTES: u64 = 500_000;

pub fn logo_data_url(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > MAX_LOGO_BYTES {
        return Err(anyhow!("Logo file exceeds 500KB"));
    }

    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => return Err(anyhow!("Unsupported image type")),
    };

    let bytes = std::fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_decimals_degrade_to_zero() {
        assert_eq!(parse_decimal_or_zero("12.5"), 12.5);
        assert_eq!(parse_decimal_or_zero("12,5"), 12.5);
        assert_eq!(parse_decimal_or_zero("abc"), 0.0);
        assert_eq!(parse_decimal_or_zero(""), 0.0);
        assert_eq!(parse_decimal_or_zero("-3"), 0.0);
        assert_eq!(parse_decimal_or_zero("NaN"), 0.0);
    }

    #[test]
    fn malformed_quantities_degrade_to_zero() {
        assert_eq!(parse_quantity_or_zero("4"), 4);
        assert_eq!(parse_quantity_or_zero(" 7 "), 7);
        assert_eq!(parse_quantity_or_zero("two"), 0);
        assert_eq!(parse_quantity_or_zero("-2"), 0);
        assert_eq!(parse_quantity_or_zero("3.5"), 0);
    }

    #[test]
    fn decimal_display_is_two_fixed_places() {
        assert_eq!(format_decimal(255.0), "255.00");
        assert_eq!(format_decimal(0.1), "0.10");
    }

    #[test]
    fn dates_normalize_to_iso() {
        assert_eq!(normalize_date("2026-03-01"), "2026-03-01");
        assert_eq!(normalize_date("01.03.2026"), "2026-03-01");
        assert_eq!(normalize_date("01/03/2026"), "2026-03-01");
        assert_eq!(normalize_date("sometime soon"), "sometime soon");
        assert_eq!(normalize_date("  "), "");
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(multiline_html("a\nb"), "a<br />b");
    }

    #[test]
    fn mailto_components_are_percent_encoded() {
        assert_eq!(encode_mailto_component("INV 42"), "INV%2042");
        assert_eq!(encode_mailto_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_mailto_component("plain-text_1.0~ok"), "plain-text_1.0~ok");
    }

    #[test]
    fn document_numbers_carry_the_kind_prefix() {
        let number = document_number("INV");
        assert!(number.starts_with("INV-"));
        assert_eq!(number.len(), "INV-".len() + 4);
    }
}
