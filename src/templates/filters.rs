//! Tera filters available to AMP templates

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use tera::{try_get_value, Result, Value};

lazy_static! {
    static ref SCRIPT: Regex = Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap();
    static ref STYLE_ATTR: Regex = Regex::new(r#"(?i)\s+style\s*=\s*("[^"]*"|'[^']*')"#).unwrap();
    static ref IMG: Regex = Regex::new(r"(?i)<img\b([^>]*?)\s*/?>").unwrap();
    static ref IFRAME: Regex = Regex::new(r"(?is)<iframe\b([^>]*)>.*?</iframe>").unwrap();
    static ref WIDTH: Regex = Regex::new(r"(?i)\swidth\s*=").unwrap();
    static ref HEIGHT: Regex = Regex::new(r"(?i)\sheight\s*=").unwrap();
}

/// Size given to embeds whose source tag carries none
const DEFAULT_WIDTH: u32 = 600;
const DEFAULT_HEIGHT: u32 = 400;

const IFRAME_SANDBOX: &str = "allow-scripts allow-same-origin";

/// Strip HTML tags
pub fn strip_html(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let s = try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(Value::String(result))
}

/// Truncate by character count, `length` defaults to 150
pub fn truncate_chars(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let s = try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    if s.chars().count() <= length {
        return Ok(Value::String(s));
    }
    let truncated: String = s.chars().take(length).collect();
    Ok(Value::String(format!("{}{}", truncated.trim_end(), omission)))
}

/// Format a serialized post date
///
/// `format` takes `LL` ("May 30, 2023"), `YYYY-MM-DD`, `iso` or a chrono
/// strftime string.
pub fn date_format(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let s = try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    let date = match DateTime::parse_from_rfc3339(&s) {
        Ok(dt) => dt,
        Err(_) => match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            Ok(d) => return Ok(Value::String(format_naive(&d, &format))),
            Err(_) => return Ok(Value::String(s)),
        },
    };

    let formatted = match format.as_str() {
        "iso" => date.to_rfc3339(),
        "LL" => date.format("%B %d, %Y").to_string(),
        "YYYY-MM-DD" => date.format("%Y-%m-%d").to_string(),
        other => date.format(other).to_string(),
    };
    Ok(Value::String(formatted))
}

fn format_naive(date: &NaiveDate, format: &str) -> String {
    match format {
        "LL" => date.format("%B %d, %Y").to_string(),
        "iso" | "YYYY-MM-DD" => date.format("%Y-%m-%d").to_string(),
        other => date.format(other).to_string(),
    }
}

/// Rewrite post HTML into AMP-valid markup
///
/// Scripts and inline styles are not allowed in AMP documents; images and
/// iframes have AMP element equivalents.
pub fn amp_content(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let html = try_get_value!("amp_content", "value", String, value);

    let html = SCRIPT.replace_all(&html, "");
    let html = STYLE_ATTR.replace_all(&html, "");
    let html = IMG.replace_all(&html, |caps: &Captures| {
        format!(
            r#"<amp-img{} layout="responsive"></amp-img>"#,
            with_dimensions(&caps[1])
        )
    });
    let html = IFRAME.replace_all(&html, |caps: &Captures| {
        format!(
            r#"<amp-iframe{} layout="responsive" sandbox="{}"></amp-iframe>"#,
            with_dimensions(&caps[1]),
            IFRAME_SANDBOX
        )
    });

    Ok(Value::String(html.into_owned()))
}

/// The responsive layout needs both `width` and `height`
fn with_dimensions(attrs: &str) -> String {
    let mut attrs = attrs.to_string();
    if !WIDTH.is_match(&attrs) {
        attrs.push_str(&format!(r#" width="{}""#, DEFAULT_WIDTH));
    }
    if !HEIGHT.is_match(&attrs) {
        attrs.push_str(&format!(r#" height="{}""#, DEFAULT_HEIGHT));
    }
    attrs
}

/// Encode a value as JSON that is safe inside a `<script>` element
pub fn json_script(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let json = serde_json::to_string(value)
        .map_err(|e| tera::Error::msg(format!("json_script: {}", e)))?;
    let json = json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026");
    Ok(Value::String(json))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(filter: fn(&Value, &HashMap<String, Value>) -> Result<Value>, input: &str) -> String {
        filter(&Value::String(input.to_string()), &HashMap::new())
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(apply(strip_html, "<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_truncate_chars() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), Value::from(5));
        let out = truncate_chars(&Value::String("Hello world".into()), &args).unwrap();
        assert_eq!(out, Value::String("Hello...".into()));
        assert_eq!(apply(truncate_chars, "short"), "short");
    }

    #[test]
    fn test_date_format() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), Value::from("LL"));
        let out = date_format(&Value::String("2023-05-30T10:00:00+02:00".into()), &args).unwrap();
        assert_eq!(out, Value::String("May 30, 2023".into()));

        assert_eq!(apply(date_format, "2023-05-30T10:00:00+02:00"), "2023-05-30");
        assert_eq!(apply(date_format, "not a date"), "not a date");
    }

    #[test]
    fn test_amp_content_rewrites_images() {
        let out = apply(amp_content, r#"<p><img src="a.png" alt="A"/></p>"#);
        assert_eq!(
            out,
            r#"<p><amp-img src="a.png" alt="A" width="600" height="400" layout="responsive"></amp-img></p>"#
        );
    }

    #[test]
    fn test_amp_content_keeps_image_dimensions() {
        let out = apply(amp_content, r#"<img src="a.png" width="320" height="240">"#);
        assert_eq!(
            out,
            r#"<amp-img src="a.png" width="320" height="240" layout="responsive"></amp-img>"#
        );

        let out = apply(amp_content, r#"<img src="a.png" width="320">"#);
        assert!(out.contains(r#"width="320" height="400""#));
    }

    #[test]
    fn test_json_script_escapes_markup() {
        let title = r#"Say "hi" </script> & more"#;
        let out = json_script(&Value::from(title), &HashMap::new()).unwrap();
        let out = out.as_str().unwrap();
        assert_eq!(out, r#""Say \"hi\" \u003c/script\u003e \u0026 more""#);
        let back: String = serde_json::from_str(out).unwrap();
        assert_eq!(back, title);
    }

    #[test]
    fn test_amp_content_drops_scripts_and_styles() {
        let out = apply(
            amp_content,
            r#"<p style="color: red">Hi</p><script>alert(1)</script>"#,
        );
        assert_eq!(out, "<p>Hi</p>");
    }

    #[test]
    fn test_amp_content_rewrites_iframes() {
        let out = apply(
            amp_content,
            r#"<iframe src="https://example.com/embed"></iframe>"#,
        );
        assert!(out.starts_with(
            r#"<amp-iframe src="https://example.com/embed" width="600" height="400" layout="responsive""#
        ));
        assert!(out.ends_with("</amp-iframe>"));
    }
}
