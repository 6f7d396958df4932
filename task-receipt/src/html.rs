//! HTML receipt preview
//!
//! Renders a receipt as a fixed-size HTML page (72mm x 75mm at 2x, the
//! printable area of an 80mm roll) for checking layout in a browser.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::receipt::Priority;

/// 72mm at 96 DPI, rendered at 2x
pub const RECEIPT_WIDTH_PX: u32 = 544;
/// 75mm at 96 DPI, rendered at 2x
pub const RECEIPT_HEIGHT_PX: u32 = 567;
/// Hard character limit for the description
pub const DESCRIPTION_CHAR_LIMIT: usize = 550;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the complete HTML page for a receipt
///
/// The description is cut to [`DESCRIPTION_CHAR_LIMIT`] characters first.
pub fn build_html(title: &str, description: &str, priority: Priority, timestamp: &str) -> String {
    let description: String = description.chars().take(DESCRIPTION_CHAR_LIMIT).collect();
    let title = escape(title);
    let description = escape(&description);
    let timestamp = escape(timestamp);
    let priority_label = priority.label();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}

    body {{
      font-family: 'Courier New', Courier, monospace;
      background: white;
      width: {RECEIPT_WIDTH_PX}px;
      height: {RECEIPT_HEIGHT_PX}px;
      overflow: hidden;
      padding: 16px 18px;
      display: flex;
      flex-direction: column;
      justify-content: space-between;
    }}

    .border {{ border-top: 2px solid black; }}

    .title {{
      font-size: 34px;
      font-weight: bold;
      text-align: center;
      text-transform: uppercase;
      letter-spacing: 2px;
      padding: 8px 0;
    }}

    .priority {{ font-size: 16px; text-align: center; letter-spacing: 1px; padding: 6px 0; }}

    .description {{
      flex: 1;
      display: flex;
      align-items: center;
      justify-content: center;
      padding: 8px 0;
      overflow: hidden;
    }}

    .description p {{
      font-size: 20px;
      line-height: 1.45;
      text-align: center;
      word-wrap: break-word;
      width: 100%;
    }}

    .timestamp {{ font-size: 14px; text-align: center; color: #555; padding: 6px 0; }}
  </style>
</head>
<body>
  <div>
    <div class="border"></div>
    <div class="title">{title}</div>
    <div class="border"></div>
    <div class="priority">PRIORITY: {priority_label}</div>
    <div class="border"></div>
  </div>

  <div class="description"><p>{description}</p></div>

  <div>
    <div class="border"></div>
    <div class="timestamp">{timestamp}</div>
    <div class="border"></div>
  </div>
</body>
</html>
"#
    )
}

/// Write the receipt HTML to a file
#[instrument(skip(title, description))]
pub fn save_html(
    path: &Path,
    title: &str,
    description: &str,
    priority: Priority,
    timestamp: &str,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, build_html(title, description, priority, timestamp))?;
    debug!("html preview written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_html_contents() {
        let html = build_html("Buy Groceries", "milk & eggs", Priority::Low, "2024-05-01  09:30");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="title">Buy Groceries</div>"#));
        assert!(html.contains("PRIORITY: LOW"));
        assert!(html.contains("<p>milk &amp; eggs</p>"));
        assert!(html.contains("width: 544px;"));
        assert!(html.contains("height: 567px;"));
        assert!(html.contains("2024-05-01  09:30"));
    }

    #[test]
    fn test_description_truncated() {
        let long = "z".repeat(DESCRIPTION_CHAR_LIMIT + 100);
        let html = build_html("t", &long, Priority::FutureBreakdown, "now");

        let expected = format!("<p>{}</p>", "z".repeat(DESCRIPTION_CHAR_LIMIT));
        assert!(html.contains(&expected));
        assert!(html.contains("PRIORITY: FUTURE / BREAKDOWN"));
    }

    #[test]
    fn test_markup_is_escaped() {
        let html = build_html("<script>", "a<b", Priority::High, "now");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&lt;b"));
    }

    #[test]
    fn test_save_html_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview").join("receipt.html");

        save_html(&path, "t", "d", Priority::Medium, "now").unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("PRIORITY: MEDIUM"));
    }
}
