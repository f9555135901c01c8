//! Report exporter
//!
//! Renders a finished rewrite as a standalone HTML page: original and result
//! side by side, analysis underneath, styling inlined. Texts are inserted
//! exactly as given.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// MIME type of the exported document
pub const MIME_TYPE: &str = "text/html";

/// A report ready to be rendered and downloaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub original: String,
    pub result: String,
    pub analysis: String,
}

impl Report {
    pub fn new(
        title: impl Into<String>,
        original: impl Into<String>,
        result: impl Into<String>,
        analysis: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            original: original.into(),
            result: result.into(),
            analysis: analysis.into(),
        }
    }

    /// Download name offered to the browser
    pub fn file_name(&self) -> String {
        format!("{}.html", self.title)
    }

    pub fn render(&self) -> String {
        render_html(&self.title, &self.original, &self.result, &self.analysis)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        render(&self.title, &self.original, &self.result, &self.analysis)
    }

    /// `data:` URL carrying the rendered document, for a download link
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", MIME_TYPE, STANDARD.encode(self.render()))
    }
}

/// Render the report document
pub fn render(title: &str, original: &str, result: &str, analysis: &str) -> Vec<u8> {
    render_html(title, original, result, analysis).into_bytes()
}

fn render_html(title: &str, original: &str, result: &str, analysis: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{font-family: Arial, sans-serif; padding: 20px; background-color: #F0F4F8; color: #2C3E50; line-height: 1.6;}}
h1 {{color: #3498DB; text-align: center;}}
h2 {{color: #2C3E50; margin-top: 40px;}}
.container {{display: flex; justify-content: space-between; margin-top: 20px;}}
.text-box {{width: 48%; padding: 15px; background-color: white; border: 1px solid #ddd; border-radius: 8px;}}
pre {{font-size: 14px; white-space: pre-wrap; word-wrap: break-word;}}
.original {{background-color: #eef4ff;}}
.modified {{background-color: #eaf3e8;}}
.analysis {{margin-top: 20px; padding: 15px; background-color: #fff3cd; border-radius: 8px; color: #856404;}}
</style>
</head>
<body>
<h1>{title}</h1>
<div class="container">
    <div class="text-box original">
        <h2>Original Text</h2>
        <pre>{original}</pre>
    </div>
    <div class="text-box modified">
        <h2>Modified Text</h2>
        <pre>{result}</pre>
    </div>
</div>
<div class="analysis">
    <h2>Analysis</h2>
    <pre>{analysis}</pre>
</div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_parts_verbatim() {
        let html = String::from_utf8(render("T", "A", "B", "C")).unwrap();
        assert!(html.contains("<h1>T</h1>"));
        assert!(html.contains("<pre>A</pre>"));
        assert!(html.contains("<pre>B</pre>"));
        assert!(html.contains("<pre>C</pre>"));
        assert!(html.contains("<title>T</title>"));
    }

    #[test]
    fn test_render_has_no_external_resources() {
        let html = Report::new("T", "A", "B", "C").render();
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("src="));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_multiline_text_is_untouched() {
        let original = "line one\n  indented & <em>marked</em>";
        let html = Report::new("T", original, "B", "C").render();
        assert!(html.contains(&format!("<pre>{original}</pre>")));
    }

    #[test]
    fn test_file_name_and_data_url() {
        let report = Report::new("Text Neutralization Report", "A", "B", "C");
        assert_eq!(report.file_name(), "Text Neutralization Report.html");

        let url = report.data_url();
        let encoded = url.strip_prefix("data:text/html;base64,").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, report.to_bytes());
    }
}
