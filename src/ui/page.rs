//! Server-rendered pages
//!
//! The whole UI is one page drawn from the session: the credential form while
//! unauthenticated, otherwise the tool sidebar, the selected tool's form and
//! the last outcome.

use crate::core::constants::{APP_NAME, message};
use crate::session::{NoticeLevel, Session, SessionState};
use crate::tools::ToolKind;
use crate::tools::params::{
    ComplexityLevel, Culture, CulturalContext, Demographic, EmotionIntensity, Perspective,
    ScenarioContext, Sentiment, SocioEconomic, SourceLeaning, ToolParams, VariableParams,
};
use crate::ui::branding::Branding;
use std::fmt::Write;

const STYLE: &str = "body{font-family:Arial,sans-serif;margin:0;color:#2C3E50;background:#F0F4F8}\
.layout{display:flex;min-height:100vh}\
.sidebar{width:280px;padding:20px;background:#fff;border-right:1px solid #ddd}\
.main{flex:1;padding:20px 40px}\
textarea{width:100%;min-height:220px;font-family:inherit}\
label{display:block;margin-top:10px}\
pre{white-space:pre-wrap;word-wrap:break-word;background:#fff;padding:12px;border-radius:6px}\
.notice{padding:10px 14px;border-radius:6px;margin:12px 0}\
.info{background:#e7f1fb}.success{background:#e6f4ea}.warning{background:#fff3cd}.error{background:#f8d7da}\
button{margin-top:12px}";

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the page for `session`
pub fn render(session: &Session, branding: &Branding) -> String {
    let mut sidebar = String::new();
    let mut main = String::new();

    write_branding(&mut main, branding);

    match session.state() {
        SessionState::Unauthenticated => {
            write_credential_form(&mut sidebar);
            write_notice(&mut main, NoticeLevel::Warning, message::MISSING_CREDENTIAL);
            if let Some(notice) = session
                .notice
                .as_ref()
                .filter(|notice| notice.text != message::MISSING_CREDENTIAL)
            {
                write_notice(&mut main, notice.level, &notice.text);
            }
        }
        SessionState::Ready => {
            write_notice(&mut sidebar, NoticeLevel::Success, message::CREDENTIAL_SET);
            write_tool_selector(&mut sidebar, session.selected_tool);
            write_session_actions(&mut sidebar);

            if let Some(fact) = session.fun_fact {
                write_notice(&mut main, NoticeLevel::Info, fact);
            }
            write_tool_form(&mut main, session);
            if let Some(notice) = &session.notice {
                write_notice(&mut main, notice.level, &notice.text);
            }
            write_outcome(&mut main, session);
        }
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{app}</title>\n\
<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"layout\">\n\
<aside class=\"sidebar\">\n{sidebar}</aside>\n\
<main class=\"main\">\n<h1>{app}</h1>\n{main}</main>\n</div>\n</body>\n</html>\n",
        app = escape(APP_NAME),
    )
}

fn write_branding(out: &mut String, branding: &Branding) {
    if branding.logo.is_some() {
        let _ = writeln!(
            out,
            "<img src=\"/branding/logo\" alt=\"logo\" width=\"{}\">",
            branding.width
        );
    } else {
        write_notice(out, NoticeLevel::Warning, message::LOGO_MISSING);
    }
}

fn write_notice(out: &mut String, level: NoticeLevel, text: &str) {
    let class = match level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    let _ = writeln!(out, "<div class=\"notice {class}\">{}</div>", escape(text));
}

fn write_credential_form(out: &mut String) {
    out.push_str(
        "<h2>API Key Configuration</h2>\n\
<form method=\"post\" action=\"/session/credential\">\n\
<label for=\"api_key\">Enter your OpenAI API Key:</label>\n\
<input type=\"password\" id=\"api_key\" name=\"api_key\" autocomplete=\"off\">\n\
<button type=\"submit\">Save key</button>\n</form>\n",
    );
}

fn write_tool_selector(out: &mut String, selected: ToolKind) {
    out.push_str(
        "<form method=\"post\" action=\"/session/tool\">\n\
<label for=\"tool\">Select a Tool</label>\n<select id=\"tool\" name=\"tool\">\n",
    );
    for kind in ToolKind::ALL {
        let marker = if *kind == selected { " selected" } else { "" };
        let _ = writeln!(
            out,
            "<option value=\"{}\"{marker}>{}</option>",
            kind.slug(),
            escape(kind.name())
        );
    }
    out.push_str("</select>\n<button type=\"submit\">Open</button>\n</form>\n");
}

fn write_session_actions(out: &mut String) {
    out.push_str(
        "<form method=\"post\" action=\"/session/clear\"><button type=\"submit\">Clear All</button></form>\n\
<form method=\"post\" action=\"/session/fun-fact\"><button type=\"submit\">Show Fun Fact</button></form>\n\
<form method=\"post\" action=\"/session/end\"><button type=\"submit\">End Session</button></form>\n",
    );
}

fn write_select<T: Copy + PartialEq>(
    out: &mut String,
    field: &str,
    label: &str,
    options: &[T],
    selected: T,
    name_of: impl Fn(T) -> &'static str,
) {
    let _ = writeln!(
        out,
        "<label for=\"{field}\">{}</label>\n<select id=\"{field}\" name=\"{field}\">",
        escape(label)
    );
    for option in options {
        let name = escape(name_of(*option));
        let marker = if *option == selected { " selected" } else { "" };
        let _ = writeln!(out, "<option value=\"{name}\"{marker}>{name}</option>");
    }
    out.push_str("</select>\n");
}

fn write_controls(out: &mut String, params: &ToolParams) {
    match params {
        ToolParams::WhatIf(p) => {
            write_select(
                out,
                Sentiment::FIELD,
                "Sentiment:",
                Sentiment::ALL,
                p.sentiment,
                Sentiment::label,
            );
            write_select(
                out,
                ScenarioContext::FIELD,
                "Context:",
                ScenarioContext::ALL,
                p.context,
                ScenarioContext::label,
            );
            write_select(
                out,
                SourceLeaning::FIELD,
                "Source:",
                SourceLeaning::ALL,
                p.source,
                SourceLeaning::label,
            );
            write_select(
                out,
                Demographic::FIELD,
                "Demographic:",
                Demographic::ALL,
                p.demographic,
                Demographic::label,
            );
            write_select(
                out,
                SocioEconomic::FIELD,
                "Socio-Economic:",
                SocioEconomic::ALL,
                p.socioeconomic,
                SocioEconomic::label,
            );
            write_select(
                out,
                CulturalContext::FIELD,
                "Cultural Context:",
                CulturalContext::ALL,
                p.cultural,
                CulturalContext::label,
            );
        }
        ToolParams::Emotion { intensity } => write_select(
            out,
            EmotionIntensity::FIELD,
            "Emotion Intensity:",
            EmotionIntensity::ALL,
            *intensity,
            EmotionIntensity::label,
        ),
        ToolParams::Perspective { perspective } => write_select(
            out,
            Perspective::FIELD,
            "New Perspective:",
            Perspective::ALL,
            *perspective,
            Perspective::label,
        ),
        ToolParams::Complexity { level } => write_select(
            out,
            ComplexityLevel::FIELD,
            "Complexity Level:",
            ComplexityLevel::ALL,
            *level,
            ComplexityLevel::label,
        ),
        ToolParams::CrossCultural { culture } => write_select(
            out,
            Culture::FIELD,
            "Culture:",
            Culture::ALL,
            *culture,
            Culture::label,
        ),
        ToolParams::Variables(vars) => {
            for ((field, label), value) in VariableParams::FIELDS.iter().zip(vars.values()) {
                let _ = writeln!(
                    out,
                    "<label for=\"{field}\">{label}: <output>{value}</output></label>\n\
<input type=\"range\" id=\"{field}\" name=\"{field}\" min=\"0\" max=\"100\" value=\"{value}\" \
oninput=\"this.previousElementSibling.firstElementChild.value=this.value\">"
                );
            }
        }
        ToolParams::Debate
        | ToolParams::Neutralizer
        | ToolParams::FactOpinion
        | ToolParams::Rhetoric => {}
    }
}

fn write_tool_form(out: &mut String, session: &Session) {
    let kind = session.selected_tool;
    let _ = writeln!(
        out,
        "<h2>{}</h2>\n<form method=\"post\" action=\"/tools/{}\">\n\
<label for=\"input\">Paste an article or URL here:</label>\n\
<textarea id=\"input\" name=\"input\">{}</textarea>",
        escape(kind.header()),
        kind.slug(),
        escape(&session.input_text)
    );
    write_controls(out, &session.current_params());
    let _ = writeln!(
        out,
        "<button type=\"submit\">{}</button>\n</form>",
        escape(kind.action_label())
    );
}

fn write_outcome(out: &mut String, session: &Session) {
    let Some(outcome) = session
        .outcome
        .as_ref()
        .filter(|outcome| outcome.kind == session.selected_tool)
    else {
        return;
    };

    let kind = outcome.kind;
    let report = &outcome.report;
    let _ = writeln!(
        out,
        "<h3>{}</h3>\n<pre>{}</pre>\n<h3>{}</h3>\n<pre>{}</pre>\n\
<a download=\"{}\" href=\"{}\">Download Report as HTML</a>",
        escape(kind.result_label()),
        escape(&outcome.generation.result),
        escape(kind.analysis_label()),
        escape(&outcome.generation.analysis),
        escape(&report.file_name()),
        report.data_url()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::ToolOutcome;
    use crate::report::Report;
    use crate::session::Notice;
    use crate::tools::GenerationResult;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_missing_credential_warning_is_shown_once() {
        let mut session = Session::new();
        session.notice = Some(Notice::new(
            NoticeLevel::Warning,
            message::MISSING_CREDENTIAL,
        ));
        let html = render(&session, &Branding::none(200));
        assert_eq!(html.matches(message::MISSING_CREDENTIAL).count(), 1);

        session.notice = Some(Notice::new(NoticeLevel::Error, "Unknown tool: nope"));
        let html = render(&session, &Branding::none(200));
        assert!(html.contains("Unknown tool: nope"));
    }

    #[test]
    fn test_unauthenticated_page_only_offers_credential_entry() {
        let html = render(&Session::new(), &Branding::none(200));
        assert!(html.contains("name=\"api_key\""));
        assert!(html.contains(message::MISSING_CREDENTIAL));
        assert!(html.contains(message::LOGO_MISSING));
        assert!(!html.contains("action=\"/tools/"));
        assert!(!html.contains("Clear All"));
    }

    #[test]
    fn test_ready_page_shows_selected_tool_form() {
        let mut session = Session::new();
        session.set_credential("sk-test");
        session.select_tool(ToolKind::Variables);
        session.input_text = "<b>pasted</b>".to_string();

        let html = render(&session, &Branding::none(200));
        assert!(!html.contains("name=\"api_key\""));
        assert!(html.contains("<h2>Variable Adjustment Analysis</h2>"));
        assert!(html.contains("action=\"/tools/variables\""));
        assert!(html.contains("name=\"accessibility\""));
        assert!(html.contains("&lt;b&gt;pasted&lt;/b&gt;"));
        assert!(html.contains("<option value=\"variables\" selected>"));
        assert!(html.contains("Show Fun Fact"));
    }

    #[test]
    fn test_outcome_and_download_link() {
        let mut session = Session::new();
        session.set_credential("sk-test");
        session.select_tool(ToolKind::Debate);
        session.notice = Some(Notice::new(NoticeLevel::Error, "boom"));
        session.outcome = Some(ToolOutcome {
            kind: ToolKind::Debate,
            original: "orig".to_string(),
            generation: GenerationResult::from_completion("counter\n---\nwhy", "none"),
            report: Report::new("Debate Counter-Argument Report", "orig", "counter", "why"),
        });

        let html = render(&session, &Branding::none(200));
        assert!(html.contains("<h3>Counter-Argument</h3>\n<pre>counter</pre>"));
        assert!(html.contains("<h3>Analysis</h3>\n<pre>why</pre>"));
        assert!(html.contains("download=\"Debate Counter-Argument Report.html\""));
        assert!(html.contains("href=\"data:text/html;base64,"));
        assert!(html.contains("notice error\">boom"));
    }
}
