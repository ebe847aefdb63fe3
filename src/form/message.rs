//! Notification text assembly.

use crate::form::validator::ValidSubmission;

/// Ordered, HTML-formatted lines describing one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    lines: Vec<String>,
}

impl NotificationMessage {
    /// Build the message: title, name, phone, then instrument and message
    /// when present. Every submitted value is HTML-escaped.
    pub fn from_submission(submission: &ValidSubmission, title: &str) -> Self {
        let mut lines = vec![
            format!("<b>{}</b>", escape_html(title)),
            labeled("Имя", &submission.name),
            labeled("Телефон", &submission.phone),
        ];
        if let Some(instrument) = &submission.instrument {
            lines.push(labeled("Инструмент", instrument));
        }
        if let Some(message) = &submission.message {
            lines.push(labeled("Сообщение", message));
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

fn labeled(label: &str, value: &str) -> String {
    format!("<b>{label}</b>: <i>{}</i>", escape_html(value))
}

/// Escape `& < > " '` for HTML text and attribute contexts.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
