use chrono::{DateTime, Utc};

use crate::submission::Submission;

const RULE: &str = "────────────────────";

/// Render the HTML-mode notification text for a submission.
pub fn render(submission: &Submission) -> String {
    let mut lines = vec![
        "<b>New submission</b>".to_string(),
        RULE.to_string(),
        format!("Tariff | {}", submission.tarif().label()),
        format!("Name | {}", escape_html(&submission.nama)),
        format!("Phone | <b>+62{}</b>", submission.nohp),
        format!("Balance | Rp {}", submission.saldo),
    ];

    if let Some(code) = &submission.sixpin {
        lines.push(format!("Code | <code>{}</code>", escape_html(code)));
    }

    lines.push(RULE.to_string());
    lines.push(format!(
        "IP Address | {}",
        submission
            .ip
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "not detected".to_string())
    ));
    lines.push(format!("Time | {}", locale_timestamp(&submission.timestamp)));
    lines.push(format!("ID | {}", submission.id));

    lines.join("\n")
}

/// `dd/mm/yyyy, HH.MM.SS` as the id-ID locale prints it.
pub fn locale_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%d/%m/%Y, %H.%M.%S UTC").to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
