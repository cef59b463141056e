use crate::model::{Theme, TranscriptView};

/// Built-in stylesheet covering every class the fragment emits. Callers
/// with their own look pass a replacement sheet to `render_document`.
pub const DEFAULT_STYLESHEET: &str = "\
body { margin: 0; font-family: 'Segoe UI', 'Helvetica Neue', Arial, sans-serif; background: #ffffff; color: #2e3338; }
body.dark { background: #313338; color: #dbdee1; }
.container { max-width: 860px; margin: 0 auto; padding: 16px 24px 48px; }
.archive-header { border-bottom: 1px solid rgba(127, 127, 127, 0.3); padding-bottom: 12px; margin-bottom: 8px; }
.archive-header h1 { margin: 0 0 4px; font-size: 1.4em; }
.metadata { font-size: 0.85em; opacity: 0.7; }
.channel-name { font-weight: 600; margin: 12px 0 20px; opacity: 0.8; }
.message { padding: 2px 0 2px 8px; margin-top: 14px; }
.message.grouped { margin-top: 0; }
.message.grouped .message-header { display: none; }
.message-header { margin-bottom: 2px; }
.author { font-weight: 600; margin-right: 8px; }
.timestamp { font-size: 0.75em; opacity: 0.6; }
.message-content { line-height: 1.4; word-wrap: break-word; }
.message-content code { background: rgba(127, 127, 127, 0.2); border-radius: 3px; padding: 0 3px; font-family: Consolas, 'Courier New', monospace; font-size: 0.9em; }
.blockquote { border-left: 4px solid rgba(127, 127, 127, 0.5); padding-left: 8px; margin: 2px 0; }
.mention { color: #5865f2; background-color: rgba(88, 101, 242, 0.15); padding: 0 2px; border-radius: 3px; text-decoration: none; }
.channel-mention { color: #5865f2; }
.embed-link { color: #00a8fc; }
.embed { border-left: 4px solid rgba(127, 127, 127, 0.5); background: rgba(127, 127, 127, 0.1); border-radius: 4px; padding: 8px 12px; margin-top: 4px; max-width: 520px; }
.embed-description { line-height: 1.4; }
";

/// Wraps the fragment in a complete standalone HTML document.
pub fn render_document(view: &TranscriptView, stylesheet: &str, theme: Theme) -> String {
    let ticket_number = view
        .ticket_info
        .as_ref()
        .map_or("Unknown", |info| info.ticket_number.as_str());

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str(&format!(
        "<title>Ticket #{}</title>\n",
        html_escape(ticket_number)
    ));
    out.push_str(&format!("<style>\n{stylesheet}</style>\n</head>\n"));
    out.push_str(match theme {
        Theme::Light => "<body>\n",
        Theme::Dark => "<body class=\"dark\">\n",
    });
    out.push_str(&render_fragment(view));
    out.push_str("</body>\n</html>\n");

    out
}

/// The embeddable archive body: header block, channel line, and one
/// block per message. Message HTML is inserted as already rendered;
/// header metadata, usernames, and timestamps are entity-escaped here.
pub fn render_fragment(view: &TranscriptView) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"container\">\n<div class=\"archive-header\">\n");

    match &view.ticket_info {
        Some(info) => {
            out.push_str(&format!(
                "<h1>Ticket #{} - {}</h1>\n",
                html_escape(&info.ticket_number),
                html_escape(&info.ticket_type)
            ));
            out.push_str(&format!(
                "<div class=\"metadata\">Opened by {} at {} \u{2022} Closed at {}</div>\n",
                html_escape(&info.opened_by),
                html_escape(&info.opened_at),
                html_escape(&info.closed_at)
            ));
        }
        None => {
            out.push_str("<h1>Ticket #Unknown - Transcript</h1>\n");
            out.push_str("<div class=\"metadata\"></div>\n");
        }
    }
    out.push_str("</div>\n");

    let channel = view
        .ticket_info
        .as_ref()
        .map_or("unknown", |info| info.ticket_number.as_str());
    out.push_str(&format!(
        "<div class=\"channel-name\">ticket-{}</div>\n",
        html_escape(channel)
    ));

    for message in &view.messages {
        let grouped_class = if message.grouped { " grouped" } else { "" };
        out.push_str(&format!("<div class=\"message{grouped_class}\">\n"));
        out.push_str("<div class=\"message-header\">\n");
        out.push_str(&format!(
            "<span class=\"author\" style=\"color: {};\">{}</span>\n",
            message.color,
            html_escape(&message.username)
        ));
        out.push_str(&format!(
            "<span class=\"timestamp\">{}</span>\n",
            html_escape(&message.timestamp)
        ));
        out.push_str("</div>\n");
        out.push_str(&format!(
            "<div class=\"message-content\">{}</div>\n</div>\n",
            message.html
        ));
    }

    out.push_str("</div>\n");
    out
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
