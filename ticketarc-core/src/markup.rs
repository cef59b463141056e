use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::parse::UserDirectory;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex"));
static UNDERLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").expect("valid regex"));
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").expect("valid regex"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));
static USER_MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<@!?(\d+)>").expect("valid regex"));
static ROLE_MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<@&(\d+)>").expect("valid regex"));
static CHANNEL_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<#(\d+)>").expect("valid regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));
static EMBED_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)(?:,\s*)?(\{.*\})\s*$").expect("valid regex"));
static QUOTE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:&gt;|>)\s?").expect("valid regex"));

/// Renders one message's raw content to HTML. Every stage degrades
/// rather than failing: malformed embed JSON, missing embed fields, and
/// unresolved mentions all fall back to literal text.
pub fn render_content(content: &str, directory: &UserDirectory) -> String {
    // Upstream JSON re-serialization leaves mention brackets escaped.
    let content = content.replace("\\u003c", "<").replace("\\u003e", ">");

    let (visible, embed) = split_trailing_embed(&content);
    let mut html = format_markup(&visible, directory);

    if let Some(embed) = embed {
        let embed_html = render_embed(&embed, directory);
        if html.is_empty() {
            return embed_html;
        }
        html.push_str(&embed_html);
    }

    html
}

/// Splits content into visible text and a trailing rich-embed payload.
/// The candidate must be a brace-delimited object running to the end of
/// the content, parse as JSON, and carry `"type": "rich"`; anything else
/// leaves the content untouched.
fn split_trailing_embed(content: &str) -> (String, Option<Value>) {
    let Some(caps) = EMBED_TAIL_RE.captures(content) else {
        return (content.to_string(), None);
    };

    match serde_json::from_str::<Value>(&caps[2]) {
        Ok(embed) if embed.get("type").and_then(Value::as_str) == Some("rich") => {
            (caps[1].trim().to_string(), Some(embed))
        }
        _ => (content.to_string(), None),
    }
}

fn format_markup(text: &str, directory: &UserDirectory) -> String {
    let text = BOLD_RE.replace_all(text, "<strong>${1}</strong>");
    let text = ITALIC_RE.replace_all(&text, "<em>${1}</em>");
    let text = UNDERLINE_RE.replace_all(&text, "<u>${1}</u>");
    let text = STRIKE_RE.replace_all(&text, "<del>${1}</del>");
    let text = CODE_RE.replace_all(&text, "<code>${1}</code>");

    let text = USER_MENTION_RE.replace_all(&text, |caps: &Captures| {
        let user_id = &caps[1];
        let label = directory
            .name_for(user_id)
            .map_or_else(|| "@user".to_string(), |name| format!("@{name}"));
        format!("<a class=\"mention\" href=\"https://discord.com/users/{user_id}\">{label}</a>")
    });
    let text = ROLE_MENTION_RE.replace_all(&text, "<span class=\"mention\">@role</span>");
    let text = CHANNEL_MENTION_RE.replace_all(
        &text,
        "<span class=\"channel-mention\">#channel</span>",
    );
    let text = LINK_RE.replace_all(&text, "<a href=\"${2}\" class=\"embed-link\">${1}</a>");

    fold_quotes(&text)
}

/// Folds runs of `>`-prefixed lines into blockquote containers. A
/// non-empty terminating line lands on the same segment as the container
/// it closes; an unterminated trailing run is flushed at end of input.
fn fold_quotes(text: &str) -> String {
    let mut segments = Vec::new();
    let mut quote_lines: Vec<String> = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("&gt;") || trimmed.starts_with('>') {
            quote_lines.push(QUOTE_MARKER_RE.replace(line, "").into_owned());
        } else if quote_lines.is_empty() {
            segments.push(line.to_string());
        } else {
            let quote = format!(
                "<div class=\"blockquote\">{}</div>",
                quote_lines.join("<br>")
            );
            quote_lines.clear();

            if line.is_empty() {
                segments.push(quote);
            } else {
                segments.push(format!("{quote}{line}"));
            }
        }
    }

    if !quote_lines.is_empty() {
        segments.push(format!(
            "<div class=\"blockquote\">{}</div>",
            quote_lines.join("<br>")
        ));
    }

    segments.join("<br>")
}

/// Builds the embed body as synthetic markdown (author, title,
/// description, fields, footer) and runs it back through the inline
/// formatter, wrapped in a container whose left border tracks the
/// embed's color.
fn render_embed(embed: &Value, directory: &UserDirectory) -> String {
    let mut body = String::new();

    if let Some(name) = embed.pointer("/author/name").and_then(Value::as_str) {
        body.push_str(&format!("**{name}**\n\n"));
    }

    if let Some(title) = embed.get("title").and_then(Value::as_str) {
        body.push_str(&format!("**{title}**\n\n"));
    }

    if let Some(description) = embed.get("description").and_then(Value::as_str) {
        body.push_str(&format!("{description}\n\n"));
    }

    for field in embed
        .get("fields")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        if let Some(name) = field.get("name").and_then(Value::as_str) {
            body.push_str(&format!("**{name}**\n"));
        }
        if let Some(value) = field.get("value").and_then(Value::as_str) {
            body.push_str(&format!("{value}\n\n"));
        }
    }

    let mut footer_parts = Vec::new();
    if let Some(text) = embed.pointer("/footer/text").and_then(Value::as_str) {
        footer_parts.push(text.to_string());
    }
    if let Some(date) = embed
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(format_embed_timestamp)
    {
        footer_parts.push(date);
    }
    if !footer_parts.is_empty() {
        body.push_str(&format!("*{}*", footer_parts.join(" ")));
    }

    let mut html = match embed
        .get("color")
        .and_then(Value::as_u64)
        .filter(|color| *color != 0)
    {
        Some(color) => format!("<div class=\"embed\" style=\"border-left-color: #{color:06x};\">"),
        None => "<div class=\"embed\">".to_string(),
    };

    let body = body.trim();
    if !body.is_empty() {
        html.push_str(&format!(
            "<div class=\"embed-description\">{}</div>",
            format_markup(body, directory)
        ));
    }
    html.push_str("</div>");

    html
}

fn format_embed_timestamp(raw: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|stamp| stamp.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;

    Some(date.format("%m/%d/%Y").to_string())
}
