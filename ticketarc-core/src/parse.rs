use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::markup;
use crate::model::{Message, TicketInfo, Transcript};

static TICKET_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Transcript of ticket #(\d+) - (.+?), opened by (.+?) at (.+?), closed at (.+?)\.")
        .expect("valid regex")
});
static MESSAGE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(.+?)\] (.+?)(#\d+)? \((\d+)\): (.*)$").expect("valid regex"));

/// Numeric user id to the most recently observed username for that id.
/// Built in a pre-pass so a mention can resolve to a name that only
/// appears later in the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    names: HashMap<String, String>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, user_id: &str, username: &str) {
        self.names
            .insert(user_id.to_string(), username.to_string());
    }

    pub fn name_for(&self, user_id: &str) -> Option<&str> {
        self.names.get(user_id).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

pub fn index_user_ids(text: &str, directory: &mut UserDirectory) {
    for line in text.split('\n') {
        if let Some(caps) = MESSAGE_HEADER_RE.captures(line) {
            directory.record(&caps[4], &caps[2]);
        }
    }
}

/// Splits a transcript blob into header metadata and rendered messages.
/// The first line is reserved for the ticket header; every later line
/// either opens a new message or continues the one in progress. Lines
/// before the first message header are dropped. Never fails.
pub fn parse_transcript(text: &str, directory: &UserDirectory) -> Transcript {
    let mut lines = text.split('\n');

    let ticket_info = lines.next().and_then(parse_ticket_header);

    let mut messages = Vec::new();
    let mut current: Option<Message> = None;

    for line in lines {
        if let Some(caps) = MESSAGE_HEADER_RE.captures(line) {
            if let Some(message) = current.take() {
                messages.push(finish_message(message, directory));
            }

            current = Some(Message {
                timestamp: caps[1].to_string(),
                username: caps[2].to_string(),
                user_id: Some(caps[4].to_string()),
                raw_content: caps[5].to_string(),
                rendered_content: String::new(),
            });
        } else if let Some(message) = current.as_mut() {
            message.raw_content.push('\n');
            message.raw_content.push_str(line);
        }
    }

    if let Some(message) = current.take() {
        messages.push(finish_message(message, directory));
    }

    Transcript {
        ticket_info,
        messages,
    }
}

fn parse_ticket_header(line: &str) -> Option<TicketInfo> {
    let caps = TICKET_HEADER_RE.captures(line)?;

    Some(TicketInfo {
        ticket_number: caps[1].to_string(),
        ticket_type: caps[2].to_string(),
        opened_by: caps[3].to_string(),
        opened_at: caps[4].to_string(),
        closed_at: caps[5].to_string(),
    })
}

fn finish_message(mut message: Message, directory: &UserDirectory) -> Message {
    message.rendered_content = markup::render_content(&message.raw_content, directory);
    message
}

#[cfg(test)]
mod tests {
    use super::{UserDirectory, index_user_ids, parse_transcript};

    const HEADER: &str = "Transcript of ticket #482 - Support, opened by alice at 2024 Jan 05 13:40:00, closed at 2024 Jan 05 14:10:00.";

    fn directory_for(text: &str) -> UserDirectory {
        let mut directory = UserDirectory::new();
        index_user_ids(text, &mut directory);
        directory
    }

    #[test]
    fn header_extracts_all_five_groups() {
        let transcript = parse_transcript(HEADER, &UserDirectory::new());
        let info = transcript.ticket_info.expect("ticket info");

        assert_eq!(info.ticket_number, "482");
        assert_eq!(info.ticket_type, "Support");
        assert_eq!(info.opened_by, "alice");
        assert_eq!(info.opened_at, "2024 Jan 05 13:40:00");
        assert_eq!(info.closed_at, "2024 Jan 05 14:10:00");
    }

    #[test]
    fn header_mismatch_is_not_fatal() {
        let text = "not a header\n[2024 Jan 05 13:42:10] alice (111): hello";
        let transcript = parse_transcript(text, &directory_for(text));

        assert!(transcript.ticket_info.is_none());
        assert_eq!(transcript.messages.len(), 1);
        assert_eq!(transcript.messages[0].username, "alice");
    }

    #[test]
    fn message_count_matches_header_lines() {
        let text = format!(
            "{HEADER}\n[2024 Jan 05 13:42:10] alice (111): one\ncontinued\nstill continued\n[2024 Jan 05 13:43:00] bob (222): two"
        );
        let transcript = parse_transcript(&text, &directory_for(&text));

        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(
            transcript.messages[0].raw_content,
            "one\ncontinued\nstill continued"
        );
        assert_eq!(transcript.messages[1].raw_content, "two");
    }

    #[test]
    fn discriminator_is_stripped_from_username() {
        let text = format!("{HEADER}\n[2024 Jan 05 13:42:10] bob#0420 (222): hi");
        let transcript = parse_transcript(&text, &directory_for(&text));

        assert_eq!(transcript.messages[0].username, "bob");
        assert_eq!(transcript.messages[0].user_id.as_deref(), Some("222"));
    }

    #[test]
    fn username_may_contain_spaces() {
        let text = format!("{HEADER}\n[2024 Jan 05 13:42:10] Cool Guy (555): hey");
        let transcript = parse_transcript(&text, &directory_for(&text));

        assert_eq!(transcript.messages[0].username, "Cool Guy");
    }

    #[test]
    fn stray_lines_before_first_message_are_dropped() {
        let text = format!("{HEADER}\nstray line\nanother stray");
        let transcript = parse_transcript(&text, &directory_for(&text));

        assert!(transcript.messages.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_transcript() {
        let transcript = parse_transcript("", &UserDirectory::new());

        assert!(transcript.ticket_info.is_none());
        assert!(transcript.messages.is_empty());
    }

    #[test]
    fn id_prepass_prefers_latest_username() {
        let text = "header\n[2024 Jan 05 13:42:10] oldname (111): hi\n[2024 Jan 05 13:43:10] newname (111): hi again";
        let directory = directory_for(text);

        assert_eq!(directory.name_for("111"), Some("newname"));
        assert_eq!(directory.name_for("999"), None);
    }

    #[test]
    fn mention_resolves_to_name_seen_later_in_transcript() {
        let text = format!(
            "{HEADER}\n[2024 Jan 05 13:42:10] alice (111): hi <@222>\n[2024 Jan 05 13:50:00] bob (222): hello"
        );
        let transcript = parse_transcript(&text, &directory_for(&text));

        assert!(transcript.messages[0].rendered_content.contains("@bob"));
        assert!(
            transcript.messages[0]
                .rendered_content
                .contains("https://discord.com/users/222")
        );
    }
}
