use std::fs;
use std::path::Path;

use crate::error::{ArchiveError, Result};
use crate::model::{Message, MessageView, Theme, TranscriptView};
use crate::parse::{self, UserDirectory};
use crate::presentation::{self, UserPalette};

/// Per-conversion state: the id-to-username directory built by the
/// parser pre-pass and the username-to-color assignment. Both are
/// append-only for the life of the session and cleared only by an
/// explicit `reset`, so loading a new transcript starts fresh while
/// re-rendering the current one stays stable.
#[derive(Debug, Clone, Default)]
pub struct RenderSession {
    pub directory: UserDirectory,
    pub palette: UserPalette,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.directory.clear();
        self.palette.clear();
    }
}

/// Full pipeline over one transcript blob: id pre-pass, parse + render,
/// then per-message grouping and color decoration. Pure over its inputs
/// apart from the session caches; never fails.
pub fn convert_transcript(
    session: &mut RenderSession,
    text: &str,
    theme: Theme,
) -> TranscriptView {
    parse::index_user_ids(text, &mut session.directory);
    let transcript = parse::parse_transcript(text, &session.directory);

    let mut messages = Vec::with_capacity(transcript.messages.len());
    let mut previous: Option<&Message> = None;

    for message in &transcript.messages {
        let grouped = presentation::should_group(message, previous);
        let color = session.palette.color_for(&message.username, theme).to_string();

        messages.push(MessageView {
            username: message.username.clone(),
            timestamp: message.timestamp.clone(),
            html: message.rendered_content.clone(),
            grouped,
            color,
        });

        previous = Some(message);
    }

    TranscriptView {
        ticket_info: transcript.ticket_info,
        messages,
    }
}

pub fn read_transcript_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(ArchiveError::EmptyTranscriptFile {
            path: path.to_path_buf(),
        });
    }

    String::from_utf8(bytes).map_err(|_| ArchiveError::NonUtf8TranscriptFile {
        path: path.to_path_buf(),
    })
}

pub fn transcript_view_to_raw_json(view: &TranscriptView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(|err| ArchiveError::Serialization(err.to_string()))
}
