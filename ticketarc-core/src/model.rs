use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ArchiveError;

/// Metadata captured from the fixed first-line header of a transcript
/// export. Absent when the first line does not match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketInfo {
    pub ticket_number: String,
    pub ticket_type: String,
    pub opened_by: String,
    pub opened_at: String,
    pub closed_at: String,
}

/// One transcript message. `raw_content` accumulates continuation lines
/// verbatim; `rendered_content` is filled in by the markup renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub timestamp: String,
    pub username: String,
    pub user_id: Option<String>,
    pub raw_content: String,
    pub rendered_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub ticket_info: Option<TicketInfo>,
    pub messages: Vec<Message>,
}

/// A message decorated for presentation: grouped with its predecessor
/// when close in time, colored per session palette assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub username: String,
    pub timestamp: String,
    pub html: String,
    pub grouped: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptView {
    pub ticket_info: Option<TicketInfo>,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Theme {
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = ArchiveError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ArchiveError::InvalidTheme(input.to_string())),
        }
    }
}
