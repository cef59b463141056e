pub mod error;
pub mod markup;
pub mod model;
pub mod page;
pub mod parse;
pub mod presentation;
pub mod service;

pub use error::{ArchiveError, Result};
pub use model::{Message, MessageView, Theme, TicketInfo, Transcript, TranscriptView};
pub use page::{DEFAULT_STYLESHEET, render_document, render_fragment};
pub use parse::{UserDirectory, index_user_ids, parse_transcript};
pub use presentation::{USER_PALETTE_LEN, UserPalette, should_group};
pub use service::{
    RenderSession, convert_transcript, read_transcript_text, transcript_view_to_raw_json,
};
