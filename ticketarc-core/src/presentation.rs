use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Message, Theme};

pub const USER_PALETTE_LEN: usize = 14;

const DARK_USER_COLORS: [&str; USER_PALETTE_LEN] = [
    "#ed4245", "#3ba55c", "#fee75c", "#f26522", "#1abc9c", "#5865f2", "#e91e63", "#9c27b0",
    "#3f51b5", "#00bcd4", "#4caf50", "#ff9800", "#795548", "#607d8b",
];

// Same hues deepened for a light page; slot assignment is shared with the
// dark palette so a username keeps its color family across modes.
const LIGHT_USER_COLORS: [&str; USER_PALETTE_LEN] = [
    "#b52e31", "#2d7d46", "#b7950b", "#c44d12", "#148f77", "#3c45a5", "#ad1457", "#6a1b9a",
    "#283593", "#00838f", "#2e7d32", "#e65100", "#4e342e", "#37474f",
];

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})\s+(\w{3})\s+(\d{1,2})\s+(\d{2}):(\d{2}):(\d{2})").expect("valid regex")
});

/// Insertion-ordered username to palette-slot assignment. The Nth
/// distinct username gets slot N-1; slots wrap modulo the palette length
/// at lookup, so the assignment itself never saturates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPalette {
    indices: HashMap<String, usize>,
}

impl UserPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_for(&mut self, username: &str) -> usize {
        if let Some(index) = self.indices.get(username) {
            return *index;
        }

        let index = self.indices.len();
        self.indices.insert(username.to_string(), index);
        index
    }

    pub fn color_for(&mut self, username: &str, theme: Theme) -> &'static str {
        let index = self.index_for(username);
        let colors = match theme {
            Theme::Light => &LIGHT_USER_COLORS,
            Theme::Dark => &DARK_USER_COLORS,
        };
        colors[index % USER_PALETTE_LEN]
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP_RE.captures(raw)?;

    let year = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let day = caps[3].parse().ok()?;
    let hour = caps[4].parse().ok()?;
    let minute = caps[5].parse().ok()?;
    let second = caps[6].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn month_number(abbreviation: &str) -> Option<u32> {
    match abbreviation {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mar" => Some(3),
        "Apr" => Some(4),
        "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Oct" => Some(10),
        "Nov" => Some(11),
        "Dec" => Some(12),
        _ => None,
    }
}

/// A message is grouped with its predecessor only when both carry the
/// same username and parseable timestamps less than five minutes apart.
/// Any timestamp that fails to parse denies grouping for that pair.
pub fn should_group(current: &Message, previous: Option<&Message>) -> bool {
    let Some(previous) = previous else {
        return false;
    };

    if current.username != previous.username {
        return false;
    }

    let (Some(current_at), Some(previous_at)) = (
        parse_timestamp(&current.timestamp),
        parse_timestamp(&previous.timestamp),
    ) else {
        return false;
    };

    current_at.signed_duration_since(previous_at) < TimeDelta::minutes(5)
}

#[cfg(test)]
mod tests {
    use super::{USER_PALETTE_LEN, UserPalette, parse_timestamp, should_group};
    use crate::model::{Message, Theme};

    fn message(username: &str, timestamp: &str) -> Message {
        Message {
            timestamp: timestamp.to_string(),
            username: username.to_string(),
            user_id: None,
            raw_content: String::new(),
            rendered_content: String::new(),
        }
    }

    #[test]
    fn nth_distinct_username_gets_index_n_minus_one() {
        let mut palette = UserPalette::new();

        assert_eq!(palette.index_for("alice"), 0);
        assert_eq!(palette.index_for("bob"), 1);
        assert_eq!(palette.index_for("alice"), 0);
        assert_eq!(palette.index_for("carol"), 2);
    }

    #[test]
    fn palette_wraps_after_all_colors_are_used() {
        let mut palette = UserPalette::new();
        for n in 0..USER_PALETTE_LEN {
            palette.index_for(&format!("user{n}"));
        }

        let first = palette.color_for("user0", Theme::Dark);
        let wrapped = palette.color_for("user-overflow", Theme::Dark);

        assert_eq!(palette.index_for("user-overflow"), USER_PALETTE_LEN);
        assert_eq!(wrapped, first);
    }

    #[test]
    fn index_is_mode_independent_but_color_is_not() {
        let mut palette = UserPalette::new();

        let dark = palette.color_for("alice", Theme::Dark).to_string();
        let light = palette.color_for("alice", Theme::Light).to_string();

        assert_eq!(palette.index_for("alice"), 0);
        assert_ne!(dark, light);
    }

    #[test]
    fn clear_restarts_assignment() {
        let mut palette = UserPalette::new();
        palette.index_for("alice");
        palette.index_for("bob");
        palette.clear();

        assert_eq!(palette.index_for("bob"), 0);
    }

    #[test]
    fn timestamp_parses_expected_shape() {
        let parsed = parse_timestamp("2024 Jan 05 13:42:10").expect("parse");
        assert_eq!(parsed.to_string(), "2024-01-05 13:42:10");
    }

    #[test]
    fn timestamp_rejects_unknown_month() {
        assert!(parse_timestamp("2024 Foo 05 13:42:10").is_none());
    }

    #[test]
    fn grouping_applies_under_five_minutes() {
        let previous = message("alice", "2024 Jan 05 13:42:10");
        let current = message("alice", "2024 Jan 05 13:47:09");

        assert!(should_group(&current, Some(&previous)));
    }

    #[test]
    fn grouping_denied_at_exactly_five_minutes() {
        let previous = message("alice", "2024 Jan 05 13:42:10");
        let current = message("alice", "2024 Jan 05 13:47:10");

        assert!(!should_group(&current, Some(&previous)));
    }

    #[test]
    fn grouping_denied_for_different_usernames() {
        let previous = message("alice", "2024 Jan 05 13:42:10");
        let current = message("bob", "2024 Jan 05 13:42:30");

        assert!(!should_group(&current, Some(&previous)));
    }

    #[test]
    fn grouping_denied_without_previous_message() {
        let current = message("alice", "2024 Jan 05 13:42:10");
        assert!(!should_group(&current, None));
    }

    #[test]
    fn unparseable_timestamp_denies_grouping() {
        let previous = message("alice", "yesterday");
        let current = message("alice", "2024 Jan 05 13:42:10");

        assert!(!should_group(&current, Some(&previous)));
    }
}
