//! Per-feed transforms applied after each successful fetch.

use std::collections::HashMap;

use serde::Serialize;

use super::models::{DriverPosition, RaceControlMessage, SessionInfo, WeatherReading};

/// Latest known position for each driver, ordered by position.
///
/// When two records for a driver share a timestamp the one listed first wins.
pub fn latest_positions(records: Vec<DriverPosition>) -> Vec<DriverPosition> {
    let mut latest: HashMap<u32, DriverPosition> = HashMap::new();
    for record in records {
        match latest.get(&record.driver_number) {
            Some(seen) if seen.date >= record.date => {}
            _ => {
                latest.insert(record.driver_number, record);
            }
        }
    }

    let mut table: Vec<DriverPosition> = latest.into_values().collect();
    table.sort_by_key(|p| (p.position, p.driver_number));
    table
}

/// Most recent weather reading; the feed lists readings oldest first.
pub fn latest_weather(mut readings: Vec<WeatherReading>) -> Option<WeatherReading> {
    readings.pop()
}

/// First record of a `session_key=latest` query.
pub fn current_session(sessions: Vec<SessionInfo>) -> Option<SessionInfo> {
    sessions.into_iter().next()
}

/// Sessions ordered newest first; sessions without a start date go last.
pub fn sessions_newest_first(mut sessions: Vec<SessionInfo>) -> Vec<SessionInfo> {
    sessions.sort_by(|a, b| b.date_start.cmp(&a.date_start));
    sessions
}

// == Race Control ==
/// Display emphasis of a race-control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageTone {
    Red,
    Blue,
    Yellow,
    Green,
    Penalty,
    Investigation,
    Neutral,
}

impl MessageTone {
    /// Classifies a message by keyword. Rules are checked in order and the
    /// first match wins; a safety car message reads as red.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has_word = |word: &str| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|w| w == word)
        };

        if has_word("red") {
            MessageTone::Red
        } else if has_word("blue") {
            MessageTone::Blue
        } else if has_word("yellow") {
            MessageTone::Yellow
        } else if has_word("green") {
            MessageTone::Green
        } else if lower.contains("safety car") {
            MessageTone::Red
        } else if lower.contains("penalty") {
            MessageTone::Penalty
        } else if lower.contains("investigation") {
            MessageTone::Investigation
        } else {
            MessageTone::Neutral
        }
    }
}

/// A race-control message with its display tone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceControlEntry {
    #[serde(flatten)]
    pub message: RaceControlMessage,
    pub tone: MessageTone,
}

/// Newest message first, each tagged with its tone.
pub fn race_control_newest_first(messages: Vec<RaceControlMessage>) -> Vec<RaceControlEntry> {
    messages
        .into_iter()
        .rev()
        .map(|message| RaceControlEntry {
            tone: MessageTone::classify(&message.message),
            message,
        })
        .collect()
}
