use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// A request parsed out of one log line. Borrows from the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord<'a> {
    pub host: &'a str,
    pub ip: &'a str,
    /// Raw bracketed datetime, e.g. `01/Jan/2024:10:00:00 +0100`
    pub datetime: &'a str,
    pub method: &'a str,
    pub url: &'a str,
    pub protocol: &'a str,
    pub status: u16,
    pub bytes: u64,
    pub referer: &'a str,
    pub user_agent: &'a str,
    /// Response time in seconds, when the server logs it.
    pub speed: Option<f64>,
    /// Trailing cache-status token; empty when absent.
    pub cache_status: &'a str,
    pub time: ParsedDateTime,
}

/// Timestamp of a request in the server's local time (the offset written in the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    pub local: NaiveDateTime,
}

impl ParsedDateTime {
    pub fn new(local: NaiveDateTime) -> Self {
        Self { local }
    }

    pub fn date(&self) -> NaiveDate {
        self.local.date()
    }

    pub fn hour(&self) -> u8 {
        self.local.hour() as u8
    }

    /// `YYYY-MM-DD`
    pub fn date_key(&self) -> String {
        self.local.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn timestamp(&self) -> String {
        self.local.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
