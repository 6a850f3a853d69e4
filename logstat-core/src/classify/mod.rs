//! Derived request dimensions: status class, URL type and response-speed bucket.

mod speed;
mod url;


pub use speed::*;
pub use url::*;

use crate::parse::LogRecord;
use std::fmt;

/// Leading digit of the HTTP status plus `xx`, e.g. `4xx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusClass(u8);

impl StatusClass {
    pub fn from_status(status: u16) -> Self {
        Self((status / 100 % 10) as u8)
    }

    pub fn is_success(&self) -> bool {
        self.0 == 2
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}xx", self.0)
    }
}

/// Everything the accumulator needs to know about a request besides who made it.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: StatusClass,
    pub url_type: UrlType,
    /// Query-stripped path; only the file name for `images`.
    pub url: String,
    pub speed: SpeedBucket,
}

impl Classification {
    /// Page views that count towards first-visit and retention tracking.
    pub fn is_successful_page(&self) -> bool {
        self.url_type == UrlType::Page && self.status.is_success()
    }
}

pub fn classify(record: &LogRecord<'_>) -> Classification {
    let (url_type, url) = classify_url(record.url);

    Classification {
        status: StatusClass::from_status(record.status),
        url_type,
        url: url.to_string(),
        speed: speed_bucket(record.speed),
    }
}
