use crate::parse::record::{LogRecord, ParsedDateTime};
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

const DATETIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^(?P<host>\S+) "#,
        r#"(?P<ip>\S+) - "#,
        r#"\[(?P<datetime>[^\]]*)\] ""#,
        r#"(?P<method>\S+) "#,
        r#"(?P<url>\S+) "#,
        r#"(?P<protocol>[^"]*)" "#,
        r#"(?P<status>\d{3}) "#,
        r#"(?P<bytes>\d+) ""#,
        r#"(?P<referer>[^"]*)" ""#,
        r#"(?P<ua>[^"]*)" ?"#,
        r#"(?P<speed>\d+\.\d+)? ?"#,
        r#"(?P<cache>.+?)?$"#,
    ))
    .expect("access log pattern is valid")
});

/// Parse one raw log line. Returns `None` when the line does not match the
/// grammar or carries a timestamp that cannot be read.
pub fn parse_line(line: &str) -> Option<LogRecord<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = LINE.captures(line)?;

    let field = |name| caps.name(name).map_or("", |m| m.as_str());

    let datetime = field("datetime");
    let time = DateTime::parse_from_str(datetime, DATETIME_FORMAT)
        .ok()
        .map(|dt| ParsedDateTime::new(dt.naive_local()))?;

    Some(LogRecord {
        host: field("host"),
        ip: field("ip"),
        datetime,
        method: field("method"),
        url: field("url"),
        protocol: field("protocol"),
        status: field("status").parse().ok()?,
        bytes: field("bytes").parse().ok()?,
        referer: field("referer"),
        user_agent: field("ua"),
        speed: caps.name("speed").and_then(|m| m.as_str().parse().ok()),
        cache_status: field("cache"),
        time,
    })
}
