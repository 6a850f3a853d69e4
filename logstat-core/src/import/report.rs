use std::fmt;

/// Line counts for one pass over a log file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Day established by the first line, if any line parsed.
    pub date: Option<String>,
    /// Every line seen, parsed or not.
    pub lines_total: u64,
    /// Lines aggregated into the day's stats.
    pub lines_read: u64,
    /// Lines already aggregated by an earlier run.
    pub skipped_head: u64,
    /// Lines that did not match the log grammar.
    pub skipped_tail: u64,
    /// Lines for a day other than the established one.
    pub other_dates: u64,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines read: {}/{}. skipped head: {}. skipped tail: {}. other dates: {}",
            self.lines_read,
            self.lines_total,
            self.skipped_head,
            self.skipped_tail,
            self.other_dates
        )
    }
}
