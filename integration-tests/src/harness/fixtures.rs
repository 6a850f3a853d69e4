use crate::harness::{StubClients, StubCountries};
use logstat_core::cache::{CacheFiles, Caches};
use logstat_core::conf::ImportConfig;
use logstat_core::import::Importer;
use logstat_core::stats::{StatsFiles, StatsTree, load_day};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// One access-log line, built field by field.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub host: String,
    pub ip: String,
    /// `dd/Mon/yyyy:HH:MM:SS +zzzz`
    pub datetime: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub bytes: u64,
    pub user_agent: String,
    pub speed: Option<String>,
    pub cache: Option<String>,
}

impl LogLine {
    /// `GET url` from `ip` with user agent `X`, answered `200`, at 10:00 on `day` (`dd/Mon/yyyy`).
    pub fn get(ip: &str, day: &str, url: &str) -> Self {
        Self {
            host: "example.com".to_string(),
            ip: ip.to_string(),
            datetime: format!("{day}:10:00:00 +0000"),
            method: "GET".to_string(),
            url: url.to_string(),
            status: 200,
            bytes: 100,
            user_agent: "X".to_string(),
            speed: None,
            cache: None,
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn at(mut self, datetime: &str) -> Self {
        self.datetime = datetime.to_string();
        self
    }

    pub fn ua(mut self, ua: &str) -> Self {
        self.user_agent = ua.to_string();
        self
    }

    pub fn speed(mut self, speed: &str) -> Self {
        self.speed = Some(speed.to_string());
        self
    }

    pub fn cache(mut self, cache: &str) -> Self {
        self.cache = Some(cache.to_string());
        self
    }

    pub fn render(&self) -> String {
        let mut line = format!(
            r#"{} {} - [{}] "{} {} HTTP/1.1" {} {} "-" "{}""#,
            self.host,
            self.ip,
            self.datetime,
            self.method,
            self.url,
            self.status,
            self.bytes,
            self.user_agent
        );
        for extra in [&self.speed, &self.cache].into_iter().flatten() {
            line.push(' ');
            line.push_str(extra);
        }
        line
    }
}

/// Temporary logs/stats/cache directories with a matching configuration.
pub struct Workspace {
    dir: TempDir,
    pub config: ImportConfig,
    pub countries: StubCountries,
    pub clients: StubClients,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = ImportConfig::with_root(dir.path());
        fs::create_dir_all(&config.dirs.logs).expect("logs dir");

        Self {
            dir,
            config,
            countries: StubCountries::default().with("1.2.3.4", "HR"),
            clients: StubClients::default(),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `lines` to `logs/<name>`, newline-terminated.
    pub fn write_log(&self, name: &str, lines: &[LogLine]) -> PathBuf {
        let body: String = lines.iter().map(|l| l.render() + "\n").collect();
        self.write_raw_log(name, &body)
    }

    pub fn write_raw_log(&self, name: &str, body: &str) -> PathBuf {
        let path = self.config.dirs.logs.join(name);
        fs::write(&path, body).expect("write log");
        path
    }

    /// A fresh importer, loading whatever caches earlier runs left behind.
    pub fn importer(&self) -> Importer {
        Importer::new(
            &self.config,
            Box::new(self.countries.clone()),
            Box::new(self.clients.clone()),
        )
    }

    pub fn stats(&self, date: &str) -> Option<StatsTree> {
        load_day(&StatsFiles::in_dir(&self.config.dirs.stats), date).expect("readable stats")
    }

    pub fn cache_files(&self) -> CacheFiles {
        CacheFiles::in_dir(&self.config.dirs.cache)
    }

    /// Caches as the next run would see them.
    pub fn stored_caches(&self) -> Caches {
        Caches::load(&self.cache_files(), &self.config.limits)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
