use logstat_core::enrichment::{
    ClientInfo, ClientResolver, CountryResolver, DeviceType, UNKNOWN_COUNTRY,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Country lookups from a fixed table; anything else is unknown.
#[derive(Clone, Default)]
pub struct StubCountries {
    table: HashMap<String, String>,
    calls: Rc<Cell<usize>>,
}

impl StubCountries {
    pub fn with(mut self, ip: &str, country: &str) -> Self {
        self.table.insert(ip.to_string(), country.to_string());
        self
    }

    /// Shared counter of resolver calls, readable after the stub was boxed.
    pub fn calls(&self) -> Rc<Cell<usize>> {
        self.calls.clone()
    }
}

impl CountryResolver for StubCountries {
    fn country_code(&self, ip: &str) -> String {
        self.calls.set(self.calls.get() + 1);
        self.table
            .get(ip)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
    }
}

/// Treats user agents containing `bot` as bots named after the whole string;
/// everything else is a desktop browser of that name.
#[derive(Clone, Default)]
pub struct StubClients {
    calls: Rc<Cell<usize>>,
}

impl StubClients {
    pub fn calls(&self) -> Rc<Cell<usize>> {
        self.calls.clone()
    }
}

impl ClientResolver for StubClients {
    fn resolve(&self, ua: &str) -> ClientInfo {
        self.calls.set(self.calls.get() + 1);

        if ua.to_ascii_lowercase().contains("bot") {
            return ClientInfo::Bot {
                name: Some(ua.to_string()),
                version: Some("1.0".to_string()),
            };
        }

        ClientInfo::Person {
            device: DeviceType::Desktop,
            browser: Some(ua.to_string()),
            browser_version: Some("1.0".to_string()),
            os: Some("Linux".to_string()),
            os_version: None,
        }
    }
}
