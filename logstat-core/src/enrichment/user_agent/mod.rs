mod uaparser_engine;
mod woothee_engine;


use crate::conf::types::UaEngineKind;
use crate::enrichment::user_agent::uaparser_engine::UaParserEngine;
use crate::enrichment::user_agent::woothee_engine::WootheeEngine;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub trait ClientResolver {
    fn resolve(&self, ua: &str) -> ClientInfo;
}

pub fn build_ua_engine(kind: UaEngineKind, regexes: Option<&Path>) -> anyhow::Result<UaEngine> {
    match kind {
        UaEngineKind::UaParser => {
            let path = regexes.context("the uaparser engine needs a regexes file")?;
            let yaml = fs::read(path)
                .with_context(|| format!("failed to read uaparser regexes {}", path.display()))?;
            Ok(UaEngine::UaParser(UaParserEngine::new(&yaml)?))
        }
        UaEngineKind::Woothee => Ok(UaEngine::Woothee(WootheeEngine::new())),
    }
}

pub enum UaEngine {
    UaParser(UaParserEngine),
    Woothee(WootheeEngine),
}

impl ClientResolver for UaEngine {
    fn resolve(&self, ua: &str) -> ClientInfo {
        match self {
            UaEngine::UaParser(p) => p.parse(ua),
            UaEngine::Woothee(p) => p.parse(ua),
        }
    }
}

/// What we remember about a user-agent string.
///
/// Bots only carry their name and full version; everyone else carries device,
/// browser and OS with versions cut down to `major.minor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientInfo {
    Bot {
        name: Option<String>,
        version: Option<String>,
    },
    Person {
        device: DeviceType,
        browser: Option<String>,
        browser_version: Option<String>,
        os: Option<String>,
        os_version: Option<String>,
    },
}

impl ClientInfo {
    pub fn is_bot(&self) -> bool {
        matches!(self, ClientInfo::Bot { .. })
    }

    /// `bot`, or the device type of a person.
    pub fn device_label(&self) -> &'static str {
        match self {
            ClientInfo::Bot { .. } => "bot",
            ClientInfo::Person { device, .. } => device.as_str(),
        }
    }

    /// Browser (or bot) name; empty when the parser could not tell.
    pub fn name(&self) -> &str {
        match self {
            ClientInfo::Bot { name, .. } => name.as_deref().unwrap_or_default(),
            ClientInfo::Person { browser, .. } => browser.as_deref().unwrap_or_default(),
        }
    }

    pub fn version(&self) -> &str {
        match self {
            ClientInfo::Bot { version, .. } => version.as_deref().unwrap_or_default(),
            ClientInfo::Person {
                browser_version, ..
            } => browser_version.as_deref().unwrap_or_default(),
        }
    }

    pub fn os(&self) -> &str {
        match self {
            ClientInfo::Bot { .. } => "",
            ClientInfo::Person { os, .. } => os.as_deref().unwrap_or_default(),
        }
    }

    pub fn os_version(&self) -> &str {
        match self {
            ClientInfo::Bot { .. } => "",
            ClientInfo::Person { os_version, .. } => os_version.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Unknown => "unknown",
        }
    }
}

/// Keep at most the first two dot-separated components of a version.
pub(crate) fn major_minor(version: &str) -> String {
    let mut parts = version.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(major), Some(minor), Some(_)) => format!("{major}.{minor}"),
        _ => version.to_string(),
    }
}
