use crate::enrichment::user_agent::{ClientInfo, DeviceType, major_minor};
use uaparser::{Parser, UserAgentParser};

/// Family reported by ua-parser when nothing matched.
const OTHER: &str = "Other";

pub struct UaParserEngine {
    parser: UserAgentParser,
}

impl UaParserEngine {
    pub fn new(regexes_yaml: &[u8]) -> anyhow::Result<Self> {
        let parser = UserAgentParser::from_bytes(regexes_yaml)?;
        Ok(Self { parser })
    }

    pub fn parse(&self, ua: &str) -> ClientInfo {
        let client = self.parser.parse(ua);

        let ua_family = client.user_agent.family.to_lowercase();
        let device_family = client.device.family.to_lowercase();

        let is_bot = ua_family.contains("bot")
            || ua_family.contains("crawler")
            || ua_family.contains("spider")
            || device_family == "spider";

        let browser = known(&client.user_agent.family);
        let browser_version = join_version(&[
            client.user_agent.major.as_deref(),
            client.user_agent.minor.as_deref(),
            client.user_agent.patch.as_deref(),
        ]);

        if is_bot {
            return ClientInfo::Bot {
                name: browser,
                version: browser_version,
            };
        }

        let device = if device_family.contains("mobile") || ua.contains("Mobile") {
            DeviceType::Mobile
        } else if device_family.contains("tablet") || device_family.contains("ipad") {
            DeviceType::Tablet
        } else if device_family == "other" {
            DeviceType::Desktop
        } else {
            DeviceType::Unknown
        };

        ClientInfo::Person {
            device,
            browser,
            browser_version: browser_version.map(|v| major_minor(&v)),
            os: known(&client.os.family),
            os_version: join_version(&[client.os.major.as_deref(), client.os.minor.as_deref()]),
        }
    }
}

fn known(family: &str) -> Option<String> {
    (!family.is_empty() && family != OTHER).then(|| family.to_string())
}

/// `major[.minor[.patch]]`, stopping at the first missing component.
fn join_version(parts: &[Option<&str>]) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .map_while(|p| *p)
        .filter(|p| !p.is_empty())
        .collect();

    (!present.is_empty()).then(|| present.join("."))
}
