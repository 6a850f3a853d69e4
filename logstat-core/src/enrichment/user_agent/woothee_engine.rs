use crate::enrichment::user_agent::{ClientInfo, DeviceType, major_minor};
use woothee::parser::Parser;

const UNKNOWN: &str = "UNKNOWN";

pub struct WootheeEngine {
    parser: Parser,
}

impl WootheeEngine {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    pub fn parse(&self, ua: &str) -> ClientInfo {
        let Some(result) = self.parser.parse(ua) else {
            return ClientInfo::Person {
                device: DeviceType::Unknown,
                browser: None,
                browser_version: None,
                os: None,
                os_version: None,
            };
        };

        if result.category == "crawler" {
            return ClientInfo::Bot {
                name: known(&result.name),
                version: known(&result.version),
            };
        }

        let device = match result.category {
            "pc" => DeviceType::Desktop,
            "smartphone" | "mobilephone" => DeviceType::Mobile,
            _ => DeviceType::Unknown,
        };

        ClientInfo::Person {
            device,
            browser: known(&result.name),
            browser_version: known(&result.version).map(|v| major_minor(&v)),
            os: known(&result.os),
            os_version: known(&result.os_version).map(|v| major_minor(&v)),
        }
    }
}

fn known(value: &str) -> Option<String> {
    (!value.is_empty() && value != UNKNOWN).then(|| value.to_string())
}
