//! Adapters around the external resolution services: IP to country, and
//! user-agent string to client description.

pub mod geoip;
pub mod user_agent;

pub use geoip::{CountryResolver, GeoIpCountryResolver, UNKNOWN_COUNTRY, UnknownCountry};
pub use user_agent::{ClientInfo, ClientResolver, DeviceType, UaEngine, build_ua_engine};
