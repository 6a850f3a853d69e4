use maxminddb::PathElement;
use std::net::IpAddr;
use std::path::Path;

/// Country code recorded when the resolver has no answer for an address.
pub const UNKNOWN_COUNTRY: &str = "--";

pub trait CountryResolver {
    /// Two-letter country code for `ip`, or [`UNKNOWN_COUNTRY`].
    fn country_code(&self, ip: &str) -> String;
}

/// Country lookups against a MaxMind country (or city) database.
pub struct GeoIpCountryResolver {
    reader: maxminddb::Reader<maxminddb::Mmap>,
}

impl GeoIpCountryResolver {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        // Safety note on the memory-mapped database...
        // - File is opened read-only
        // - Lifetime is bound to GeoIpCountryResolver
        // - logstat does not mutate the mmdb file
        let reader = unsafe { maxminddb::Reader::open_mmap(path)? };
        Ok(Self { reader })
    }
}

impl CountryResolver for GeoIpCountryResolver {
    fn country_code(&self, ip: &str) -> String {
        let Ok(addr) = ip.parse::<IpAddr>() else {
            return UNKNOWN_COUNTRY.to_string();
        };

        self.reader
            .lookup(addr)
            .ok()
            .and_then(|lookup| {
                lookup
                    .decode_path::<String>(&[
                        PathElement::Key("country"),
                        PathElement::Key("iso_code"),
                    ])
                    .ok()
                    .flatten()
            })
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
    }
}

/// Used when no country database is configured.
#[derive(Debug, Default)]
pub struct UnknownCountry;

impl CountryResolver for UnknownCountry {
    fn country_code(&self, _ip: &str) -> String {
        UNKNOWN_COUNTRY.to_string()
    }
}
