use crate::classify::Classification;
use crate::enrichment::ClientInfo;
use crate::stats::tree::{
    Bucket, ClientBreakdown, StatsTree, StatusBuckets, TOTAL, Totals, UrlBucket, Versions, bump,
};
use std::collections::BTreeMap;

/// One accepted request, enriched and gated, ready to be counted.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub class: &'a Classification,
    pub hour: u8,
    pub bytes: u64,
    pub cache_status: &'a str,
    pub country: &'a str,
    pub client: &'a ClientInfo,
    /// First request of this visitor on the day.
    pub new_visitor: bool,
    /// First successful view of this page by this visitor on the day.
    pub new_page_view: bool,
    /// Held days on which this visitor already viewed this URL.
    pub retention_dates: &'a [&'a str],
}

impl StatsTree {
    /// Fold one request into every tier of the tree.
    pub fn record(&mut self, hit: &Hit<'_>) {
        let status = hit.class.status.label();
        let u_type = hit.class.url_type.as_str();

        self.total.record(hit, &status);
        if hit.class.speed.slow {
            let slow = self.total.slow.entry(u_type.to_string()).or_default();
            bump(slow, &hit.class.url, 1);
        }

        if hit.client.is_bot() {
            self.record_bot(hit, &status, u_type);
        } else {
            self.record_person(hit, &status, u_type);
        }
    }

    fn record_bot(&mut self, hit: &Hit<'_>, status: &str, u_type: &str) {
        self.bot.total.record(hit, status);

        let all = self.bot.name.entry(TOTAL.to_string()).or_default();
        status_bucket(all, status, u_type).record(hit);

        let by_name = status_bucket(
            self.bot.name.entry(hit.client.name().to_string()).or_default(),
            status,
            u_type,
        );
        by_name.record(hit);
        bump(&mut by_name.version, hit.client.version(), 1);
    }

    fn record_person(&mut self, hit: &Hit<'_>, status: &str, u_type: &str) {
        self.ppl.total.record(hit, status);

        for cc in [TOTAL, hit.country] {
            let country = self.ppl.cc.entry(cc.to_string()).or_default();
            country.ua.record(hit.client);

            let bucket = status_bucket(&mut country.status, status, u_type);
            bucket.record(hit);
            bucket.record_retention(hit);
        }
    }
}

fn status_bucket<'t>(
    tree: &'t mut StatusBuckets,
    status: &str,
    u_type: &str,
) -> &'t mut Bucket {
    tree.entry(status.to_string())
        .or_default()
        .entry(u_type.to_string())
        .or_default()
}

impl Totals {
    fn record(&mut self, hit: &Hit<'_>, status: &str) {
        let u_type = hit.class.url_type.as_str();

        if hit.new_visitor {
            self.visitor += 1;
        }
        self.hit += 1;
        bump(&mut self.u_type, u_type, 1);
        bump(&mut self.status, status, 1);
        bump(&mut self.size, TOTAL, hit.bytes);
        bump(&mut self.size, u_type, hit.bytes);
        bump(&mut self.cache, hit.cache_status, 1);
        bump(&mut self.speed, hit.class.speed.label, 1);
    }
}

impl Bucket {
    fn record(&mut self, hit: &Hit<'_>) {
        if hit.new_visitor {
            self.visitor += 1;
        }
        self.hit += 1;
        self.hour[usize::from(hit.hour.min(23))] += 1;

        let url = self.url_mut(&hit.class.url);
        if hit.new_page_view {
            url.visitor += 1;
        }
        url.hit += 1;
        url.size += hit.bytes;
        bump(&mut url.cache, hit.cache_status, 1);
    }

    fn record_retention(&mut self, hit: &Hit<'_>) {
        for date in hit.retention_dates {
            bump(&mut self.retention, date, 1);
            bump(&mut self.url_mut(&hit.class.url).retention, date, 1);
        }
    }

    fn url_mut(&mut self, url: &str) -> &mut UrlBucket {
        self.url.entry(url.to_string()).or_default()
    }
}

impl ClientBreakdown {
    fn record(&mut self, client: &ClientInfo) {
        let device = client.device_label();

        bump(&mut self.total.device_type, device, 1);
        bump(&mut self.total.os, client.os(), 1);

        let clients = self.device.entry(device.to_string()).or_default();
        count_version(&mut clients.browser, client.name(), client.version());
        count_version(&mut clients.os, client.os(), client.os_version());
    }
}

fn count_version(names: &mut BTreeMap<String, Versions>, name: &str, version: &str) {
    let entry = names.entry(name.to_string()).or_default();
    entry.total += 1;
    bump(&mut entry.version, version, 1);
}
