use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::provider::HostedZone;

pub const DEFAULT_PREFIX: &str = "route53";

const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const INFO_SUFFIX: &str = "-info.json";
const RECORDS_SUFFIX: &str = "-records.json";

pub fn snapshot_stamp(at: &DateTime<Utc>) -> String {
    at.format(STAMP_FORMAT).to_string()
}

/// `example.com.` becomes `example_com`.
pub fn normalize_zone_name(name: &str) -> String {
    name.trim_end_matches('.').replace('.', "_")
}

/// Object name of every zone, in order. Zones that share a normalized name
/// (a public and a private zone for one domain) get their short id appended.
pub fn object_names(zones: &[HostedZone]) -> Vec<String> {
    let normalized: Vec<String> = zones.iter().map(|z| normalize_zone_name(&z.name)).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in &normalized {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    normalized
        .iter()
        .zip(zones)
        .map(|(name, zone)| {
            if counts[name.as_str()] > 1 {
                format!("{}-{}", name, zone.short_id())
            } else {
                name.clone()
            }
        })
        .collect()
}

/// Key layout of one snapshot: `{prefix}/{stamp}/{name}-info.json` and
/// `{prefix}/{stamp}/{name}-records.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotKeys {
    base: String,
}

impl SnapshotKeys {
    pub fn new(prefix: &str, at: &DateTime<Utc>) -> Self {
        let prefix = prefix.trim_matches('/');
        let stamp = snapshot_stamp(at);
        let base = if prefix.is_empty() {
            stamp
        } else {
            format!("{}/{}", prefix, stamp)
        };

        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn info_key(&self, object_name: &str) -> String {
        format!("{}/{}{}", self.base, object_name, INFO_SUFFIX)
    }

    pub fn records_key(&self, object_name: &str) -> String {
        format!("{}/{}{}", self.base, object_name, RECORDS_SUFFIX)
    }
}
