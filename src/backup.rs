use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;

use crate::error::Result;
use crate::provider::{self, HostedZone, ZoneProvider, ZoneRecordSets};
use crate::retry::RetryPolicy;
use crate::store::ObjectStore;

pub mod key;
pub use key::SnapshotKeys;

////////////////////////////////////////////////////////////
// Report
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneFailure {
    pub zone_id: String,
    pub zone_name: String,
    pub error: String,
}

/// Outcome of one backup pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackupReport {
    pub snapshot: String,
    pub zones: usize,
    pub written: Vec<String>,
    pub failed: Vec<ZoneFailure>,
}

impl BackupReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

////////////////////////////////////////////////////////////
// Backup
////////////////////////////////////////////////////////////
pub struct Backup<P, S> {
    provider: P,
    store: S,
    retry: RetryPolicy,
    prefix: String,
}

impl<P, S> Backup<P, S>
where
    P: ZoneProvider,
    S: ObjectStore,
{
    pub fn new(provider: P, store: S) -> Self {
        Self {
            provider,
            store,
            retry: RetryPolicy::default(),
            prefix: key::DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// One pass over every hosted zone, keyed under the snapshot taken `at`.
    ///
    /// Failing to list the zones fails the pass. A zone that cannot be backed
    /// up is recorded in the report and the pass moves on to the next one.
    pub async fn run(&self, at: DateTime<Utc>) -> Result<BackupReport> {
        let zones = provider::list_hosted_zones(&self.provider, &self.retry).await?;
        let keys = SnapshotKeys::new(&self.prefix, &at);
        let names = key::object_names(&zones);

        info!("backing up {} hosted zone(s) to {}", zones.len(), keys.base());

        let mut report = BackupReport {
            snapshot: keys.base().to_string(),
            zones: zones.len(),
            ..Default::default()
        };

        for (zone, name) in zones.iter().zip(&names) {
            match self.backup_zone(zone, name, &keys).await {
                Ok(written) => report.written.extend(written),
                Err(e) => {
                    error!("backup of zone {} ({}) failed: {}", zone.name, zone.id, e);
                    report.failed.push(ZoneFailure {
                        zone_id: zone.id.clone(),
                        zone_name: zone.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "snapshot {}: {} object(s) written, {} zone(s) failed",
            report.snapshot,
            report.written.len(),
            report.failed.len()
        );
        Ok(report)
    }

    async fn backup_zone(&self, zone: &HostedZone, name: &str, keys: &SnapshotKeys) -> Result<Vec<String>> {
        let record_sets = provider::list_record_sets(&self.provider, &zone.id, &self.retry).await?;

        let info_key = keys.info_key(name);
        self.put_json(&info_key, zone).await?;

        let records = ZoneRecordSets {
            hosted_zone_id: zone.id.clone(),
            resource_record_sets: record_sets,
        };
        let records_key = keys.records_key(name);
        self.put_json(&records_key, &records).await?;

        Ok(vec![info_key, records_key])
    }

    async fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let body = serde_json::to_vec(value)?;
        self.retry
            .call("put_object", || self.store.put_object(key, body.clone()))
            .await?;

        debug!("stored {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod unit_test;
