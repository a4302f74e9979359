use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::TimeZone;

use super::*;
use crate::error::{Error, ErrorKind};
use crate::provider::{HostedZonePage, RecordSetCursor, RecordSetPage, ResourceRecordSet};
use crate::store::DirStore;

////////////////////////////////////////////////////////////
// Fakes
////////////////////////////////////////////////////////////
#[derive(Default)]
struct FakeProvider {
    zones: Vec<HostedZone>,
    zone_page_size: usize,
    records: HashMap<String, Vec<ResourceRecordSet>>,
    record_page_size: usize,
    broken_zones: Vec<String>,
    fail_listing: bool,
}

fn page<T: Clone>(items: &[T], start: usize, size: usize) -> (Vec<T>, Option<usize>) {
    let end = (start + size).min(items.len());
    let next = (end < items.len()).then_some(end);
    (items[start..end].to_vec(), next)
}

#[async_trait]
impl ZoneProvider for FakeProvider {
    async fn list_hosted_zones_page(&self, marker: Option<&str>) -> Result<HostedZonePage> {
        if self.fail_listing {
            return Err(Error::api(
                "route53:ListHostedZones",
                ErrorKind::Terminal,
                "AccessDenied",
            ));
        }

        let start = marker.map_or(0, |m| m.parse().unwrap());
        let (zones, next) = page(&self.zones, start, self.zone_page_size);
        Ok(HostedZonePage {
            zones,
            next_marker: next.map(|n| n.to_string()),
        })
    }

    async fn list_record_sets_page(
        &self,
        zone_id: &str,
        cursor: Option<&RecordSetCursor>,
    ) -> Result<RecordSetPage> {
        if self.broken_zones.iter().any(|z| z == zone_id) {
            return Err(Error::api(
                "route53:ListResourceRecordSets",
                ErrorKind::Terminal,
                "NoSuchHostedZone",
            ));
        }

        let records = self.records.get(zone_id).cloned().unwrap_or_default();
        let start = cursor.map_or(0, |c| c.name.parse().unwrap());
        let (record_sets, next) = page(&records, start, self.record_page_size);
        Ok(RecordSetPage {
            record_sets,
            next: next.map(|n| RecordSetCursor {
                name: n.to_string(),
                record_type: None,
                identifier: None,
            }),
        })
    }
}

#[derive(Default)]
struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    transient_failures: Mutex<usize>,
}

impl MemoryStore {
    fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    fn json(&self, key: &str) -> serde_json::Value {
        let objects = self.objects.lock().unwrap();
        serde_json::from_slice(&objects[key]).unwrap()
    }
}

#[async_trait]
impl ObjectStore for Arc<MemoryStore> {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        {
            let mut failures = self.transient_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::api("s3:PutObject", ErrorKind::Retryable, "SlowDown"));
            }
        }

        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }
}

////////////////////////////////////////////////////////////
// Helpers
////////////////////////////////////////////////////////////
fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, 1, 1, 0).unwrap()
}

fn zone(short_id: &str, name: &str) -> HostedZone {
    HostedZone {
        id: format!("/hostedzone/{}", short_id),
        name: name.to_string(),
        caller_reference: format!("ref-{}", short_id),
        config: None,
        resource_record_set_count: None,
        linked_service: None,
    }
}

fn record_sets(zone: &str, count: usize) -> Vec<ResourceRecordSet> {
    (0..count)
        .map(|i| ResourceRecordSet::new(&format!("host{}.{}", i, zone), "A").with_values(300, &["192.0.2.10"]))
        .collect()
}

fn instant_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO, Duration::ZERO)
}

fn sample_provider() -> FakeProvider {
    let mut records = HashMap::new();
    records.insert("/hostedzone/ZA".to_string(), record_sets("a.example.", 5));
    records.insert("/hostedzone/ZB".to_string(), record_sets("b.example.", 1));
    records.insert("/hostedzone/ZC".to_string(), record_sets("c.example.", 0));

    FakeProvider {
        zones: vec![
            zone("ZA", "a.example."),
            zone("ZB", "b.example."),
            zone("ZC", "c.example."),
        ],
        zone_page_size: 2,
        records,
        record_page_size: 2,
        ..Default::default()
    }
}

////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////
#[tokio::test]
async fn test_backup_writes_info_and_records_per_zone() {
    let store = Arc::new(MemoryStore::default());
    let backup = Backup::new(sample_provider(), store.clone()).with_retry(instant_retry());

    let report = backup.run(at()).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.snapshot, "route53/2024-06-02_01-01-00");
    assert_eq!(report.zones, 3);
    assert_eq!(report.written.len(), 6);
    assert_eq!(report.written[0], "route53/2024-06-02_01-01-00/a_example-info.json");
    assert_eq!(report.written[1], "route53/2024-06-02_01-01-00/a_example-records.json");

    assert_eq!(
        store.keys(),
        vec![
            "route53/2024-06-02_01-01-00/a_example-info.json",
            "route53/2024-06-02_01-01-00/a_example-records.json",
            "route53/2024-06-02_01-01-00/b_example-info.json",
            "route53/2024-06-02_01-01-00/b_example-records.json",
            "route53/2024-06-02_01-01-00/c_example-info.json",
            "route53/2024-06-02_01-01-00/c_example-records.json",
        ]
    );

    let info = store.json("route53/2024-06-02_01-01-00/a_example-info.json");
    assert_eq!(info["Id"], "/hostedzone/ZA");
    assert_eq!(info["Name"], "a.example.");

    let records = store.json("route53/2024-06-02_01-01-00/a_example-records.json");
    assert_eq!(records["HostedZoneId"], "/hostedzone/ZA");
    let rrsets = records["ResourceRecordSets"].as_array().unwrap();
    assert_eq!(rrsets.len(), 5);
    assert_eq!(rrsets[4]["Name"], "host4.a.example.");
    assert_eq!(rrsets[0]["TTL"], 300);

    let records = store.json("route53/2024-06-02_01-01-00/c_example-records.json");
    assert_eq!(records["ResourceRecordSets"], serde_json::json!([]));
}

#[tokio::test]
async fn test_backup_continues_after_zone_failure() {
    let mut provider = sample_provider();
    provider.broken_zones.push("/hostedzone/ZB".to_string());

    let store = Arc::new(MemoryStore::default());
    let backup = Backup::new(provider, store.clone()).with_retry(instant_retry());

    let report = backup.run(at()).await.unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].zone_id, "/hostedzone/ZB");
    assert_eq!(report.failed[0].zone_name, "b.example.");
    assert_eq!(report.written.len(), 4);
    assert!(!store.keys().iter().any(|k| k.contains("b_example")));
}

#[tokio::test]
async fn test_backup_fails_when_zones_cannot_be_listed() {
    let provider = FakeProvider {
        fail_listing: true,
        ..sample_provider()
    };
    let store = Arc::new(MemoryStore::default());
    let backup = Backup::new(provider, store.clone()).with_retry(instant_retry());

    let err = backup.run(at()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Terminal);
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn test_backup_retries_transient_store_failures() {
    let store = Arc::new(MemoryStore::default());
    *store.transient_failures.lock().unwrap() = 2;
    let backup = Backup::new(sample_provider(), store.clone()).with_retry(instant_retry());

    let report = backup.run(at()).await.unwrap();
    assert!(report.is_success());
    assert_eq!(store.keys().len(), 6);
}

#[tokio::test]
async fn test_backup_store_failure_beyond_retries_marks_zone_failed() {
    let store = Arc::new(MemoryStore::default());
    *store.transient_failures.lock().unwrap() = 3;
    let backup = Backup::new(sample_provider(), store.clone()).with_retry(instant_retry());

    let report = backup.run(at()).await.unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].zone_id, "/hostedzone/ZA");
    assert_eq!(store.keys().len(), 4);
}

#[tokio::test]
async fn test_backup_without_zones() {
    let store = Arc::new(MemoryStore::default());
    let backup = Backup::new(FakeProvider { zone_page_size: 10, ..Default::default() }, store.clone());

    let report = backup.run(at()).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.zones, 0);
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn test_backup_to_dir_store_with_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    let backup = Backup::new(sample_provider(), DirStore::new(tmp.path()))
        .with_retry(instant_retry())
        .with_prefix("dns/");

    let report = backup.run(at()).await.unwrap();
    assert!(report.is_success());

    let path = tmp
        .path()
        .join("dns")
        .join("2024-06-02_01-01-00")
        .join("b_example-records.json");
    let records: ZoneRecordSets = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(records.hosted_zone_id, "/hostedzone/ZB");
    assert_eq!(records.resource_record_sets.len(), 1);
}
