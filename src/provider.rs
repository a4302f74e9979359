use std::collections::HashSet;

use async_trait::async_trait;
use log::debug;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

mod types;
pub use types::*;

pub mod route53;

/// Read-only view of a DNS provider, one page at a time.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    async fn list_hosted_zones_page(&self, marker: Option<&str>) -> Result<HostedZonePage>;

    async fn list_record_sets_page(
        &self,
        zone_id: &str,
        cursor: Option<&RecordSetCursor>,
    ) -> Result<RecordSetPage>;
}

/// Collects every hosted zone, following markers until the last page. A
/// marker handed out twice ends the listing with a pagination error.
pub async fn list_hosted_zones<P>(provider: &P, retry: &RetryPolicy) -> Result<Vec<HostedZone>>
where
    P: ZoneProvider + ?Sized,
{
    let mut zones = Vec::new();
    let mut marker: Option<String> = None;
    let mut seen: HashSet<String> = HashSet::new();

    loop {
        let page = retry
            .call("list_hosted_zones", || {
                provider.list_hosted_zones_page(marker.as_deref())
            })
            .await?;
        zones.extend(page.zones);

        match page.next_marker {
            None => break,
            Some(next) if !seen.insert(next.clone()) => {
                return Err(Error::PaginationError(format!(
                    "hosted zone listing returned marker {} twice",
                    next
                )));
            }
            Some(next) => marker = Some(next),
        }
    }

    debug!("listed {} hosted zones", zones.len());
    Ok(zones)
}

/// Collects every record set of `zone_id`, following cursors until the
/// last page. A cursor handed out twice ends the listing with a pagination
/// error.
pub async fn list_record_sets<P>(
    provider: &P,
    zone_id: &str,
    retry: &RetryPolicy,
) -> Result<Vec<ResourceRecordSet>>
where
    P: ZoneProvider + ?Sized,
{
    let mut record_sets = Vec::new();
    let mut cursor: Option<RecordSetCursor> = None;
    let mut seen: HashSet<RecordSetCursor> = HashSet::new();

    loop {
        let page = retry
            .call("list_resource_record_sets", || {
                provider.list_record_sets_page(zone_id, cursor.as_ref())
            })
            .await?;
        record_sets.extend(page.record_sets);

        match page.next {
            None => break,
            Some(next) if !seen.insert(next.clone()) => {
                return Err(Error::PaginationError(format!(
                    "record set listing of {} returned cursor {:?} twice",
                    zone_id, next
                )));
            }
            Some(next) => cursor = Some(next),
        }
    }

    debug!("listed {} record sets in {}", record_sets.len(), zone_id);
    Ok(record_sets)
}
