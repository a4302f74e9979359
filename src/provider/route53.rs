use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_route53::Client;
use aws_sdk_route53::types as sdk;

use crate::error::{Error, Result};

use super::{
    AliasTarget, CidrRoutingConfig, GeoLocation, HostedZone, HostedZoneConfig, HostedZonePage,
    LinkedService, RecordSetCursor, RecordSetPage, ResourceRecord, ResourceRecordSet,
    ZoneProvider,
};

const OP_LIST_HOSTED_ZONES: &str = "route53:ListHostedZones";
const OP_LIST_RECORD_SETS: &str = "route53:ListResourceRecordSets";

/// Amazon Route 53 through the AWS SDK.
#[derive(Debug, Clone)]
pub struct Route53 {
    client: Client,
}

impl Route53 {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ZoneProvider for Route53 {
    async fn list_hosted_zones_page(&self, marker: Option<&str>) -> Result<HostedZonePage> {
        let out = self
            .client
            .list_hosted_zones()
            .set_marker(marker.map(str::to_string))
            .send()
            .await
            .map_err(|e| Error::from_sdk(OP_LIST_HOSTED_ZONES, e))?;

        let next_marker = next_zone_marker(out.is_truncated, out.next_marker)?;

        Ok(HostedZonePage {
            zones: out.hosted_zones.into_iter().map(HostedZone::from).collect(),
            next_marker,
        })
    }

    async fn list_record_sets_page(
        &self,
        zone_id: &str,
        cursor: Option<&RecordSetCursor>,
    ) -> Result<RecordSetPage> {
        let out = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .set_start_record_name(cursor.map(|c| c.name.clone()))
            .set_start_record_type(
                cursor
                    .and_then(|c| c.record_type.as_deref())
                    .map(sdk::RrType::from),
            )
            .set_start_record_identifier(cursor.and_then(|c| c.identifier.clone()))
            .send()
            .await
            .map_err(|e| Error::from_sdk(OP_LIST_RECORD_SETS, e))?;

        let next = next_record_cursor(
            zone_id,
            out.is_truncated,
            out.next_record_name,
            out.next_record_type.map(|t| t.as_str().to_string()),
            out.next_record_identifier,
        )?;

        Ok(RecordSetPage {
            record_sets: out
                .resource_record_sets
                .into_iter()
                .map(ResourceRecordSet::from)
                .collect(),
            next,
        })
    }
}

////////////////////////////////////////////////////////////
// Page continuation
////////////////////////////////////////////////////////////
fn next_zone_marker(is_truncated: bool, next_marker: Option<String>) -> Result<Option<String>> {
    match (is_truncated, next_marker) {
        (false, _) => Ok(None),
        (true, Some(next)) => Ok(Some(next)),
        (true, None) => Err(Error::PaginationError(
            "hosted zone listing is truncated but carries no next marker".to_string(),
        )),
    }
}

fn next_record_cursor(
    zone_id: &str,
    is_truncated: bool,
    name: Option<String>,
    record_type: Option<String>,
    identifier: Option<String>,
) -> Result<Option<RecordSetCursor>> {
    match (is_truncated, name) {
        (false, _) => Ok(None),
        (true, Some(name)) => Ok(Some(RecordSetCursor {
            name,
            record_type,
            identifier,
        })),
        (true, None) => Err(Error::PaginationError(format!(
            "record set listing of {} is truncated but carries no next record name",
            zone_id
        ))),
    }
}

////////////////////////////////////////////////////////////
// SDK conversions
////////////////////////////////////////////////////////////
impl From<sdk::HostedZone> for HostedZone {
    fn from(zone: sdk::HostedZone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            caller_reference: zone.caller_reference,
            config: zone.config.map(|c| HostedZoneConfig {
                comment: c.comment,
                private_zone: c.private_zone,
            }),
            resource_record_set_count: zone.resource_record_set_count,
            linked_service: zone.linked_service.map(|l| LinkedService {
                service_principal: l.service_principal,
                description: l.description,
            }),
        }
    }
}

impl From<sdk::ResourceRecordSet> for ResourceRecordSet {
    fn from(rrset: sdk::ResourceRecordSet) -> Self {
        Self {
            name: rrset.name,
            r#type: rrset.r#type.as_str().to_string(),
            set_identifier: rrset.set_identifier,
            weight: rrset.weight,
            region: rrset.region.map(|r| r.as_str().to_string()),
            geo_location: rrset.geo_location.map(|g| GeoLocation {
                continent_code: g.continent_code,
                country_code: g.country_code,
                subdivision_code: g.subdivision_code,
            }),
            failover: rrset.failover.map(|f| f.as_str().to_string()),
            multi_value_answer: rrset.multi_value_answer,
            ttl: rrset.ttl,
            resource_records: rrset.resource_records.map(|records| {
                records
                    .into_iter()
                    .map(|r| ResourceRecord { value: r.value })
                    .collect()
            }),
            alias_target: rrset.alias_target.map(|a| AliasTarget {
                hosted_zone_id: a.hosted_zone_id,
                dns_name: a.dns_name,
                evaluate_target_health: a.evaluate_target_health,
            }),
            health_check_id: rrset.health_check_id,
            traffic_policy_instance_id: rrset.traffic_policy_instance_id,
            cidr_routing_config: rrset.cidr_routing_config.map(|c| CidrRoutingConfig {
                collection_id: c.collection_id,
                location_name: c.location_name,
            }),
        }
    }
}
