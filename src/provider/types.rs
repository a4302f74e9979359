use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////
// Hosted zone
////////////////////////////////////////////////////////////
const ZONE_ID_PATH: &str = "/hostedzone/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default)]
    pub private_zone: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LinkedService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A hosted zone as the provider describes it; serialized with the
/// provider's own key names so a backup reads like an API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZone {
    pub id: String,
    pub name: String,
    pub caller_reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<HostedZoneConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_record_set_count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_service: Option<LinkedService>,
}

impl HostedZone {
    /// The zone id without its `/hostedzone/` path.
    pub fn short_id(&self) -> &str {
        self.id.strip_prefix(ZONE_ID_PATH).unwrap_or(&self.id)
    }

    pub fn is_private(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.private_zone)
    }
}

////////////////////////////////////////////////////////////
// Record set
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecord {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasTarget {
    pub hosted_zone_id: String,

    #[serde(rename = "DNSName")]
    pub dns_name: String,

    pub evaluate_target_health: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeoLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CidrRoutingConfig {
    pub collection_id: String,
    pub location_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecordSet {
    pub name: String,

    #[serde(rename = "Type")]
    pub r#type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<GeoLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_answer: Option<bool>,

    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_records: Option<Vec<ResourceRecord>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_target: Option<AliasTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_policy_instance_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_routing_config: Option<CidrRoutingConfig>,
}

impl ResourceRecordSet {
    pub fn new(name: &str, r#type: &str) -> Self {
        Self {
            name: name.to_string(),
            r#type: r#type.to_string(),
            set_identifier: None,
            weight: None,
            region: None,
            geo_location: None,
            failover: None,
            multi_value_answer: None,
            ttl: None,
            resource_records: None,
            alias_target: None,
            health_check_id: None,
            traffic_policy_instance_id: None,
            cidr_routing_config: None,
        }
    }

    pub fn with_values(mut self, ttl: i64, values: &[&str]) -> Self {
        self.ttl = Some(ttl);
        self.resource_records = Some(
            values
                .iter()
                .map(|v| ResourceRecord {
                    value: v.to_string(),
                })
                .collect(),
        );
        self
    }
}

/// Body of a `*-records.json` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneRecordSets {
    pub hosted_zone_id: String,
    pub resource_record_sets: Vec<ResourceRecordSet>,
}

////////////////////////////////////////////////////////////
// Pages
////////////////////////////////////////////////////////////
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostedZonePage {
    pub zones: Vec<HostedZone>,
    pub next_marker: Option<String>,
}

/// Where the next page of record sets starts. Record set listings are
/// ordered by name, then type, then set identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordSetCursor {
    pub name: String,
    pub record_type: Option<String>,
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSetPage {
    pub record_sets: Vec<ResourceRecordSet>,
    pub next: Option<RecordSetCursor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_set_serialize_uses_provider_keys() {
        let mut rrset = ResourceRecordSet::new("www.example.com.", "A").with_values(300, &["192.0.2.1"]);
        rrset.set_identifier = Some("blue".to_string());
        rrset.weight = Some(10);

        let json = serde_json::to_value(&rrset).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Name": "www.example.com.",
                "Type": "A",
                "SetIdentifier": "blue",
                "Weight": 10,
                "TTL": 300,
                "ResourceRecords": [{"Value": "192.0.2.1"}],
            })
        );
    }

    #[test]
    fn test_alias_target_deserialize() {
        let json = r#"{
            "Name": "example.com.",
            "Type": "A",
            "AliasTarget": {
                "HostedZoneId": "Z2FDTNDATAQYW2",
                "DNSName": "d111111abcdef8.cloudfront.net.",
                "EvaluateTargetHealth": false
            }
        }"#;
        let rrset: ResourceRecordSet = serde_json::from_str(json).unwrap();
        let alias = rrset.alias_target.unwrap();
        assert_eq!(alias.dns_name, "d111111abcdef8.cloudfront.net.");
        assert_eq!(rrset.ttl, None);
        assert_eq!(rrset.resource_records, None);
    }

    #[test]
    fn test_hosted_zone_short_id() {
        let json = r#"{
            "Id": "/hostedzone/Z0123456789ABC",
            "Name": "example.com.",
            "CallerReference": "ref-1",
            "Config": {"Comment": "internal", "PrivateZone": true},
            "ResourceRecordSetCount": 4
        }"#;
        let zone: HostedZone = serde_json::from_str(json).unwrap();
        assert_eq!(zone.short_id(), "Z0123456789ABC");
        assert!(zone.is_private());

        let zone = HostedZone {
            id: "Z0123456789ABC".to_string(),
            config: None,
            ..zone
        };
        assert_eq!(zone.short_id(), "Z0123456789ABC");
        assert!(!zone.is_private());
    }
}
