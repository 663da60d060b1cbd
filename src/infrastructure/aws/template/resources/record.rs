// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::traits::ResourceBuilder;
use crate::domain::resources::{AliasRecord, HostedZone, LogicalId, RemovalPolicy};
use crate::infrastructure::aws::template::get_att;
use crate::infrastructure::constants::{CLOUDFRONT_HOSTED_ZONE_ID, TYPE_RECORD_SET};
use crate::shared::error::Result;
use serde_json::{json, Value};

pub struct RecordSetBuilder<'a> {
    logical_id: &'a LogicalId,
    record: &'a AliasRecord,
    zone: &'a HostedZone,
}

impl<'a> RecordSetBuilder<'a> {
    pub fn new(logical_id: &'a LogicalId, record: &'a AliasRecord, zone: &'a HostedZone) -> Self {
        Self {
            logical_id,
            record,
            zone,
        }
    }
}

impl ResourceBuilder for RecordSetBuilder<'_> {
    fn logical_id(&self) -> &LogicalId {
        self.logical_id
    }

    fn resource_type(&self) -> &'static str {
        TYPE_RECORD_SET
    }

    fn removal_policy(&self) -> Option<RemovalPolicy> {
        match self.record.removal_policy {
            RemovalPolicy::Destroy => None,
            other => Some(other),
        }
    }

    fn build_properties(&self) -> Result<Value> {
        Ok(json!({
            "Name": self.record.qualified_name(self.zone),
            "Type": self.record.record_type(),
            "AliasTarget": {
                "DNSName": get_att(self.record.target.id(), "DomainName"),
                "HostedZoneId": CLOUDFRONT_HOSTED_ZONE_ID,
            },
            "HostedZoneId": self.zone.hosted_zone_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resources::Handle;

    #[test]
    fn test_alias_record_set() {
        let zone = HostedZone::new("example.com", "/hostedzone/Z1");
        let record = AliasRecord::new(
            &Handle::new(LogicalId::new("Zone").unwrap()),
            "assets",
            &Handle::new(LogicalId::new("Cdn").unwrap()),
        );
        let id = LogicalId::new("Record").unwrap();
        let resource = RecordSetBuilder::new(&id, &record, &zone)
            .build_primary()
            .unwrap();

        let props = &resource.properties;
        assert_eq!(props["Name"], "assets.example.com.");
        assert_eq!(props["Type"], "A");
        assert_eq!(props["HostedZoneId"], "Z1");
        assert_eq!(
            props["AliasTarget"]["DNSName"],
            json!({"Fn::GetAtt": ["Cdn", "DomainName"]})
        );
        assert_eq!(props["AliasTarget"]["HostedZoneId"], CLOUDFRONT_HOSTED_ZONE_ID);
    }
}
