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

use super::{
    Declared, Distribution, Handle, HostedZone, LogicalId, RemovalPolicy, ResourceKind,
    ResourceSpec,
};
use crate::infrastructure::constants::RECORD_TYPE_ALIAS;
use crate::shared::error::{Result, StackError};

/// A-type alias record pointing at a distribution
#[derive(Debug, Clone)]
pub struct AliasRecord {
    pub zone: Handle<HostedZone>,
    pub record_name: String,
    pub target: Handle<Distribution>,
    pub removal_policy: RemovalPolicy,
}

impl AliasRecord {
    pub fn new(
        zone: &Handle<HostedZone>,
        record_name: impl Into<String>,
        target: &Handle<Distribution>,
    ) -> Self {
        Self {
            zone: zone.clone(),
            record_name: record_name.into(),
            target: target.clone(),
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    pub fn record_type(&self) -> &'static str {
        RECORD_TYPE_ALIAS
    }

    /// Absolute record name. Names not already inside the zone are treated
    /// as relative to it.
    pub fn qualified_name(&self, zone: &HostedZone) -> String {
        let name = self.record_name.trim_end_matches('.').to_lowercase();
        if name.is_empty() {
            zone.zone_name()
        } else if zone.contains(&name) {
            format!("{}.", name)
        } else {
            format!("{}.{}", name, zone.zone_name())
        }
    }
}

impl Declared for AliasRecord {
    const KIND: ResourceKind = ResourceKind::AliasRecord;

    fn dependencies(&self) -> Vec<(LogicalId, ResourceKind)> {
        vec![
            (self.zone.id().clone(), ResourceKind::HostedZone),
            (self.target.id().clone(), ResourceKind::Distribution),
        ]
    }

    fn check(&self) -> Result<()> {
        if self.record_name.contains('*') {
            return Err(StackError::InvalidResource(format!(
                "Alias record name '{}' must not contain a wildcard",
                self.record_name
            )));
        }
        Ok(())
    }

    fn into_spec(self) -> ResourceSpec {
        ResourceSpec::AliasRecord(self)
    }

    fn from_spec(spec: &ResourceSpec) -> Option<&Self> {
        match spec {
            ResourceSpec::AliasRecord(record) => Some(record),
            _ => None,
        }
    }
}
