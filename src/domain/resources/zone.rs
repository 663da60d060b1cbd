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

use super::{Declared, LogicalId, ResourceKind, ResourceSpec};
use crate::infrastructure::constants::HOSTED_ZONE_ID_PREFIX;
use crate::shared::error::{Result, StackError};
use serde::{Deserialize, Serialize};

/// A pre-existing DNS zone. Looked up, never created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    pub domain_name: String,
    pub hosted_zone_id: String,
}

impl HostedZone {
    pub fn new(domain_name: impl Into<String>, hosted_zone_id: impl Into<String>) -> Self {
        let domain_name = domain_name.into();
        Self {
            domain_name: domain_name.trim_end_matches('.').to_lowercase(),
            hosted_zone_id: normalize_zone_id(&hosted_zone_id.into()),
        }
    }

    /// Zone name in absolute form, e.g. `example.com.`
    pub fn zone_name(&self) -> String {
        format!("{}.", self.domain_name)
    }

    /// Whether `name` is the apex or lies below it
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim_end_matches('.').to_lowercase();
        name == self.domain_name || name.ends_with(&format!(".{}", self.domain_name))
    }
}

/// Strip the `/hostedzone/` prefix Route53 puts on ids
pub fn normalize_zone_id(id: &str) -> String {
    id.trim()
        .strip_prefix(HOSTED_ZONE_ID_PREFIX)
        .unwrap_or(id.trim())
        .to_string()
}

impl Declared for HostedZone {
    const KIND: ResourceKind = ResourceKind::HostedZone;

    fn dependencies(&self) -> Vec<(LogicalId, ResourceKind)> {
        Vec::new()
    }

    fn check(&self) -> Result<()> {
        if self.hosted_zone_id.is_empty() {
            return Err(StackError::InvalidResource(format!(
                "Hosted zone '{}' has an empty id",
                self.domain_name
            )));
        }
        Ok(())
    }

    fn into_spec(self) -> ResourceSpec {
        ResourceSpec::HostedZone(self)
    }

    fn from_spec(spec: &ResourceSpec) -> Option<&Self> {
        match spec {
            ResourceSpec::HostedZone(zone) => Some(zone),
            _ => None,
        }
    }
}
