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

//! Hosted zone lookups resolved before any resource is declared

use crate::domain::resources::HostedZone;
use crate::domain::stack::Environment;
use crate::shared::error::{Result, StackError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneQuery {
    pub domain_name: String,
    pub account: String,
    pub region: String,
}

impl ZoneQuery {
    pub fn new(domain_name: &str, env: &Environment) -> Self {
        Self {
            domain_name: domain_name.trim_end_matches('.').to_lowercase(),
            account: env.account_or_unknown().to_string(),
            region: env.region_or_unknown().to_string(),
        }
    }

    /// Key under which the lookup is cached in the context file
    pub fn context_key(&self) -> String {
        format!(
            "hosted-zone:account={}:domainName={}:region={}",
            self.account, self.domain_name, self.region
        )
    }

    fn matches(&self, zone: &HostedZone) -> bool {
        zone.domain_name == self.domain_name
    }
}

#[async_trait::async_trait]
pub trait HostedZoneProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn find_zone(&self, query: &ZoneQuery) -> Result<Option<HostedZone>>;

    async fn lookup(&self, query: &ZoneQuery) -> Result<HostedZone> {
        match self.find_zone(query).await? {
            Some(zone) => Ok(zone),
            None => Err(StackError::zone_not_found(
                &query.domain_name,
                &query.account,
                &query.region,
            )),
        }
    }
}

/// Zones known up front, e.g. an id pinned in configuration
#[derive(Debug, Clone, Default)]
pub struct StaticZoneProvider {
    zones: Vec<HostedZone>,
}

impl StaticZoneProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, domain_name: &str, hosted_zone_id: &str) -> Self {
        self.zones.push(HostedZone::new(domain_name, hosted_zone_id));
        self
    }
}

#[async_trait::async_trait]
impl HostedZoneProvider for StaticZoneProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn find_zone(&self, query: &ZoneQuery) -> Result<Option<HostedZone>> {
        Ok(self.zones.iter().find(|z| query.matches(z)).cloned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneContextValue {
    pub id: String,
    pub name: String,
}

/// Lookup cache file: a JSON object of context keys to zone values
#[derive(Debug, Clone)]
pub struct ContextFileZoneProvider {
    path: PathBuf,
}

impl ContextFileZoneProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_context(&self) -> Result<Option<BTreeMap<String, serde_json::Value>>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let map: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)
                    .map_err(|e| {
                        StackError::config_error(format!(
                            "Failed to parse context file {}: {}",
                            self.path.display(),
                            e
                        ))
                    })?;
                Ok(Some(map))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "context file not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl HostedZoneProvider for ContextFileZoneProvider {
    fn name(&self) -> &'static str {
        "context-file"
    }

    async fn find_zone(&self, query: &ZoneQuery) -> Result<Option<HostedZone>> {
        let context = match self.read_context().await? {
            Some(context) => context,
            None => return Ok(None),
        };

        let key = query.context_key();
        let value = match context.get(&key) {
            Some(value) => value.clone(),
            None => {
                tracing::debug!(key = %key, "no cached zone lookup");
                return Ok(None);
            }
        };

        let value: ZoneContextValue = serde_json::from_value(value).map_err(|e| {
            StackError::config_error(format!("Malformed context value for '{}': {}", key, e))
        })?;

        let zone = HostedZone::new(&value.name, &value.id);
        if !query.matches(&zone) {
            tracing::warn!(
                key = %key,
                name = %value.name,
                "cached zone name does not match lookup"
            );
            return Ok(None);
        }
        Ok(Some(zone))
    }
}

/// Tries each provider in order; the first hit wins
#[derive(Default)]
pub struct ChainedZoneProvider {
    providers: Vec<Box<dyn HostedZoneProvider>>,
}

impl ChainedZoneProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, provider: Box<dyn HostedZoneProvider>) -> Self {
        self.providers.push(provider);
        self
    }
}

#[async_trait::async_trait]
impl HostedZoneProvider for ChainedZoneProvider {
    fn name(&self) -> &'static str {
        "chained"
    }

    async fn find_zone(&self, query: &ZoneQuery) -> Result<Option<HostedZone>> {
        for provider in &self.providers {
            if let Some(zone) = provider.find_zone(query).await? {
                tracing::debug!(
                    provider = provider.name(),
                    zone = %zone.hosted_zone_id,
                    "zone resolved"
                );
                return Ok(Some(zone));
            }
        }
        Ok(None)
    }
}
