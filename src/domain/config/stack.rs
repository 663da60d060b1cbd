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

//! Stack configuration loaded from `asset-store.toml`

use crate::infrastructure::constants::{
    DEFAULT_ASSET_SUBDOMAIN, DEFAULT_BUCKET_NAME, DEFAULT_CONTEXT_FILE, DEFAULT_DOMAIN_NAME,
    DEFAULT_STACK_NAME, ENV_ACCOUNT, ENV_REGION,
};
use crate::shared::error::{Result, StackError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StackConfig {
    pub stack_name: String,
    pub domain_name: String,
    pub asset_subdomain: String,
    pub bucket_name: String,
    pub env: EnvConf,
    pub zone: ZoneConf,
    pub context_file: String,
    pub removal_profile: RemovalProfile,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            stack_name: DEFAULT_STACK_NAME.to_string(),
            domain_name: DEFAULT_DOMAIN_NAME.to_string(),
            asset_subdomain: DEFAULT_ASSET_SUBDOMAIN.to_string(),
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            env: EnvConf::default(),
            zone: ZoneConf::default(),
            context_file: DEFAULT_CONTEXT_FILE.to_string(),
            removal_profile: RemovalProfile::default(),
        }
    }
}

/// Target account and region. Either may stay unresolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EnvConf {
    pub account: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ZoneConf {
    /// Pins the zone id and skips the context lookup
    pub hosted_zone_id: Option<String>,
}

/// Teardown behavior applied to the certificate and the bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemovalProfile {
    #[default]
    Disposable,
    Retain,
}

impl RemovalProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalProfile::Disposable => "disposable",
            RemovalProfile::Retain => "retain",
        }
    }
}

impl std::str::FromStr for RemovalProfile {
    type Err = StackError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disposable" | "destroy" => Ok(RemovalProfile::Disposable),
            "retain" => Ok(RemovalProfile::Retain),
            _ => Err(StackError::ConfigError(format!(
                "Invalid removal profile: {}",
                s
            ))),
        }
    }
}

impl StackConfig {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            StackError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), stack = %conf.stack_name, "loaded stack config");
        Ok(conf)
    }

    /// Override account/region from the process environment. Empty values
    /// are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(account) = std::env::var(ENV_ACCOUNT) {
            if !account.trim().is_empty() {
                self.env.account = Some(account.trim().to_string());
            }
        }
        if let Ok(region) = std::env::var(ENV_REGION) {
            if !region.trim().is_empty() {
                self.env.region = Some(region.trim().to_string());
            }
        }
    }

    /// Fully-qualified name the distribution and the alias record are served on
    pub fn asset_domain(&self) -> String {
        format!("{}.{}", self.asset_subdomain, self.domain_name)
    }

    pub fn validate(&self) -> Result<()> {
        let stack_re = Regex::new(r"^[A-Za-z][A-Za-z0-9-]{0,127}$")
            .map_err(|e| StackError::config_error(e.to_string()))?;
        if !stack_re.is_match(&self.stack_name) {
            return Err(StackError::config_error(format!(
                "Invalid stack_name '{}': must start with a letter and contain only letters, digits and '-'",
                self.stack_name
            )));
        }

        if !is_valid_domain(&self.domain_name) {
            return Err(StackError::config_error(format!(
                "Invalid domain_name '{}'",
                self.domain_name
            )));
        }

        let label_re = Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$")
            .map_err(|e| StackError::config_error(e.to_string()))?;
        if !label_re.is_match(&self.asset_subdomain) {
            return Err(StackError::config_error(format!(
                "Invalid asset_subdomain '{}': must be a single DNS label",
                self.asset_subdomain
            )));
        }

        let bucket_re = Regex::new(r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$")
            .map_err(|e| StackError::config_error(e.to_string()))?;
        if !bucket_re.is_match(&self.bucket_name) || self.bucket_name.contains("..") {
            return Err(StackError::config_error(format!(
                "Invalid bucket_name '{}'",
                self.bucket_name
            )));
        }

        if let Some(ref account) = self.env.account {
            let account_re = Regex::new(r"^\d{12}$")
                .map_err(|e| StackError::config_error(e.to_string()))?;
            if !account_re.is_match(account) {
                return Err(StackError::config_error(format!(
                    "Invalid account '{}': expected a 12-digit account id",
                    account
                )));
            }
        }

        if let Some(ref region) = self.env.region {
            let region_re = Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]?)?-[a-z]+-\d$")
                .map_err(|e| StackError::config_error(e.to_string()))?;
            if !region_re.is_match(region) {
                return Err(StackError::config_error(format!(
                    "Invalid region '{}'",
                    region
                )));
            }
        }

        if self.context_file.trim().is_empty() {
            return Err(StackError::config_error("context_file must not be empty"));
        }

        Ok(())
    }
}

/// Lowercase form without the trailing dot of an absolute name
pub fn normalize_domain(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}

/// Lowercase DNS name with at least two labels, no trailing dot
pub fn is_valid_domain(name: &str) -> bool {
    match Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z][a-z0-9-]{0,61}[a-z0-9]$") {
        Ok(re) => name.len() <= 253 && re.is_match(name),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let conf = StackConfig::default();
        assert!(conf.validate().is_ok());
        assert_eq!(conf.asset_domain(), "assets.yourdomain.com");
        assert_eq!(conf.removal_profile, RemovalProfile::Disposable);
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let mut conf = StackConfig::default();
        conf.domain_name = "not a domain".to_string();
        assert!(conf.validate().is_err());

        conf.domain_name = "Example.com".to_string();
        assert!(conf.validate().is_err());

        conf.domain_name = "localhost".to_string();
        assert!(conf.validate().is_err());
    }

    #[test]
    fn test_invalid_account_and_region_rejected() {
        let mut conf = StackConfig::default();
        conf.env.account = Some("xxxxxxx".to_string());
        assert!(conf.validate().is_err());

        conf.env.account = Some("123456789012".to_string());
        conf.env.region = Some("moon-1".to_string());
        assert!(conf.validate().is_err());

        conf.env.region = Some("us-east-1".to_string());
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_removal_profile_from_str() {
        assert_eq!(
            "retain".parse::<RemovalProfile>().unwrap(),
            RemovalProfile::Retain
        );
        assert_eq!(
            "Destroy".parse::<RemovalProfile>().unwrap(),
            RemovalProfile::Disposable
        );
        assert!("snapshot".parse::<RemovalProfile>().is_err());
    }

    #[test]
    fn test_domain_validation() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("assets.example.co.uk"));
        assert!(!is_valid_domain("example.com."));
        assert!(!is_valid_domain("-bad.example.com"));
        assert!(!is_valid_domain("*.example.com"));
    }
}
