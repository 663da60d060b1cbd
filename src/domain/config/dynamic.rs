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

use crate::domain::config::stack::{normalize_domain, RemovalProfile, StackConfig};
use crate::shared::error::{Result, StackError};
use std::collections::HashMap;

/// Keys accepted by `-D key=value`
pub const DYNAMIC_KEYS: &[&str] = &[
    "stack.name",
    "stack.domain-name",
    "stack.asset-subdomain",
    "stack.bucket-name",
    "stack.context-file",
    "stack.removal-profile",
    "env.account",
    "env.region",
    "zone.hosted-zone-id",
];

/// Parse `-D key=value` properties
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let (key, value) = config.split_once('=').ok_or_else(|| {
            StackError::config_error(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(StackError::config_error(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

pub fn apply_to_stack_config(
    configs: &HashMap<String, String>,
    conf: &mut StackConfig,
) -> Result<()> {
    for key in configs.keys() {
        if !DYNAMIC_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "ignoring unknown dynamic config key");
        }
    }

    if let Some(name) = configs.get("stack.name") {
        conf.stack_name = name.clone();
    }

    if let Some(domain) = configs.get("stack.domain-name") {
        conf.domain_name = normalize_domain(domain);
    }

    if let Some(subdomain) = configs.get("stack.asset-subdomain") {
        conf.asset_subdomain = subdomain.to_lowercase();
    }

    if let Some(bucket) = configs.get("stack.bucket-name") {
        conf.bucket_name = bucket.clone();
    }

    if let Some(path) = configs.get("stack.context-file") {
        conf.context_file = path.clone();
    }

    if let Some(profile) = configs.get("stack.removal-profile") {
        conf.removal_profile = profile.parse::<RemovalProfile>()?;
    }

    if let Some(account) = configs.get("env.account") {
        conf.env.account = non_empty(account);
    }

    if let Some(region) = configs.get("env.region") {
        conf.env.region = non_empty(region);
    }

    if let Some(zone_id) = configs.get("zone.hosted-zone-id") {
        conf.zone.hosted_zone_id = non_empty(zone_id);
    }

    Ok(())
}

/// Empty values unset an optional setting
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dynamic_configs() {
        let props = vec![
            "stack.domain-name=example.com".to_string(),
            "env.region = us-east-1".to_string(),
        ];
        let map = parse_dynamic_configs(&props).unwrap();
        assert_eq!(map.get("stack.domain-name").unwrap(), "example.com");
        assert_eq!(map.get("env.region").unwrap(), "us-east-1");
    }

    #[test]
    fn test_parse_dynamic_configs_rejects_malformed() {
        assert!(parse_dynamic_configs(&["no-equals".to_string()]).is_err());
        assert!(parse_dynamic_configs(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut conf = StackConfig::default();
        let mut map = HashMap::new();
        map.insert("stack.domain-name".to_string(), "Example.COM".to_string());
        map.insert("stack.asset-subdomain".to_string(), "cdn".to_string());
        map.insert("stack.removal-profile".to_string(), "retain".to_string());
        map.insert("zone.hosted-zone-id".to_string(), "Z123".to_string());
        map.insert("env.account".to_string(), "".to_string());

        apply_to_stack_config(&map, &mut conf).unwrap();

        assert_eq!(conf.domain_name, "example.com");
        assert_eq!(conf.asset_domain(), "cdn.example.com");
        assert_eq!(conf.removal_profile, RemovalProfile::Retain);
        assert_eq!(conf.zone.hosted_zone_id.as_deref(), Some("Z123"));
        assert_eq!(conf.env.account, None);
    }

    #[test]
    fn test_absolute_domain_name_is_normalized() {
        let mut conf = StackConfig::default();
        let mut map = HashMap::new();
        map.insert("stack.domain-name".to_string(), "Example.com.".to_string());

        apply_to_stack_config(&map, &mut conf).unwrap();

        assert_eq!(conf.domain_name, "example.com");
        assert_eq!(conf.asset_domain(), "assets.example.com");
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_invalid_removal_profile_fails() {
        let mut conf = StackConfig::default();
        let mut map = HashMap::new();
        map.insert("stack.removal-profile".to_string(), "sometimes".to_string());
        assert!(apply_to_stack_config(&map, &mut conf).is_err());
    }
}
