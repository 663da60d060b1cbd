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

use asset_store_stack::domain::config::{apply_to_stack_config, parse_dynamic_configs};
use asset_store_stack::{RemovalProfile, StackConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_file() {
    let file = write_config(
        r#"
stack_name = "MediaAssets"
domain_name = "example.com"
asset_subdomain = "media"
bucket_name = "media-assets-example"
context_file = "cdk.context.json"
removal_profile = "retain"

[env]
account = "123456789012"
region = "us-east-1"

[zone]
hosted_zone_id = "Z0123456789ABC"
"#,
    );

    let conf = StackConfig::from(file.path()).unwrap();
    assert_eq!(conf.stack_name, "MediaAssets");
    assert_eq!(conf.asset_domain(), "media.example.com");
    assert_eq!(conf.bucket_name, "media-assets-example");
    assert_eq!(conf.context_file, "cdk.context.json");
    assert_eq!(conf.removal_profile, RemovalProfile::Retain);
    assert_eq!(conf.env.account.as_deref(), Some("123456789012"));
    assert_eq!(conf.zone.hosted_zone_id.as_deref(), Some("Z0123456789ABC"));
    assert!(conf.validate().is_ok());
}

#[test]
fn test_partial_config_uses_defaults() {
    let file = write_config("domain_name = \"example.org\"\n");

    let conf = StackConfig::from(file.path()).unwrap();
    assert_eq!(conf.domain_name, "example.org");
    assert_eq!(conf.stack_name, "AssetStoreStack");
    assert_eq!(conf.bucket_name, "s3-asset-project-demo-bucket");
    assert_eq!(conf.removal_profile, RemovalProfile::Disposable);
    assert!(conf.env.region.is_none());
}

#[test]
fn test_malformed_config_rejected() {
    let file = write_config("domain_name = [\n");
    assert!(StackConfig::from(file.path()).is_err());
}

#[test]
fn test_missing_config_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = StackConfig::from(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_dynamic_configs_override_file() {
    let file = write_config("domain_name = \"example.org\"\n");
    let mut conf = StackConfig::from(file.path()).unwrap();

    let configs = parse_dynamic_configs(&[
        "stack.domain-name=Example.COM".to_string(),
        "stack.removal-profile=retain".to_string(),
        "env.region=us-east-1".to_string(),
        "zone.hosted-zone-id=".to_string(),
    ])
    .unwrap();
    apply_to_stack_config(&configs, &mut conf).unwrap();

    assert_eq!(conf.domain_name, "example.com");
    assert_eq!(conf.removal_profile, RemovalProfile::Retain);
    assert_eq!(conf.env.region.as_deref(), Some("us-east-1"));
    assert!(conf.zone.hosted_zone_id.is_none());
}

#[test]
fn test_environment_overrides_config_file() {
    let file = write_config(
        r#"
domain_name = "example.com"

[env]
account = "111111111111"
region = "eu-west-1"
"#,
    );
    let mut conf = StackConfig::from(file.path()).unwrap();

    // Only this test touches these variables in this binary
    std::env::set_var("ASSET_STORE_ACCOUNT", "222222222222");
    std::env::set_var("ASSET_STORE_REGION", "us-east-1");
    conf.apply_env();
    std::env::set_var("ASSET_STORE_ACCOUNT", "  ");
    std::env::remove_var("ASSET_STORE_REGION");
    conf.apply_env();
    std::env::remove_var("ASSET_STORE_ACCOUNT");

    assert_eq!(conf.env.account.as_deref(), Some("222222222222"));
    assert_eq!(conf.env.region.as_deref(), Some("us-east-1"));
}

#[test]
fn test_invalid_values_fail_validation() {
    let file = write_config(
        r#"
domain_name = "example.com"

[env]
account = "12345"
"#,
    );
    let conf = StackConfig::from(file.path()).unwrap();
    assert!(conf.validate().is_err());

    let mut conf = StackConfig::default();
    conf.bucket_name = "Invalid_Bucket".to_string();
    assert!(conf.validate().is_err());
}
