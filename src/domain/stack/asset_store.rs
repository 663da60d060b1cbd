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

use crate::domain::config::{RemovalProfile, StackConfig};
use crate::domain::resources::{
    AliasRecord, BehaviorOptions, BlockPublicAccess, Bucket, BucketAccessControl, Certificate,
    Distribution, Handle, HostedZone, RemovalPolicy, SecurityPolicyProtocol,
};
use crate::domain::stack::app::{App, Environment, OutputValue, Stack};
use crate::domain::stack::validator::StackValidator;
use crate::infrastructure::aws::lookup::{HostedZoneProvider, ZoneQuery};
use crate::infrastructure::constants::{
    LOGICAL_ID_BUCKET, LOGICAL_ID_CERTIFICATE, LOGICAL_ID_DISTRIBUTION, LOGICAL_ID_RECORD,
    LOGICAL_ID_ZONE,
};
use crate::shared::error::Result;

/// Handles to the five declarations of the asset store topology
#[derive(Debug, Clone)]
pub struct AssetStoreStack {
    pub stack_name: String,
    pub zone: Handle<HostedZone>,
    pub certificate: Handle<Certificate>,
    pub bucket: Handle<Bucket>,
    pub distribution: Handle<Distribution>,
    pub record: Handle<AliasRecord>,
}

impl AssetStoreStack {
    /// Look up the zone, declare the remaining resources in dependency
    /// order, validate, and register the stack with `app`.
    pub async fn define(
        app: &mut App,
        conf: &StackConfig,
        zones: &dyn HostedZoneProvider,
    ) -> Result<Self> {
        conf.validate()?;

        let mut stack = Stack::new(conf.stack_name.clone(), Environment::from(&conf.env));
        stack.description = format!(
            "Asset store for {} served from {}",
            conf.domain_name,
            conf.asset_domain()
        );
        stack.removal_profile = conf.removal_profile;

        let zone = resolve_zone(&mut stack, zones, &conf.domain_name).await?;
        let certificate = declare_certificate(&mut stack, conf, &zone)?;
        let bucket = declare_bucket(&mut stack, conf)?;
        let distribution = declare_distribution(&mut stack, conf, &certificate, &bucket)?;
        let record = declare_alias_record(&mut stack, conf, &zone, &distribution)?;

        stack.add_output(
            "DistributionDomainName",
            "Edge endpoint of the asset distribution",
            OutputValue::Attribute(distribution.id().clone(), "DomainName".to_string()),
        );
        stack.add_output(
            "AssetUrl",
            "Public URL of the asset store",
            OutputValue::Literal(format!("https://{}", conf.asset_domain())),
        );

        StackValidator::new().validate(&stack)?;

        let defined = Self {
            stack_name: stack.name.clone(),
            zone,
            certificate,
            bucket,
            distribution,
            record,
        };
        app.add_stack(stack)?;
        Ok(defined)
    }
}

async fn resolve_zone(
    stack: &mut Stack,
    zones: &dyn HostedZoneProvider,
    domain_name: &str,
) -> Result<Handle<HostedZone>> {
    let query = ZoneQuery::new(domain_name, &stack.environment);
    let zone = zones.lookup(&query).await?;
    tracing::info!(
        domain = %zone.domain_name,
        zone_id = %zone.hosted_zone_id,
        "hosted zone resolved"
    );
    stack.graph.add(LOGICAL_ID_ZONE, zone)
}

fn declare_certificate(
    stack: &mut Stack,
    conf: &StackConfig,
    zone: &Handle<HostedZone>,
) -> Result<Handle<Certificate>> {
    let mut certificate = Certificate::new(conf.domain_name.clone(), zone)
        .with_alternative_name(format!("*.{}", conf.domain_name));
    certificate.apply_removal_policy(removal_policy_for(conf.removal_profile));
    stack.graph.add(LOGICAL_ID_CERTIFICATE, certificate)
}

fn declare_bucket(stack: &mut Stack, conf: &StackConfig) -> Result<Handle<Bucket>> {
    let mut bucket = Bucket::new(conf.bucket_name.clone());
    bucket.public_read_access = true;
    bucket.block_public_access = Some(BlockPublicAccess::BLOCK_ACLS);
    bucket.access_control = Some(BucketAccessControl::BucketOwnerFullControl);
    bucket.removal_policy = removal_policy_for(conf.removal_profile);
    bucket.auto_delete_objects = conf.removal_profile == RemovalProfile::Disposable;
    stack.graph.add(LOGICAL_ID_BUCKET, bucket)
}

fn declare_distribution(
    stack: &mut Stack,
    conf: &StackConfig,
    certificate: &Handle<Certificate>,
    bucket: &Handle<Bucket>,
) -> Result<Handle<Distribution>> {
    let mut distribution = Distribution::new(BehaviorOptions::for_bucket(bucket))
        .with_identity(certificate, vec![conf.asset_domain()]);
    distribution.minimum_protocol_version = SecurityPolicyProtocol::TlsV1_2_2021;
    stack.graph.add(LOGICAL_ID_DISTRIBUTION, distribution)
}

fn declare_alias_record(
    stack: &mut Stack,
    conf: &StackConfig,
    zone: &Handle<HostedZone>,
    distribution: &Handle<Distribution>,
) -> Result<Handle<AliasRecord>> {
    let record = AliasRecord::new(zone, conf.asset_domain(), distribution);
    stack.graph.add(LOGICAL_ID_RECORD, record)
}

fn removal_policy_for(profile: RemovalProfile) -> RemovalPolicy {
    match profile {
        RemovalProfile::Disposable => RemovalPolicy::Destroy,
        RemovalProfile::Retain => RemovalPolicy::Retain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::aws::lookup::StaticZoneProvider;
    use crate::shared::error::StackError;

    fn conf() -> StackConfig {
        StackConfig {
            domain_name: "example.com".to_string(),
            ..StackConfig::default()
        }
    }

    #[tokio::test]
    async fn test_define_declares_five_nodes_in_order() {
        let mut app = App::new();
        let zones = StaticZoneProvider::new().with_zone("example.com", "Z1");
        let defined = AssetStoreStack::define(&mut app, &conf(), &zones)
            .await
            .unwrap();

        let stack = app.stack(&defined.stack_name).unwrap();
        let order: Vec<String> = stack
            .graph
            .topological_order()
            .unwrap()
            .iter()
            .map(|n| n.id.to_string())
            .collect();
        assert_eq!(
            order,
            vec![
                "Zone",
                "AssetStoreCertificate",
                "AssetStoreBucket",
                "AssetStoreDistribution",
                "AssetStoreAliasRecord"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_zone_aborts_before_declaring() {
        let mut app = App::new();
        let zones = StaticZoneProvider::new();
        let err = AssetStoreStack::define(&mut app, &conf(), &zones)
            .await
            .unwrap_err();
        assert!(matches!(err, StackError::ZoneNotFound { .. }));
        assert!(app.stacks().is_empty());
    }

    #[tokio::test]
    async fn test_retain_profile_keeps_bucket_contents() {
        let mut app = App::new();
        let zones = StaticZoneProvider::new().with_zone("example.com", "Z1");
        let mut conf = conf();
        conf.removal_profile = RemovalProfile::Retain;
        let defined = AssetStoreStack::define(&mut app, &conf, &zones)
            .await
            .unwrap();

        let stack = app.stack(&defined.stack_name).unwrap();
        let bucket = stack.graph.resolve(&defined.bucket).unwrap();
        assert!(!bucket.auto_delete_objects);
        assert_eq!(bucket.removal_policy, RemovalPolicy::Retain);
    }
}
