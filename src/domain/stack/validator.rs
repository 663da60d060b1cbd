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

use crate::domain::config::RemovalProfile;
use crate::domain::graph::ResourceGraph;
use crate::domain::resources::{
    AliasRecord, Bucket, Certificate, Declared, Distribution, HostedZone, RemovalPolicy,
    ResourceSpec,
};
use crate::domain::stack::app::Stack;
use crate::infrastructure::constants::CERTIFICATE_REGION;
use crate::shared::error::StackError;

/// Cross-resource checks run on a fully declared stack
#[derive(Debug, Default)]
pub struct StackValidator;

impl StackValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, stack: &Stack) -> Result<(), StackError> {
        let graph = &stack.graph;

        // Also catches cycles added through explicit edges
        graph.topological_order()?;

        for node in graph.nodes() {
            match &node.spec {
                ResourceSpec::HostedZone(zone) => zone.check()?,
                ResourceSpec::Certificate(cert) => self.validate_certificate(cert)?,
                ResourceSpec::Bucket(bucket) => bucket.check()?,
                ResourceSpec::Distribution(dist) => {
                    self.validate_distribution(stack, graph, dist)?
                }
                ResourceSpec::AliasRecord(record) => {
                    self.validate_alias_record(graph, record)?
                }
            }
        }

        if stack.removal_profile == RemovalProfile::Disposable {
            self.validate_disposable(graph)?;
        }

        Ok(())
    }

    fn validate_certificate(&self, cert: &Certificate) -> Result<(), StackError> {
        cert.check()?;

        let wildcards = cert.wildcard_names();
        if wildcards.len() != 1 {
            return Err(StackError::validation_error(format!(
                "Certificate for '{}' lists {} wildcard names; exactly one is required",
                cert.domain_name,
                wildcards.len()
            )));
        }
        let expected = format!("*.{}", cert.domain_name);
        if let Some(wildcard) = wildcards.iter().find(|w| **w != expected) {
            return Err(StackError::validation_error(format!(
                "Certificate wildcard '{}' does not cover the primary domain '{}'",
                wildcard, cert.domain_name
            )));
        }
        Ok(())
    }

    fn validate_distribution(
        &self,
        stack: &Stack,
        graph: &ResourceGraph,
        dist: &Distribution,
    ) -> Result<(), StackError> {
        dist.check()?;

        let origin = graph.resolve(&dist.default_behavior.origin)?;
        if !dist.default_behavior.allowed_methods.is_read_only() {
            return Err(StackError::validation_error(format!(
                "Distribution serving bucket '{}' allows mutating methods; only GET, HEAD and OPTIONS are permitted",
                origin.bucket_name
            )));
        }

        if let Some(ref cert_handle) = dist.certificate {
            let cert = graph.resolve(cert_handle)?;
            for name in &dist.domain_names {
                if !cert.covers(name) {
                    return Err(StackError::validation_error(format!(
                        "Distribution domain '{}' is not covered by certificate '{}'",
                        name,
                        cert.all_names().join(", ")
                    )));
                }
            }

            if let Some(ref region) = stack.environment.region {
                if region != CERTIFICATE_REGION {
                    return Err(StackError::validation_error(format!(
                        "Distribution certificates must be issued in {}, but stack '{}' targets {}",
                        CERTIFICATE_REGION, stack.name, region
                    )));
                }
            }
        }

        Ok(())
    }

    fn validate_alias_record(
        &self,
        graph: &ResourceGraph,
        record: &AliasRecord,
    ) -> Result<(), StackError> {
        record.check()?;

        let zone: &HostedZone = graph.resolve(&record.zone)?;
        let target: &Distribution = graph.resolve(&record.target)?;
        let name = record.qualified_name(zone);
        let bare = name.trim_end_matches('.');

        if !target.domain_names.iter().any(|d| d.eq_ignore_ascii_case(bare)) {
            return Err(StackError::validation_error(format!(
                "Alias record '{}' points at a distribution that does not serve that name (serves: {})",
                bare,
                target.domain_names.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_disposable(&self, graph: &ResourceGraph) -> Result<(), StackError> {
        for node in graph.nodes() {
            let policy = match &node.spec {
                ResourceSpec::Certificate(cert) => cert.removal_policy,
                ResourceSpec::Bucket(bucket) => bucket.removal_policy,
                _ => continue,
            };
            if policy != RemovalPolicy::Destroy {
                return Err(StackError::validation_error(format!(
                    "'{}' uses removal policy {:?}, but the disposable profile requires Destroy",
                    node.id, policy
                )));
            }
        }

        for bucket in graph.nodes().filter_map(|n| Bucket::from_spec(&n.spec)) {
            if !bucket.auto_delete_objects {
                tracing::warn!(
                    bucket = %bucket.bucket_name,
                    "disposable bucket without auto-delete; teardown fails while objects remain"
                );
            }
        }
        Ok(())
    }
}
