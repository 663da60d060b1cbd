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
use crate::domain::resources::{Distribution, HttpMethod, LogicalId, RemovalPolicy};
use crate::infrastructure::aws::template::{get_att, join, ref_, TemplateResource};
use crate::infrastructure::constants::{
    CACHE_POLICY_CACHING_OPTIMIZED, HTTP_VERSION_2, SSL_SUPPORT_METHOD_SNI,
    SUFFIX_ORIGIN_IDENTITY, TYPE_DISTRIBUTION, TYPE_ORIGIN_ACCESS_IDENTITY,
};
use crate::shared::error::Result;
use serde_json::{json, Value};

const ORIGIN_ACCESS_IDENTITY_PATH: &str = "origin-access-identity/cloudfront/";

pub struct DistributionBuilder<'a> {
    logical_id: &'a LogicalId,
    distribution: &'a Distribution,
}

impl<'a> DistributionBuilder<'a> {
    pub fn new(logical_id: &'a LogicalId, distribution: &'a Distribution) -> Self {
        Self {
            logical_id,
            distribution,
        }
    }

    /// Identity the bucket policy grants read access to
    pub fn origin_identity_id(logical_id: &LogicalId) -> LogicalId {
        logical_id.child(SUFFIX_ORIGIN_IDENTITY)
    }

    fn origin_id(&self) -> String {
        format!("{}Origin1", self.logical_id)
    }

    fn methods(methods: &[HttpMethod]) -> Value {
        json!(methods.iter().map(|m| m.as_str()).collect::<Vec<_>>())
    }

    fn build_default_behavior(&self) -> Value {
        let behavior = &self.distribution.default_behavior;
        json!({
            "AllowedMethods": Self::methods(behavior.allowed_methods.methods()),
            "CachedMethods": Self::methods(behavior.cached_methods.methods()),
            "CachePolicyId": CACHE_POLICY_CACHING_OPTIMIZED,
            "Compress": behavior.compress,
            "TargetOriginId": self.origin_id(),
            "ViewerProtocolPolicy": behavior.viewer_protocol_policy.as_str(),
        })
    }

    fn build_origin(&self) -> Value {
        let bucket = self.distribution.default_behavior.origin.id();
        let identity = Self::origin_identity_id(self.logical_id);
        json!({
            "DomainName": get_att(bucket, "RegionalDomainName"),
            "Id": self.origin_id(),
            "S3OriginConfig": {
                "OriginAccessIdentity": join(
                    "",
                    vec![json!(ORIGIN_ACCESS_IDENTITY_PATH), ref_(&identity)]
                ),
            },
        })
    }

    fn build_viewer_certificate(&self) -> Value {
        match self.distribution.certificate {
            Some(ref cert) => json!({
                "AcmCertificateArn": ref_(cert.id()),
                "MinimumProtocolVersion": self.distribution.minimum_protocol_version.as_str(),
                "SslSupportMethod": SSL_SUPPORT_METHOD_SNI,
            }),
            None => json!({ "CloudFrontDefaultCertificate": true }),
        }
    }

    fn build_origin_identity(&self) -> TemplateResource {
        TemplateResource::new(
            Self::origin_identity_id(self.logical_id),
            TYPE_ORIGIN_ACCESS_IDENTITY,
            json!({
                "CloudFrontOriginAccessIdentityConfig": {
                    "Comment": format!("Identity for {}", self.origin_id()),
                },
            }),
            self.logical_id,
        )
    }
}

impl ResourceBuilder for DistributionBuilder<'_> {
    fn logical_id(&self) -> &LogicalId {
        self.logical_id
    }

    fn resource_type(&self) -> &'static str {
        TYPE_DISTRIBUTION
    }

    fn removal_policy(&self) -> Option<RemovalPolicy> {
        match self.distribution.removal_policy {
            RemovalPolicy::Destroy => None,
            other => Some(other),
        }
    }

    fn build_properties(&self) -> Result<Value> {
        let mut config = json!({
            "DefaultCacheBehavior": self.build_default_behavior(),
            "Enabled": true,
            "HttpVersion": HTTP_VERSION_2,
            "IPV6Enabled": true,
            "Origins": [self.build_origin()],
            "ViewerCertificate": self.build_viewer_certificate(),
        });
        if !self.distribution.domain_names.is_empty() {
            config["Aliases"] = json!(self.distribution.domain_names);
        }
        Ok(json!({ "DistributionConfig": config }))
    }

    /// The origin identity is rendered ahead of the distribution using it
    fn build(&self) -> Result<Vec<TemplateResource>> {
        Ok(vec![self.build_origin_identity(), self.build_primary()?])
    }
}
