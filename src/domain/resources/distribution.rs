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
    Bucket, Certificate, Declared, Handle, LogicalId, RemovalPolicy, ResourceKind, ResourceSpec,
};
use crate::shared::error::{Result, StackError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Options,
    Put,
    Patch,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Options)
    }
}

/// Method sets the edge accepts and forwards to the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedMethods {
    GetHead,
    GetHeadOptions,
    All,
}

impl AllowedMethods {
    pub fn methods(&self) -> &'static [HttpMethod] {
        match self {
            AllowedMethods::GetHead => &[HttpMethod::Get, HttpMethod::Head],
            AllowedMethods::GetHeadOptions => {
                &[HttpMethod::Get, HttpMethod::Head, HttpMethod::Options]
            }
            AllowedMethods::All => &[
                HttpMethod::Get,
                HttpMethod::Head,
                HttpMethod::Options,
                HttpMethod::Put,
                HttpMethod::Patch,
                HttpMethod::Post,
                HttpMethod::Delete,
            ],
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.methods().iter().all(|m| !m.is_mutating())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachedMethods {
    GetHead,
    GetHeadOptions,
}

impl CachedMethods {
    pub fn methods(&self) -> &'static [HttpMethod] {
        match self {
            CachedMethods::GetHead => &[HttpMethod::Get, HttpMethod::Head],
            CachedMethods::GetHeadOptions => {
                &[HttpMethod::Get, HttpMethod::Head, HttpMethod::Options]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerProtocolPolicy {
    AllowAll,
    HttpsOnly,
    RedirectToHttps,
}

impl ViewerProtocolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerProtocolPolicy::AllowAll => "allow-all",
            ViewerProtocolPolicy::HttpsOnly => "https-only",
            ViewerProtocolPolicy::RedirectToHttps => "redirect-to-https",
        }
    }
}

/// Minimum TLS protocol negotiated with viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SecurityPolicyProtocol {
    SslV3,
    TlsV1,
    TlsV1_2016,
    TlsV1_1_2016,
    TlsV1_2_2018,
    TlsV1_2_2019,
    TlsV1_2_2021,
}

impl SecurityPolicyProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityPolicyProtocol::SslV3 => "SSLv3",
            SecurityPolicyProtocol::TlsV1 => "TLSv1",
            SecurityPolicyProtocol::TlsV1_2016 => "TLSv1_2016",
            SecurityPolicyProtocol::TlsV1_1_2016 => "TLSv1.1_2016",
            SecurityPolicyProtocol::TlsV1_2_2018 => "TLSv1.2_2018",
            SecurityPolicyProtocol::TlsV1_2_2019 => "TLSv1.2_2019",
            SecurityPolicyProtocol::TlsV1_2_2021 => "TLSv1.2_2021",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BehaviorOptions {
    pub origin: Handle<Bucket>,
    pub compress: bool,
    pub allowed_methods: AllowedMethods,
    pub cached_methods: CachedMethods,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
}

impl BehaviorOptions {
    /// Read-only, compressed, HTTPS-redirecting behavior for an S3 origin
    pub fn for_bucket(origin: &Handle<Bucket>) -> Self {
        Self {
            origin: origin.clone(),
            compress: true,
            allowed_methods: AllowedMethods::GetHeadOptions,
            cached_methods: CachedMethods::GetHead,
            viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Distribution {
    pub certificate: Option<Handle<Certificate>>,
    pub domain_names: Vec<String>,
    pub minimum_protocol_version: SecurityPolicyProtocol,
    pub default_behavior: BehaviorOptions,
    pub removal_policy: RemovalPolicy,
}

impl Distribution {
    pub fn new(default_behavior: BehaviorOptions) -> Self {
        Self {
            certificate: None,
            domain_names: Vec::new(),
            minimum_protocol_version: SecurityPolicyProtocol::TlsV1_2_2021,
            default_behavior,
            removal_policy: RemovalPolicy::Destroy,
        }
    }

    pub fn with_identity(
        mut self,
        certificate: &Handle<Certificate>,
        domain_names: Vec<String>,
    ) -> Self {
        self.certificate = Some(certificate.clone());
        self.domain_names = domain_names;
        self
    }
}

impl Declared for Distribution {
    const KIND: ResourceKind = ResourceKind::Distribution;

    fn dependencies(&self) -> Vec<(LogicalId, ResourceKind)> {
        let mut deps = vec![(
            self.default_behavior.origin.id().clone(),
            ResourceKind::Bucket,
        )];
        if let Some(ref cert) = self.certificate {
            deps.push((cert.id().clone(), ResourceKind::Certificate));
        }
        deps
    }

    fn check(&self) -> Result<()> {
        if !self.domain_names.is_empty() && self.certificate.is_none() {
            return Err(StackError::InvalidResource(
                "Distribution domain names require a certificate".to_string(),
            ));
        }
        if self.certificate.is_some() && self.domain_names.is_empty() {
            return Err(StackError::InvalidResource(
                "Distribution certificate requires at least one domain name".to_string(),
            ));
        }

        let allowed = self.default_behavior.allowed_methods.methods();
        for method in self.default_behavior.cached_methods.methods() {
            if !allowed.contains(method) {
                return Err(StackError::InvalidResource(format!(
                    "Cached method {} is not an allowed method",
                    method.as_str()
                )));
            }
        }

        Ok(())
    }

    fn into_spec(self) -> ResourceSpec {
        ResourceSpec::Distribution(self)
    }

    fn from_spec(spec: &ResourceSpec) -> Option<&Self> {
        match spec {
            ResourceSpec::Distribution(dist) => Some(dist),
            _ => None,
        }
    }
}
