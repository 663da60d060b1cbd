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

use super::{Declared, Handle, HostedZone, LogicalId, RemovalPolicy, ResourceKind, ResourceSpec};
use crate::domain::config::is_valid_domain;
use crate::shared::error::{Result, StackError};

/// ACM rejects primary domain names longer than this
const MAX_DOMAIN_NAME_LEN: usize = 64;

#[derive(Debug, Clone)]
pub enum CertificateValidation {
    /// Validation records are created in the given zone
    Dns(Handle<HostedZone>),
    Email,
}

impl CertificateValidation {
    pub fn method(&self) -> &'static str {
        match self {
            CertificateValidation::Dns(_) => "DNS",
            CertificateValidation::Email => "EMAIL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Certificate {
    pub domain_name: String,
    pub subject_alternative_names: Vec<String>,
    pub validation: CertificateValidation,
    pub removal_policy: RemovalPolicy,
}

impl Certificate {
    /// New DNS-validated certificate. Retained on teardown unless changed.
    pub fn new(domain_name: impl Into<String>, zone: &Handle<HostedZone>) -> Self {
        Self {
            domain_name: domain_name.into(),
            subject_alternative_names: Vec::new(),
            validation: CertificateValidation::Dns(zone.clone()),
            removal_policy: RemovalPolicy::Retain,
        }
    }

    pub fn with_alternative_name(mut self, name: impl Into<String>) -> Self {
        self.subject_alternative_names.push(name.into());
        self
    }

    pub fn apply_removal_policy(&mut self, policy: RemovalPolicy) {
        self.removal_policy = policy;
    }

    /// Primary name followed by the alternative names
    pub fn all_names(&self) -> Vec<&str> {
        std::iter::once(self.domain_name.as_str())
            .chain(self.subject_alternative_names.iter().map(|s| s.as_str()))
            .collect()
    }

    /// Alternative names that start with `*.`
    pub fn wildcard_names(&self) -> Vec<&str> {
        self.subject_alternative_names
            .iter()
            .filter(|n| n.starts_with("*."))
            .map(|n| n.as_str())
            .collect()
    }

    /// Whether a TLS client connecting to `host` would accept this certificate
    pub fn covers(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        self.all_names().into_iter().any(|name| {
            let name = name.to_lowercase();
            match name.strip_prefix("*.") {
                Some(parent) => host
                    .split_once('.')
                    .map(|(label, rest)| !label.is_empty() && rest == parent)
                    .unwrap_or(false),
                None => name == host,
            }
        })
    }
}

impl Declared for Certificate {
    const KIND: ResourceKind = ResourceKind::Certificate;

    fn dependencies(&self) -> Vec<(LogicalId, ResourceKind)> {
        match &self.validation {
            CertificateValidation::Dns(zone) => vec![(zone.id().clone(), ResourceKind::HostedZone)],
            CertificateValidation::Email => Vec::new(),
        }
    }

    fn check(&self) -> Result<()> {
        if self.domain_name.len() > MAX_DOMAIN_NAME_LEN {
            return Err(StackError::InvalidResource(format!(
                "Certificate domain name '{}' exceeds {} characters",
                self.domain_name, MAX_DOMAIN_NAME_LEN
            )));
        }

        for name in self.all_names() {
            let bare = name.strip_prefix("*.").unwrap_or(name);
            if bare.contains('*') {
                return Err(StackError::InvalidResource(format!(
                    "Certificate name '{}': a wildcard is only allowed as the first label",
                    name
                )));
            }
            if !is_valid_domain(bare) {
                return Err(StackError::InvalidResource(format!(
                    "Certificate name '{}' is not a valid domain",
                    name
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for name in self.all_names() {
            if !seen.insert(name.to_lowercase()) {
                return Err(StackError::InvalidResource(format!(
                    "Certificate name '{}' is listed twice",
                    name
                )));
            }
        }

        Ok(())
    }

    fn into_spec(self) -> ResourceSpec {
        ResourceSpec::Certificate(self)
    }

    fn from_spec(spec: &ResourceSpec) -> Option<&Self> {
        match spec {
            ResourceSpec::Certificate(cert) => Some(cert),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_handle() -> Handle<HostedZone> {
        Handle::new(LogicalId::new("Zone").unwrap())
    }

    #[test]
    fn test_wildcard_covers_single_label() {
        let cert = Certificate::new("example.com", &zone_handle())
            .with_alternative_name("*.example.com");

        assert!(cert.covers("example.com"));
        assert!(cert.covers("assets.example.com"));
        assert!(cert.covers("ASSETS.example.com."));
        assert!(!cert.covers("a.b.example.com"));
        assert!(!cert.covers("example.org"));
        assert_eq!(cert.wildcard_names(), vec!["*.example.com"]);
    }

    #[test]
    fn test_check_rejects_inner_wildcard() {
        let cert = Certificate::new("example.com", &zone_handle())
            .with_alternative_name("assets.*.example.com");
        assert!(cert.check().is_err());
    }

    #[test]
    fn test_check_rejects_duplicates() {
        let cert = Certificate::new("example.com", &zone_handle())
            .with_alternative_name("example.com");
        assert!(cert.check().is_err());
    }

    #[test]
    fn test_dns_validation_depends_on_zone() {
        let cert = Certificate::new("example.com", &zone_handle());
        let deps = cert.dependencies();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].0.as_str(), "Zone");
        assert_eq!(deps[0].1, ResourceKind::HostedZone);
        assert_eq!(cert.validation.method(), "DNS");
        assert_eq!(cert.removal_policy, RemovalPolicy::Retain);
    }
}
