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
use crate::domain::resources::{
    Certificate, CertificateValidation, HostedZone, LogicalId, RemovalPolicy,
};
use crate::infrastructure::constants::TYPE_CERTIFICATE;
use crate::shared::error::{Result, StackError};
use serde_json::{json, Value};

pub struct CertificateBuilder<'a> {
    logical_id: &'a LogicalId,
    certificate: &'a Certificate,
    zone: Option<&'a HostedZone>,
}

impl<'a> CertificateBuilder<'a> {
    pub fn new(logical_id: &'a LogicalId, certificate: &'a Certificate) -> Self {
        Self {
            logical_id,
            certificate,
            zone: None,
        }
    }

    /// Zone receiving the DNS validation records
    pub fn with_zone(mut self, zone: &'a HostedZone) -> Self {
        self.zone = Some(zone);
        self
    }

    fn build_validation_options(&self) -> Result<Option<Value>> {
        match self.certificate.validation {
            CertificateValidation::Email => Ok(None),
            CertificateValidation::Dns(_) => {
                let zone = self.zone.ok_or_else(|| {
                    StackError::dependency_error(format!(
                        "Certificate '{}' uses DNS validation but no zone was resolved",
                        self.logical_id
                    ))
                })?;
                let options: Vec<Value> = self
                    .certificate
                    .all_names()
                    .into_iter()
                    .map(|name| {
                        json!({
                            "DomainName": name,
                            "HostedZoneId": zone.hosted_zone_id,
                        })
                    })
                    .collect();
                Ok(Some(Value::Array(options)))
            }
        }
    }
}

impl ResourceBuilder for CertificateBuilder<'_> {
    fn logical_id(&self) -> &LogicalId {
        self.logical_id
    }

    fn resource_type(&self) -> &'static str {
        TYPE_CERTIFICATE
    }

    fn removal_policy(&self) -> Option<RemovalPolicy> {
        Some(self.certificate.removal_policy)
    }

    fn build_properties(&self) -> Result<Value> {
        let mut properties = json!({
            "DomainName": self.certificate.domain_name,
            "ValidationMethod": self.certificate.validation.method(),
        });
        if !self.certificate.subject_alternative_names.is_empty() {
            properties["SubjectAlternativeNames"] =
                json!(self.certificate.subject_alternative_names);
        }
        if let Some(options) = self.build_validation_options()? {
            properties["DomainValidationOptions"] = options;
        }
        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resources::Handle;

    #[test]
    fn test_dns_validated_certificate() {
        let zone_id = LogicalId::new("Zone").unwrap();
        let zone = HostedZone::new("example.com", "Z1");
        let mut cert = Certificate::new("example.com", &Handle::new(zone_id))
            .with_alternative_name("*.example.com");
        cert.apply_removal_policy(RemovalPolicy::Destroy);
        let id = LogicalId::new("Cert").unwrap();

        let resource = CertificateBuilder::new(&id, &cert)
            .with_zone(&zone)
            .build_primary()
            .unwrap();
        let props = &resource.properties;
        assert_eq!(props["DomainName"], "example.com");
        assert_eq!(props["ValidationMethod"], "DNS");
        assert_eq!(props["SubjectAlternativeNames"], json!(["*.example.com"]));
        assert_eq!(
            props["DomainValidationOptions"],
            json!([
                {"DomainName": "example.com", "HostedZoneId": "Z1"},
                {"DomainName": "*.example.com", "HostedZoneId": "Z1"}
            ])
        );
        assert_eq!(resource.to_value()["DeletionPolicy"], "Delete");
    }

    #[test]
    fn test_dns_validation_requires_zone() {
        let cert = Certificate::new("example.com", &Handle::new(LogicalId::new("Zone").unwrap()));
        let id = LogicalId::new("Cert").unwrap();
        assert!(CertificateBuilder::new(&id, &cert).build().is_err());
    }
}
