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

//! Declarative resource model
//!
//! Each declaration names its dependencies through [`Handle`]s. A handle is
//! only handed out by the graph once the referenced resource was added, so a
//! declaration can never point at something that does not exist yet.

pub mod bucket;
pub mod certificate;
pub mod distribution;
pub mod record;
pub mod zone;

pub use self::bucket::{BlockPublicAccess, Bucket, BucketAccessControl, ObjectOwnership};
pub use self::certificate::{Certificate, CertificateValidation};
pub use self::distribution::{
    AllowedMethods, BehaviorOptions, CachedMethods, Distribution, HttpMethod,
    SecurityPolicyProtocol, ViewerProtocolPolicy,
};
pub use self::record::AliasRecord;
pub use self::zone::HostedZone;

use crate::shared::error::{Result, StackError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Identifier of a resource inside the rendered template
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.len() > 255 {
            return Err(StackError::InvalidResource(format!(
                "Logical id '{}' must be 1-255 characters",
                id
            )));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StackError::InvalidResource(format!(
                "Logical id '{}' must be alphanumeric",
                id
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of a resource expanded from this one, e.g. `BucketPolicy`
    pub fn child(&self, suffix: &str) -> LogicalId {
        LogicalId(format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed reference to a declared resource
pub struct Handle<T> {
    id: LogicalId,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(id: LogicalId) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// What happens to a resource when the stack is torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalPolicy {
    Destroy,
    Retain,
    Snapshot,
}

impl RemovalPolicy {
    /// Value of `DeletionPolicy` / `UpdateReplacePolicy`
    pub fn as_deletion_policy(&self) -> &'static str {
        match self {
            RemovalPolicy::Destroy => "Delete",
            RemovalPolicy::Retain => "Retain",
            RemovalPolicy::Snapshot => "Snapshot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    HostedZone,
    Certificate,
    Bucket,
    Distribution,
    AliasRecord,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::HostedZone => "hosted-zone",
            ResourceKind::Certificate => "certificate",
            ResourceKind::Bucket => "bucket",
            ResourceKind::Distribution => "distribution",
            ResourceKind::AliasRecord => "alias-record",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declaration stored in a graph node
#[derive(Debug, Clone)]
pub enum ResourceSpec {
    HostedZone(HostedZone),
    Certificate(Certificate),
    Bucket(Bucket),
    Distribution(Distribution),
    AliasRecord(AliasRecord),
}

impl ResourceSpec {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceSpec::HostedZone(_) => ResourceKind::HostedZone,
            ResourceSpec::Certificate(_) => ResourceKind::Certificate,
            ResourceSpec::Bucket(_) => ResourceKind::Bucket,
            ResourceSpec::Distribution(_) => ResourceKind::Distribution,
            ResourceSpec::AliasRecord(_) => ResourceKind::AliasRecord,
        }
    }

    /// Lookups are resolved before synthesis and never rendered as resources
    pub fn is_lookup(&self) -> bool {
        matches!(self, ResourceSpec::HostedZone(_))
    }
}

/// Implemented by every type that can be added to a resource graph
pub trait Declared: Sized {
    const KIND: ResourceKind;

    /// Dependencies as (id, expected kind) pairs, taken from the handles
    /// embedded in the declaration
    fn dependencies(&self) -> Vec<(LogicalId, ResourceKind)>;

    /// Structural checks that need no other node
    fn check(&self) -> Result<()> {
        Ok(())
    }

    fn into_spec(self) -> ResourceSpec;

    fn from_spec(spec: &ResourceSpec) -> Option<&Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_id_validation() {
        assert!(LogicalId::new("AssetStoreBucket").is_ok());
        assert!(LogicalId::new("").is_err());
        assert!(LogicalId::new("asset-store").is_err());
        assert!(LogicalId::new("a b").is_err());
    }

    #[test]
    fn test_logical_id_child() {
        let id = LogicalId::new("Bucket").unwrap();
        assert_eq!(id.child("Policy").as_str(), "BucketPolicy");
    }

    #[test]
    fn test_removal_policy_rendering() {
        assert_eq!(RemovalPolicy::Destroy.as_deletion_policy(), "Delete");
        assert_eq!(RemovalPolicy::Retain.as_deletion_policy(), "Retain");
    }
}
