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

use super::{Declared, LogicalId, RemovalPolicy, ResourceKind, ResourceSpec};
use crate::shared::error::{Result, StackError};

/// The four public-access-block switches of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPublicAccess {
    pub block_public_acls: bool,
    pub ignore_public_acls: bool,
    pub block_public_policy: bool,
    pub restrict_public_buckets: bool,
}

impl BlockPublicAccess {
    pub const BLOCK_ALL: Self = Self {
        block_public_acls: true,
        ignore_public_acls: true,
        block_public_policy: true,
        restrict_public_buckets: true,
    };

    /// Blocks ACL grants only; bucket policies may still grant public access
    pub const BLOCK_ACLS: Self = Self {
        block_public_acls: true,
        ignore_public_acls: true,
        block_public_policy: false,
        restrict_public_buckets: false,
    };

    pub fn blocks_policies(&self) -> bool {
        self.block_public_policy || self.restrict_public_buckets
    }

    pub fn blocks_acls(&self) -> bool {
        self.block_public_acls && self.ignore_public_acls
    }
}

/// Canned ACL applied to the bucket itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketAccessControl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    LogDeliveryWrite,
    BucketOwnerRead,
    BucketOwnerFullControl,
    AwsExecRead,
}

impl BucketAccessControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketAccessControl::Private => "Private",
            BucketAccessControl::PublicRead => "PublicRead",
            BucketAccessControl::PublicReadWrite => "PublicReadWrite",
            BucketAccessControl::AuthenticatedRead => "AuthenticatedRead",
            BucketAccessControl::LogDeliveryWrite => "LogDeliveryWrite",
            BucketAccessControl::BucketOwnerRead => "BucketOwnerRead",
            BucketAccessControl::BucketOwnerFullControl => "BucketOwnerFullControl",
            BucketAccessControl::AwsExecRead => "AwsExecRead",
        }
    }

    /// ACLs that grant access beyond the owning account
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            BucketAccessControl::PublicRead
                | BucketAccessControl::PublicReadWrite
                | BucketAccessControl::AuthenticatedRead
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectOwnership {
    ObjectWriter,
    BucketOwnerPreferred,
    BucketOwnerEnforced,
}

impl ObjectOwnership {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectOwnership::ObjectWriter => "ObjectWriter",
            ObjectOwnership::BucketOwnerPreferred => "BucketOwnerPreferred",
            ObjectOwnership::BucketOwnerEnforced => "BucketOwnerEnforced",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bucket {
    pub bucket_name: String,
    /// Granted through a bucket policy statement, never an ACL
    pub public_read_access: bool,
    pub block_public_access: Option<BlockPublicAccess>,
    pub access_control: Option<BucketAccessControl>,
    pub object_ownership: Option<ObjectOwnership>,
    pub auto_delete_objects: bool,
    pub removal_policy: RemovalPolicy,
}

impl Bucket {
    /// Private bucket, retained on teardown
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            public_read_access: false,
            block_public_access: None,
            access_control: None,
            object_ownership: None,
            auto_delete_objects: false,
            removal_policy: RemovalPolicy::Retain,
        }
    }

    /// Ownership rendered into the template. A canned ACL only takes effect
    /// when ACLs are enabled, which requires object-writer ownership.
    pub fn effective_object_ownership(&self) -> Option<ObjectOwnership> {
        match (self.object_ownership, self.access_control) {
            (Some(ownership), _) => Some(ownership),
            (None, Some(_)) => Some(ObjectOwnership::ObjectWriter),
            (None, None) => None,
        }
    }
}

impl Declared for Bucket {
    const KIND: ResourceKind = ResourceKind::Bucket;

    fn dependencies(&self) -> Vec<(LogicalId, ResourceKind)> {
        Vec::new()
    }

    fn check(&self) -> Result<()> {
        if self.public_read_access {
            if let Some(block) = self.block_public_access {
                if block.blocks_policies() {
                    return Err(StackError::validation_error(format!(
                        "Bucket '{}': public read access needs bucket policies to be allowed, \
                         but block-public-access blocks public policies",
                        self.bucket_name
                    )));
                }
            }
            if let Some(acl) = self.access_control {
                if acl.is_public() {
                    return Err(StackError::validation_error(format!(
                        "Bucket '{}': public read must be granted by policy, not by the '{}' ACL",
                        self.bucket_name,
                        acl.as_str()
                    )));
                }
            }
        }

        if self.access_control.is_some()
            && self.object_ownership == Some(ObjectOwnership::BucketOwnerEnforced)
        {
            return Err(StackError::validation_error(format!(
                "Bucket '{}': an access control ACL cannot be set while ACLs are disabled by BucketOwnerEnforced",
                self.bucket_name
            )));
        }

        if self.auto_delete_objects && self.removal_policy != RemovalPolicy::Destroy {
            return Err(StackError::validation_error(format!(
                "Bucket '{}': auto-delete of objects requires the Destroy removal policy",
                self.bucket_name
            )));
        }

        Ok(())
    }

    fn into_spec(self) -> ResourceSpec {
        ResourceSpec::Bucket(self)
    }

    fn from_spec(spec: &ResourceSpec) -> Option<&Self> {
        match spec {
            ResourceSpec::Bucket(bucket) => Some(bucket),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_asset_bucket() -> Bucket {
        let mut bucket = Bucket::new("asset-bucket");
        bucket.public_read_access = true;
        bucket.block_public_access = Some(BlockPublicAccess::BLOCK_ACLS);
        bucket.access_control = Some(BucketAccessControl::BucketOwnerFullControl);
        bucket.auto_delete_objects = true;
        bucket.removal_policy = RemovalPolicy::Destroy;
        bucket
    }

    #[test]
    fn test_public_read_with_blocked_acls_is_allowed() {
        let bucket = public_asset_bucket();
        assert!(bucket.check().is_ok());
        assert_eq!(
            bucket.effective_object_ownership(),
            Some(ObjectOwnership::ObjectWriter)
        );
    }

    #[test]
    fn test_public_read_with_block_all_conflicts() {
        let mut bucket = public_asset_bucket();
        bucket.block_public_access = Some(BlockPublicAccess::BLOCK_ALL);
        assert!(bucket.check().is_err());
    }

    #[test]
    fn test_public_read_via_acl_rejected() {
        let mut bucket = public_asset_bucket();
        bucket.access_control = Some(BucketAccessControl::PublicRead);
        assert!(bucket.check().is_err());
    }

    #[test]
    fn test_auto_delete_requires_destroy() {
        let mut bucket = public_asset_bucket();
        bucket.removal_policy = RemovalPolicy::Retain;
        assert!(bucket.check().is_err());
    }

    #[test]
    fn test_acl_with_enforced_ownership_rejected() {
        let mut bucket = public_asset_bucket();
        bucket.object_ownership = Some(ObjectOwnership::BucketOwnerEnforced);
        assert!(bucket.check().is_err());
    }
}
