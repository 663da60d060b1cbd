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
use crate::domain::resources::{Bucket, LogicalId, RemovalPolicy};
use crate::infrastructure::aws::template::{get_att, join, ref_, TemplateResource};
use crate::infrastructure::constants::{
    AUTO_DELETE_HANDLER_SOURCE, AUTO_DELETE_MEMORY_MB, AUTO_DELETE_PROVIDER_HANDLER,
    AUTO_DELETE_PROVIDER_ROLE, AUTO_DELETE_RUNTIME, AUTO_DELETE_TIMEOUT_SECS,
    LAMBDA_BASIC_EXECUTION_POLICY, POLICY_DOCUMENT_VERSION, SUFFIX_AUTO_DELETE,
    SUFFIX_BUCKET_POLICY, TAG_AUTO_DELETE_OBJECTS, TYPE_AUTO_DELETE, TYPE_BUCKET,
    TYPE_BUCKET_POLICY, TYPE_IAM_ROLE, TYPE_LAMBDA_FUNCTION,
};
use crate::shared::error::Result;
use serde_json::{json, Value};

/// Renders a bucket plus its policy and the auto-delete machinery
pub struct BucketBuilder<'a> {
    logical_id: &'a LogicalId,
    bucket: &'a Bucket,
    origin_identities: Vec<LogicalId>,
}

impl<'a> BucketBuilder<'a> {
    pub fn new(logical_id: &'a LogicalId, bucket: &'a Bucket) -> Self {
        Self {
            logical_id,
            bucket,
            origin_identities: Vec::new(),
        }
    }

    /// Grant read to a CloudFront origin access identity
    pub fn with_origin_identity(mut self, identity: LogicalId) -> Self {
        self.origin_identities.push(identity);
        self
    }

    pub fn policy_id(&self) -> LogicalId {
        self.logical_id.child(SUFFIX_BUCKET_POLICY)
    }

    pub fn auto_delete_id(&self) -> LogicalId {
        self.logical_id.child(SUFFIX_AUTO_DELETE)
    }

    fn objects_arn(&self) -> Value {
        join("", vec![get_att(self.logical_id, "Arn"), json!("/*")])
    }

    fn build_policy_statements(&self, provider_role: &LogicalId) -> Vec<Value> {
        let mut statements = Vec::new();

        if self.bucket.auto_delete_objects {
            statements.push(json!({
                "Action": ["s3:PutBucketPolicy", "s3:GetBucket*", "s3:List*", "s3:DeleteObject*"],
                "Effect": "Allow",
                "Principal": { "AWS": get_att(provider_role, "Arn") },
                "Resource": [get_att(self.logical_id, "Arn"), self.objects_arn()],
            }));
        }

        if self.bucket.public_read_access {
            statements.push(json!({
                "Action": "s3:GetObject",
                "Effect": "Allow",
                "Principal": { "AWS": "*" },
                "Resource": self.objects_arn(),
            }));
        }

        for identity in &self.origin_identities {
            statements.push(json!({
                "Action": "s3:GetObject",
                "Effect": "Allow",
                "Principal": { "CanonicalUser": get_att(identity, "S3CanonicalUserId") },
                "Resource": self.objects_arn(),
            }));
        }

        statements
    }

    fn build_auto_delete(&self, provider_role: &LogicalId) -> Result<Vec<TemplateResource>> {
        let provider_handler = LogicalId::new(AUTO_DELETE_PROVIDER_HANDLER)?;

        let custom = TemplateResource::new(
            self.auto_delete_id(),
            TYPE_AUTO_DELETE,
            json!({
                "ServiceToken": get_att(&provider_handler, "Arn"),
                "BucketName": ref_(self.logical_id),
            }),
            self.logical_id,
        )
        .with_depends_on(&self.policy_id())
        .with_removal_policy(RemovalPolicy::Destroy);

        let role = TemplateResource::new(
            provider_role.clone(),
            TYPE_IAM_ROLE,
            json!({
                "AssumeRolePolicyDocument": {
                    "Version": POLICY_DOCUMENT_VERSION,
                    "Statement": [{
                        "Action": "sts:AssumeRole",
                        "Effect": "Allow",
                        "Principal": { "Service": "lambda.amazonaws.com" },
                    }],
                },
                "ManagedPolicyArns": [LAMBDA_BASIC_EXECUTION_POLICY],
            }),
            self.logical_id,
        );

        let handler = TemplateResource::new(
            provider_handler,
            TYPE_LAMBDA_FUNCTION,
            json!({
                "Code": { "ZipFile": AUTO_DELETE_HANDLER_SOURCE },
                "Timeout": AUTO_DELETE_TIMEOUT_SECS,
                "MemorySize": AUTO_DELETE_MEMORY_MB,
                "Handler": "index.handler",
                "Role": get_att(provider_role, "Arn"),
                "Runtime": AUTO_DELETE_RUNTIME,
                "Description": "Empties S3 buckets tagged for auto-deletion before they are removed",
            }),
            self.logical_id,
        )
        .with_depends_on(provider_role);

        Ok(vec![custom, role, handler])
    }
}

impl ResourceBuilder for BucketBuilder<'_> {
    fn logical_id(&self) -> &LogicalId {
        self.logical_id
    }

    fn resource_type(&self) -> &'static str {
        TYPE_BUCKET
    }

    fn removal_policy(&self) -> Option<RemovalPolicy> {
        Some(self.bucket.removal_policy)
    }

    fn build_properties(&self) -> Result<Value> {
        let mut properties = json!({ "BucketName": self.bucket.bucket_name });

        if let Some(acl) = self.bucket.access_control {
            properties["AccessControl"] = json!(acl.as_str());
        }
        if let Some(ownership) = self.bucket.effective_object_ownership() {
            properties["OwnershipControls"] = json!({
                "Rules": [{ "ObjectOwnership": ownership.as_str() }],
            });
        }
        if let Some(block) = self.bucket.block_public_access {
            properties["PublicAccessBlockConfiguration"] = json!({
                "BlockPublicAcls": block.block_public_acls,
                "BlockPublicPolicy": block.block_public_policy,
                "IgnorePublicAcls": block.ignore_public_acls,
                "RestrictPublicBuckets": block.restrict_public_buckets,
            });
        }
        if self.bucket.auto_delete_objects {
            properties["Tags"] = json!([{ "Key": TAG_AUTO_DELETE_OBJECTS, "Value": "true" }]);
        }

        Ok(properties)
    }

    fn build_companions(&self) -> Result<Vec<TemplateResource>> {
        let provider_role = LogicalId::new(AUTO_DELETE_PROVIDER_ROLE)?;
        let mut resources = Vec::new();

        let statements = self.build_policy_statements(&provider_role);
        if !statements.is_empty() {
            resources.push(TemplateResource::new(
                self.policy_id(),
                TYPE_BUCKET_POLICY,
                json!({
                    "Bucket": ref_(self.logical_id),
                    "PolicyDocument": {
                        "Statement": statements,
                        "Version": POLICY_DOCUMENT_VERSION,
                    },
                }),
                self.logical_id,
            ));
        }

        if self.bucket.auto_delete_objects {
            resources.extend(self.build_auto_delete(&provider_role)?);
        }

        Ok(resources)
    }
}
