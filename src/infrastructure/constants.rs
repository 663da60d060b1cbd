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

/// Template format
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
pub const POLICY_DOCUMENT_VERSION: &str = "2012-10-17";

/// Output locations
pub const DEFAULT_OUT_DIR: &str = "asset-store.out";
pub const MANIFEST_FILE_NAME: &str = "manifest.json";
pub const DEFAULT_CONTEXT_FILE: &str = "asset-store.context.json";

/// Environment variables
pub const ENV_CONF_FILE: &str = "ASSET_STORE_CONF_FILE";
pub const ENV_ACCOUNT: &str = "ASSET_STORE_ACCOUNT";
pub const ENV_REGION: &str = "ASSET_STORE_REGION";

/// Unresolved environment markers
pub const UNKNOWN_ACCOUNT: &str = "unknown-account";
pub const UNKNOWN_REGION: &str = "unknown-region";

/// Stack defaults
pub const DEFAULT_STACK_NAME: &str = "AssetStoreStack";
pub const DEFAULT_DOMAIN_NAME: &str = "yourdomain.com";
pub const DEFAULT_ASSET_SUBDOMAIN: &str = "assets";
pub const DEFAULT_BUCKET_NAME: &str = "s3-asset-project-demo-bucket";

/// Logical ids of the declared resources
pub const LOGICAL_ID_ZONE: &str = "Zone";
pub const LOGICAL_ID_CERTIFICATE: &str = "AssetStoreCertificate";
pub const LOGICAL_ID_BUCKET: &str = "AssetStoreBucket";
pub const LOGICAL_ID_DISTRIBUTION: &str = "AssetStoreDistribution";
pub const LOGICAL_ID_RECORD: &str = "AssetStoreAliasRecord";

/// Suffixes of resources expanded from a declaration
pub const SUFFIX_BUCKET_POLICY: &str = "Policy";
pub const SUFFIX_AUTO_DELETE: &str = "AutoDeleteObjectsCustomResource";
pub const SUFFIX_ORIGIN_IDENTITY: &str = "Origin1S3Origin";
pub const AUTO_DELETE_PROVIDER_ROLE: &str = "CustomS3AutoDeleteObjectsCustomResourceProviderRole";
pub const AUTO_DELETE_PROVIDER_HANDLER: &str =
    "CustomS3AutoDeleteObjectsCustomResourceProviderHandler";

/// Resource types
pub const TYPE_CERTIFICATE: &str = "AWS::CertificateManager::Certificate";
pub const TYPE_BUCKET: &str = "AWS::S3::Bucket";
pub const TYPE_BUCKET_POLICY: &str = "AWS::S3::BucketPolicy";
pub const TYPE_AUTO_DELETE: &str = "Custom::S3AutoDeleteObjects";
pub const TYPE_IAM_ROLE: &str = "AWS::IAM::Role";
pub const TYPE_LAMBDA_FUNCTION: &str = "AWS::Lambda::Function";
pub const TYPE_DISTRIBUTION: &str = "AWS::CloudFront::Distribution";
pub const TYPE_ORIGIN_ACCESS_IDENTITY: &str = "AWS::CloudFront::CloudFrontOriginAccessIdentity";
pub const TYPE_RECORD_SET: &str = "AWS::Route53::RecordSet";
pub const TYPE_HOSTED_ZONE: &str = "AWS::Route53::HostedZone";

/// Bucket tagging
pub const TAG_AUTO_DELETE_OBJECTS: &str = "aws-cdk:auto-delete-objects";

/// CloudFront
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";
pub const CACHE_POLICY_CACHING_OPTIMIZED: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";
pub const SSL_SUPPORT_METHOD_SNI: &str = "sni-only";
pub const HTTP_VERSION_2: &str = "http2";
pub const CERTIFICATE_REGION: &str = "us-east-1";

/// Route53
pub const HOSTED_ZONE_ID_PREFIX: &str = "/hostedzone/";
pub const RECORD_TYPE_ALIAS: &str = "A";

/// Auto-delete provider function
pub const AUTO_DELETE_RUNTIME: &str = "nodejs18.x";
pub const AUTO_DELETE_TIMEOUT_SECS: u32 = 900;
pub const AUTO_DELETE_MEMORY_MB: u32 = 128;
pub const LAMBDA_BASIC_EXECUTION_POLICY: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";
pub const AUTO_DELETE_HANDLER_SOURCE: &str = r#"const { S3Client, ListObjectVersionsCommand, DeleteObjectsCommand } = require('@aws-sdk/client-s3');
const response = require('cfn-response');
const s3 = new S3Client({});
async function emptyBucket(bucket) {
  const listed = await s3.send(new ListObjectVersionsCommand({ Bucket: bucket }));
  const contents = [...(listed.Versions ?? []), ...(listed.DeleteMarkers ?? [])];
  if (contents.length === 0) { return; }
  const records = contents.map((record) => ({ Key: record.Key, VersionId: record.VersionId }));
  await s3.send(new DeleteObjectsCommand({ Bucket: bucket, Delete: { Objects: records } }));
  if (listed.IsTruncated) { await emptyBucket(bucket); }
}
exports.handler = async function (event, context) {
  let status = response.SUCCESS;
  try {
    if (event.RequestType === 'Delete') {
      await emptyBucket(event.ResourceProperties.BucketName);
    }
  } catch (err) {
    console.log(`failed to empty bucket: ${err}`);
    status = response.FAILED;
  }
  await response.send(event, context, status);
};
"#;
