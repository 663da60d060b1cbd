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

//! Template model and intrinsic function helpers

pub mod resources;
pub mod synth;

pub use self::synth::{write_assembly, TemplateFormat, TemplateSynthesizer};

use crate::domain::resources::{LogicalId, RemovalPolicy};
use crate::infrastructure::constants::TEMPLATE_FORMAT_VERSION;
use crate::shared::error::Result;
use serde_json::{json, Map, Value};

/// `{"Ref": id}`
pub fn ref_(id: &LogicalId) -> Value {
    json!({ "Ref": id.as_str() })
}

/// `{"Fn::GetAtt": [id, attribute]}`
pub fn get_att(id: &LogicalId, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [id.as_str(), attribute] })
}

/// `{"Fn::Join": [separator, parts]}`
pub fn join(separator: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [separator, parts] })
}

/// Logical id a `Ref` or `Fn::GetAtt` value points at
pub fn referenced_id(value: &Value) -> Option<&str> {
    if let Some(id) = value.get("Ref").and_then(Value::as_str) {
        return Some(id);
    }
    value
        .get("Fn::GetAtt")
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(Value::as_str)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateResource {
    pub logical_id: LogicalId,
    pub resource_type: String,
    pub properties: Value,
    pub depends_on: Vec<LogicalId>,
    pub removal_policy: Option<RemovalPolicy>,
    /// Graph node this resource was expanded from
    pub owner: LogicalId,
}

impl TemplateResource {
    pub fn new(
        logical_id: LogicalId,
        resource_type: &str,
        properties: Value,
        owner: &LogicalId,
    ) -> Self {
        Self {
            logical_id,
            resource_type: resource_type.to_string(),
            properties,
            depends_on: Vec::new(),
            removal_policy: None,
            owner: owner.clone(),
        }
    }

    pub fn with_depends_on(mut self, id: &LogicalId) -> Self {
        self.depends_on.push(id.clone());
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = Some(policy);
        self
    }

    pub fn to_value(&self) -> Value {
        let mut body = Map::new();
        body.insert("Type".to_string(), json!(self.resource_type));
        if !self.properties.is_null() {
            body.insert("Properties".to_string(), self.properties.clone());
        }
        if !self.depends_on.is_empty() {
            let deps: Vec<&str> = self.depends_on.iter().map(|d| d.as_str()).collect();
            body.insert("DependsOn".to_string(), json!(deps));
        }
        if let Some(policy) = self.removal_policy {
            body.insert(
                "UpdateReplacePolicy".to_string(),
                json!(policy.as_deletion_policy()),
            );
            body.insert(
                "DeletionPolicy".to_string(),
                json!(policy.as_deletion_policy()),
            );
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Template {
    pub description: String,
    pub resources: Vec<TemplateResource>,
    pub outputs: Vec<(String, Value)>,
}

impl Template {
    pub fn resource(&self, id: &str) -> Option<&TemplateResource> {
        self.resources.iter().find(|r| r.logical_id.as_str() == id)
    }

    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a TemplateResource> {
        self.resources
            .iter()
            .filter(move |r| r.resource_type == resource_type)
    }

    pub fn to_value(&self) -> Value {
        let mut resources = Map::new();
        for resource in &self.resources {
            resources.insert(resource.logical_id.to_string(), resource.to_value());
        }

        let mut template = Map::new();
        template.insert(
            "AWSTemplateFormatVersion".to_string(),
            json!(TEMPLATE_FORMAT_VERSION),
        );
        if !self.description.is_empty() {
            template.insert("Description".to_string(), json!(self.description));
        }
        template.insert("Resources".to_string(), Value::Object(resources));

        if !self.outputs.is_empty() {
            let mut outputs = Map::new();
            for (name, output) in &self.outputs {
                outputs.insert(name.clone(), output.clone());
            }
            template.insert("Outputs".to_string(), Value::Object(outputs));
        }

        Value::Object(template)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_value())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsics() {
        let id = LogicalId::new("Bucket").unwrap();
        assert_eq!(ref_(&id), json!({"Ref": "Bucket"}));
        assert_eq!(
            get_att(&id, "Arn"),
            json!({"Fn::GetAtt": ["Bucket", "Arn"]})
        );
        assert_eq!(referenced_id(&ref_(&id)), Some("Bucket"));
        assert_eq!(referenced_id(&get_att(&id, "Arn")), Some("Bucket"));
        assert_eq!(referenced_id(&json!("literal")), None);
    }

    #[test]
    fn test_resource_rendering() {
        let id = LogicalId::new("Bucket").unwrap();
        let policy = LogicalId::new("BucketPolicy").unwrap();
        let resource = TemplateResource::new(
            id.clone(),
            "AWS::S3::Bucket",
            json!({"BucketName": "b"}),
            &id,
        )
        .with_depends_on(&policy)
        .with_removal_policy(RemovalPolicy::Destroy);

        let value = resource.to_value();
        assert_eq!(value["Type"], "AWS::S3::Bucket");
        assert_eq!(value["DeletionPolicy"], "Delete");
        assert_eq!(value["UpdateReplacePolicy"], "Delete");
        assert_eq!(value["DependsOn"], json!(["BucketPolicy"]));
    }
}
