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

//! Stack to template synthesis and cloud assembly output

use super::resources::{
    BucketBuilder, CertificateBuilder, DistributionBuilder, RecordSetBuilder, ResourceBuilder,
};
use super::{get_att, Template, TemplateResource};
use crate::domain::graph::Node;
use crate::domain::resources::{CertificateValidation, ResourceSpec};
use crate::domain::stack::{App, OutputValue, Stack};
use crate::infrastructure::constants::MANIFEST_FILE_NAME;
use crate::shared::error::{Result, StackError};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateFormat {
    #[default]
    Json,
    Yaml,
}

impl TemplateFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TemplateFormat::Json => "json",
            TemplateFormat::Yaml => "yaml",
        }
    }

    pub fn render(&self, template: &Template) -> Result<String> {
        match self {
            TemplateFormat::Json => template.to_json_string(),
            TemplateFormat::Yaml => template.to_yaml_string(),
        }
    }
}

impl FromStr for TemplateFormat {
    type Err = StackError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(TemplateFormat::Json),
            "yaml" | "yml" => Ok(TemplateFormat::Yaml),
            other => Err(StackError::config_error(format!(
                "Unknown template format '{}', expected json or yaml",
                other
            ))),
        }
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub struct TemplateSynthesizer<'a> {
    stack: &'a Stack,
}

impl<'a> TemplateSynthesizer<'a> {
    pub fn new(stack: &'a Stack) -> Self {
        Self { stack }
    }

    /// Render every declared resource in dependency order
    pub fn synthesize(&self) -> Result<Template> {
        let mut template = Template {
            description: self.stack.description.clone(),
            ..Template::default()
        };

        for node in self.stack.graph.topological_order()? {
            if node.spec.is_lookup() {
                continue;
            }
            for resource in self.build_node(node)? {
                push_resource(&mut template, resource)?;
            }
        }

        for output in &self.stack.outputs {
            let value = match &output.value {
                OutputValue::Literal(value) => json!(value),
                OutputValue::Attribute(id, attribute) => {
                    if template.resource(id.as_str()).is_none() {
                        return Err(StackError::dependency_error(format!(
                            "Output '{}' references unknown resource '{}'",
                            output.name, id
                        )));
                    }
                    get_att(id, attribute)
                }
            };
            template.outputs.push((
                output.name.clone(),
                json!({ "Description": output.description, "Value": value }),
            ));
        }

        tracing::debug!(
            stack = %self.stack.name,
            resources = template.resources.len(),
            "template synthesized"
        );
        Ok(template)
    }

    fn build_node(&self, node: &Node) -> Result<Vec<TemplateResource>> {
        let graph = &self.stack.graph;
        match &node.spec {
            ResourceSpec::HostedZone(_) => Ok(Vec::new()),
            ResourceSpec::Certificate(cert) => {
                let builder = CertificateBuilder::new(&node.id, cert);
                match &cert.validation {
                    CertificateValidation::Dns(zone) => {
                        builder.with_zone(graph.resolve(zone)?).build()
                    }
                    CertificateValidation::Email => builder.build(),
                }
            }
            ResourceSpec::Bucket(bucket) => {
                let mut builder = BucketBuilder::new(&node.id, bucket);
                for dependent in graph.dependents_of(&node.id) {
                    if let ResourceSpec::Distribution(dist) = &dependent.spec {
                        if dist.default_behavior.origin.id() == &node.id {
                            builder = builder.with_origin_identity(
                                DistributionBuilder::origin_identity_id(&dependent.id),
                            );
                        }
                    }
                }
                builder.build()
            }
            ResourceSpec::Distribution(dist) => DistributionBuilder::new(&node.id, dist).build(),
            ResourceSpec::AliasRecord(record) => {
                let zone = graph.resolve(&record.zone)?;
                RecordSetBuilder::new(&node.id, record, zone).build()
            }
        }
    }
}

/// Shared resources such as the auto-delete provider are emitted once
fn push_resource(template: &mut Template, resource: TemplateResource) -> Result<()> {
    match template.resource(resource.logical_id.as_str()) {
        Some(existing) if existing.to_value() == resource.to_value() => Ok(()),
        Some(_) => Err(StackError::dependency_error(format!(
            "Template resource '{}' is rendered twice with different definitions",
            resource.logical_id
        ))),
        None => {
            template.resources.push(resource);
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub environment: String,
    pub template_file: String,
    pub description: String,
    pub resource_count: usize,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyManifest {
    pub version: String,
    pub generated_at: String,
    pub stacks: BTreeMap<String, ManifestEntry>,
}

pub fn template_file_name(stack_name: &str, format: TemplateFormat) -> String {
    format!("{}.template.{}", stack_name, format.extension())
}

/// Write one template per stack and a manifest into `out_dir`.
/// Returns the paths written, manifest last.
pub fn write_assembly(app: &App, out_dir: &Path, format: TemplateFormat) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    let mut stacks = BTreeMap::new();
    for stack in app.stacks() {
        let template = TemplateSynthesizer::new(stack).synthesize()?;
        let file_name = template_file_name(&stack.name, format);
        let path = out_dir.join(&file_name);
        std::fs::write(&path, format.render(&template)?)?;
        tracing::info!(stack = %stack.name, path = %path.display(), "template written");

        stacks.insert(
            stack.name.clone(),
            ManifestEntry {
                environment: stack.environment.to_uri(),
                template_file: file_name,
                description: stack.description.clone(),
                resource_count: template.resources.len(),
                outputs: template.outputs.iter().map(|(name, _)| name.clone()).collect(),
            },
        );
        written.push(path);
    }

    let manifest = AssemblyManifest {
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        stacks,
    };
    let manifest_path = out_dir.join(MANIFEST_FILE_NAME);
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    written.push(manifest_path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<TemplateFormat>().unwrap(), TemplateFormat::Json);
        assert_eq!("yml".parse::<TemplateFormat>().unwrap(), TemplateFormat::Yaml);
        assert!("xml".parse::<TemplateFormat>().is_err());
    }

    #[test]
    fn test_template_file_name() {
        assert_eq!(
            template_file_name("AssetStoreStack", TemplateFormat::Yaml),
            "AssetStoreStack.template.yaml"
        );
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        use crate::domain::resources::LogicalId;

        let id = LogicalId::new("Shared").unwrap();
        let mut template = Template::default();
        let a = TemplateResource::new(id.clone(), "AWS::IAM::Role", json!({"A": 1}), &id);
        push_resource(&mut template, a.clone()).unwrap();
        push_resource(&mut template, a).unwrap();
        assert_eq!(template.resources.len(), 1);

        let b = TemplateResource::new(id.clone(), "AWS::IAM::Role", json!({"A": 2}), &id);
        assert!(push_resource(&mut template, b).is_err());
    }
}
