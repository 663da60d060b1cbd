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

//! Dry-run plan of the actions a deployment would take

use crate::domain::resources::ResourceSpec;
use crate::domain::stack::Stack;
use crate::infrastructure::aws::template::{referenced_id, Template, TemplateResource};
use crate::infrastructure::constants::{
    TYPE_AUTO_DELETE, TYPE_BUCKET, TYPE_BUCKET_POLICY, TYPE_CERTIFICATE, TYPE_DISTRIBUTION,
    TYPE_HOSTED_ZONE, TYPE_IAM_ROLE, TYPE_LAMBDA_FUNCTION, TYPE_ORIGIN_ACCESS_IDENTITY,
    TYPE_RECORD_SET,
};
use crate::shared::error::{Result, StackError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Read an existing resource
    Lookup,
    Create,
    Update,
    Delete,
    NoOp,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Lookup => write!(f, "lookup"),
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub order: usize,
    pub logical_id: String,
    pub resource_type: String,
    pub action_type: ActionType,
    pub depends_on: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub stack_name: String,
    pub actions: Vec<Action>,
    pub has_changes: bool,
}

impl Plan {
    /// Walk the graph in dependency order and classify every template
    /// resource against `previous`. Without a previous template everything
    /// is created.
    pub fn build(stack: &Stack, template: &Template, previous: Option<&Value>) -> Result<Self> {
        let previous_resources = match previous {
            Some(previous) => Some(previous.get("Resources").and_then(Value::as_object).ok_or_else(
                || StackError::config_error("Previous template has no Resources section"),
            )?),
            None => None,
        };

        let mut actions: Vec<Action> = Vec::new();
        for node in stack.graph.topological_order()? {
            if let ResourceSpec::HostedZone(zone) = &node.spec {
                actions.push(Action {
                    order: actions.len() + 1,
                    logical_id: node.id.to_string(),
                    resource_type: TYPE_HOSTED_ZONE.to_string(),
                    action_type: ActionType::Lookup,
                    depends_on: Vec::new(),
                    description: format!(
                        "hosted zone {} ({})",
                        zone.domain_name, zone.hosted_zone_id
                    ),
                });
                continue;
            }

            for resource in template.resources.iter().filter(|r| r.owner == node.id) {
                let depends_on = if resource.logical_id == node.id {
                    node.depends_on.iter().map(|d| d.to_string()).collect()
                } else {
                    std::iter::once(&resource.owner)
                        .chain(resource.depends_on.iter())
                        .map(|d| d.to_string())
                        .collect()
                };

                let action_type = match previous_resources {
                    None => ActionType::Create,
                    Some(before) => match before.get(resource.logical_id.as_str()) {
                        None => ActionType::Create,
                        Some(old) if *old == resource.to_value() => ActionType::NoOp,
                        Some(_) => ActionType::Update,
                    },
                };

                actions.push(Action {
                    order: actions.len() + 1,
                    logical_id: resource.logical_id.to_string(),
                    resource_type: resource.resource_type.clone(),
                    action_type,
                    depends_on,
                    description: describe(resource),
                });
            }
        }

        if let Some(before) = previous_resources {
            for (id, old) in before {
                if template.resource(id).is_some() {
                    continue;
                }
                let resource_type = old
                    .get("Type")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                actions.push(Action {
                    order: actions.len() + 1,
                    logical_id: id.clone(),
                    description: format!("remove {}", resource_type),
                    resource_type,
                    action_type: ActionType::Delete,
                    depends_on: Vec::new(),
                });
            }
        }

        let has_changes = actions
            .iter()
            .any(|a| !matches!(a.action_type, ActionType::NoOp | ActionType::Lookup));
        Ok(Self {
            stack_name: stack.name.clone(),
            actions,
            has_changes,
        })
    }

    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            lookup: self.actions_by_type(ActionType::Lookup).len(),
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub lookup: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to look up, {} to create, {} to update, {} to delete, {} unchanged",
            self.lookup, self.create, self.update, self.delete, self.no_change
        )
    }
}

fn describe(resource: &TemplateResource) -> String {
    let props = &resource.properties;
    let text = |v: &Value| v.as_str().unwrap_or_default().to_string();
    match resource.resource_type.as_str() {
        TYPE_CERTIFICATE => {
            let mut names = vec![text(&props["DomainName"])];
            if let Some(sans) = props["SubjectAlternativeNames"].as_array() {
                names.extend(sans.iter().map(text));
            }
            format!("certificate for {}", names.join(", "))
        }
        TYPE_BUCKET => format!("bucket {}", text(&props["BucketName"])),
        TYPE_BUCKET_POLICY => "bucket policy".to_string(),
        TYPE_AUTO_DELETE => "empty bucket on teardown".to_string(),
        TYPE_IAM_ROLE => "auto-delete provider role".to_string(),
        TYPE_LAMBDA_FUNCTION => "auto-delete provider function".to_string(),
        TYPE_ORIGIN_ACCESS_IDENTITY => "origin access identity".to_string(),
        TYPE_DISTRIBUTION => {
            let aliases: Vec<String> = props["DistributionConfig"]["Aliases"]
                .as_array()
                .map(|a| a.iter().map(text).collect())
                .unwrap_or_default();
            if aliases.is_empty() {
                "distribution".to_string()
            } else {
                format!("distribution for {}", aliases.join(", "))
            }
        }
        TYPE_RECORD_SET => format!(
            "{} alias {} -> {}",
            text(&props["Type"]),
            text(&props["Name"]).trim_end_matches('.'),
            referenced_id(&props["AliasTarget"]["DNSName"]).unwrap_or("?")
        ),
        other => other.to_string(),
    }
}

/// Read a previously synthesized template, JSON or YAML by extension
pub fn load_previous_template(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}
