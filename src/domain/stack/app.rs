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

use crate::domain::config::{EnvConf, RemovalProfile};
use crate::domain::graph::ResourceGraph;
use crate::domain::resources::LogicalId;
use crate::infrastructure::constants::{UNKNOWN_ACCOUNT, UNKNOWN_REGION};
use crate::shared::error::{Result, StackError};

/// Account and region a stack is bound to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl Environment {
    pub fn new(account: Option<String>, region: Option<String>) -> Self {
        Self { account, region }
    }

    pub fn account_or_unknown(&self) -> &str {
        self.account.as_deref().unwrap_or(UNKNOWN_ACCOUNT)
    }

    pub fn region_or_unknown(&self) -> &str {
        self.region.as_deref().unwrap_or(UNKNOWN_REGION)
    }

    pub fn is_resolved(&self) -> bool {
        self.account.is_some() && self.region.is_some()
    }

    pub fn to_uri(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account_or_unknown(),
            self.region_or_unknown()
        )
    }
}

impl From<&EnvConf> for Environment {
    fn from(conf: &EnvConf) -> Self {
        Self::new(conf.account.clone(), conf.region.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    Literal(String),
    /// `Fn::GetAtt` of a template resource
    Attribute(LogicalId, String),
}

#[derive(Debug, Clone)]
pub struct StackOutput {
    pub name: String,
    pub description: String,
    pub value: OutputValue,
}

/// One deployable unit: a named graph bound to an environment
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub description: String,
    pub environment: Environment,
    pub removal_profile: RemovalProfile,
    pub graph: ResourceGraph,
    pub outputs: Vec<StackOutput>,
}

impl Stack {
    pub fn new(name: impl Into<String>, environment: Environment) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            environment,
            removal_profile: RemovalProfile::default(),
            graph: ResourceGraph::new(),
            outputs: Vec::new(),
        }
    }

    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        value: OutputValue,
    ) {
        self.outputs.push(StackOutput {
            name: name.into(),
            description: description.into(),
            value,
        });
    }
}

/// Root context owning every stack of a run
#[derive(Debug, Default)]
pub struct App {
    stacks: Vec<Stack>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stack(&mut self, stack: Stack) -> Result<()> {
        if self.stack(&stack.name).is_some() {
            return Err(StackError::config_error(format!(
                "Stack '{}' is already defined",
                stack.name
            )));
        }
        tracing::info!(
            stack = %stack.name,
            env = %stack.environment.to_uri(),
            resources = stack.graph.len(),
            "stack defined"
        );
        self.stacks.push(stack);
        Ok(())
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name == name)
    }
}
