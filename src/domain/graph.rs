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

//! Resource dependency graph

use crate::domain::resources::{Declared, Handle, LogicalId, ResourceKind, ResourceSpec};
use crate::shared::error::{Result, StackError};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct Node {
    pub id: LogicalId,
    pub spec: ResourceSpec,
    pub depends_on: Vec<LogicalId>,
}

impl Node {
    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

/// Nodes in insertion order plus dependency edges.
///
/// `add` refuses dependencies on nodes that are not in the graph yet, so
/// graphs built only through `add` are acyclic. `add_dependency` can add
/// arbitrary edges; cycles introduced that way surface in
/// `topological_order`.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    nodes: Vec<Node>,
    index: HashMap<LogicalId, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<T: Declared>(&mut self, id: &str, resource: T) -> Result<Handle<T>> {
        let id = LogicalId::new(id)?;
        if self.index.contains_key(&id) {
            return Err(StackError::dependency_error(format!(
                "Logical id '{}' is already declared",
                id
            )));
        }

        resource.check()?;

        let mut depends_on: Vec<LogicalId> = Vec::new();
        for (dep, expected) in resource.dependencies() {
            let node = self.get(&dep).ok_or_else(|| {
                StackError::dependency_error(format!(
                    "'{}' depends on '{}', which is not declared in this stack",
                    id, dep
                ))
            })?;
            if node.kind() != expected {
                return Err(StackError::dependency_error(format!(
                    "'{}' expects '{}' to be a {}, found {}",
                    id,
                    dep,
                    expected,
                    node.kind()
                )));
            }
            if !depends_on.contains(&dep) {
                depends_on.push(dep);
            }
        }

        tracing::debug!(id = %id, kind = %T::KIND, deps = depends_on.len(), "declared resource");

        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node {
            id: id.clone(),
            spec: resource.into_spec(),
            depends_on,
        });

        Ok(Handle::new(id))
    }

    /// Explicit ordering edge: `from` is created after `to`
    pub fn add_dependency(&mut self, from: &LogicalId, to: &LogicalId) -> Result<()> {
        if from == to {
            return Err(StackError::dependency_error(format!(
                "'{}' cannot depend on itself",
                from
            )));
        }
        if !self.index.contains_key(to) {
            return Err(StackError::dependency_error(format!(
                "Unknown dependency target '{}'",
                to
            )));
        }
        let pos = *self
            .index
            .get(from)
            .ok_or_else(|| StackError::dependency_error(format!("Unknown node '{}'", from)))?;

        let node = &mut self.nodes[pos];
        if !node.depends_on.contains(to) {
            node.depends_on.push(to.clone());
        }
        Ok(())
    }

    pub fn get(&self, id: &LogicalId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Declaration behind a handle
    pub fn resolve<T: Declared>(&self, handle: &Handle<T>) -> Result<&T> {
        let node = self.get(handle.id()).ok_or_else(|| {
            StackError::dependency_error(format!("'{}' is not declared in this stack", handle.id()))
        })?;
        T::from_spec(&node.spec).ok_or_else(|| {
            StackError::dependency_error(format!(
                "'{}' is a {}, not a {}",
                handle.id(),
                node.kind(),
                T::KIND
            ))
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn nodes_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes that depend directly on `id`
    pub fn dependents_of(&self, id: &LogicalId) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.depends_on.contains(id))
            .collect()
    }

    /// Kahn's algorithm; among ready nodes the earliest declared goes first
    pub fn topological_order(&self) -> Result<Vec<&Node>> {
        let mut in_degree: Vec<usize> = self.nodes.iter().map(|n| n.depends_on.len()).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            for dep in &node.depends_on {
                let j = self.index[dep];
                dependents[j].push(i);
            }
        }

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(i) = ready.pop_first() {
            order.push(&self.nodes[i]);
            for &k in &dependents[i] {
                in_degree[k] -= 1;
                if in_degree[k] == 0 {
                    ready.insert(k);
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck: Vec<String> = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, n)| n.id.to_string())
                .collect();
            return Err(StackError::dependency_error(format!(
                "Dependency cycle between: {}",
                stuck.join(", ")
            )));
        }

        Ok(order)
    }
}
