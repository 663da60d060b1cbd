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

use crate::domain::resources::{LogicalId, RemovalPolicy};
use crate::infrastructure::aws::template::TemplateResource;
use crate::shared::error::Result;
use serde_json::Value;

/// Renders one graph declaration into template resources
pub trait ResourceBuilder {
    fn logical_id(&self) -> &LogicalId;

    fn resource_type(&self) -> &'static str;

    fn build_properties(&self) -> Result<Value>;

    fn removal_policy(&self) -> Option<RemovalPolicy> {
        None
    }

    /// Resources expanded from the declaration, rendered after it
    fn build_companions(&self) -> Result<Vec<TemplateResource>> {
        Ok(Vec::new())
    }

    fn build_primary(&self) -> Result<TemplateResource> {
        let mut resource = TemplateResource::new(
            self.logical_id().clone(),
            self.resource_type(),
            self.build_properties()?,
            self.logical_id(),
        );
        resource.removal_policy = self.removal_policy();
        Ok(resource)
    }

    fn build(&self) -> Result<Vec<TemplateResource>> {
        let mut resources = vec![self.build_primary()?];
        resources.extend(self.build_companions()?);
        Ok(resources)
    }
}
