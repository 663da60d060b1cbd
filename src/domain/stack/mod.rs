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

//! Stack domain: app context, topology definition and validation

pub mod app;
pub mod asset_store;
pub mod validator;

pub use self::app::{App, Environment, OutputValue, Stack, StackOutput};
pub use self::asset_store::AssetStoreStack;
pub use self::validator::StackValidator;
