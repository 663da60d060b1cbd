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

//! Builders turning declarations into template resources

pub mod bucket;
pub mod certificate;
pub mod distribution;
pub mod record;
pub mod traits;

pub use self::bucket::BucketBuilder;
pub use self::certificate::CertificateBuilder;
pub use self::distribution::DistributionBuilder;
pub use self::record::RecordSetBuilder;
pub use self::traits::ResourceBuilder;
