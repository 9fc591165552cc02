/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! Native Rust implementation of the Matter Service Area cluster.
//!
//! The crate contains the cluster engine ([`dm::clusters::service_area::ServiceAreaHandler`]),
//! the storage and policy delegate contracts the embedding application implements, and
//! the thin slice of data-model plumbing (attribute/command encoders, change notification,
//! handler routing) the engine plugs into.
//!
//! The TLV wire codec, the exchange layer and session management are not part of this
//! crate: the data-model plumbing only talks to them through the [`tlv::TLVWrite`] writer
//! interface and the decoded [`tlv::TLVElement`] tree.

pub mod dm;
pub mod error;
pub mod tlv;
