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

//! This module contains the implementation of the Service Area cluster and its handler.
//!
//! The cluster lets a client select the locations (rooms, zones, ...) a device such as a
//! robotic vacuum should operate in, and reports the device's progress through them.
//!
//! The cluster state is split in two:
//! - The application owns the list attributes (supported locations and maps, selected
//!   locations, progress) and exposes them through a [`StorageDelegate`], together with the
//!   device policy hooks of the [`Delegate`] trait.
//! - [`ServiceAreaHandler`] owns the scalar attributes (current location, estimated end
//!   time), serves reads and commands, and is the only place which mutates the delegate's
//!   collections, so all cross-attribute constraints are enforced in one spot.

use bitflags::bitflags;
use strum::FromRepr;

use crate::dm::{ClusterId, EndptId};
use crate::{attribute_enum, command_enum};

pub use delegate::*;
pub use handler::*;
pub use storage::*;
pub use structs::*;
pub use tags::*;
pub use validate::*;

mod delegate;
mod handler;
mod storage;
mod structs;
mod tags;
mod validate;

pub const ID: ClusterId = 0x0150;

pub const CLUSTER_REVISION: u16 = 1;

pub const MAX_SUPPORTED_LOCATIONS: usize = 255;
pub const MAX_SUPPORTED_MAPS: usize = 255;
pub const MAX_SELECTED_LOCATIONS: usize = 255;
pub const MAX_PROGRESS_ELEMENTS: usize = 255;

pub const MAX_LOCATION_NAME_LEN: usize = 128;
pub const MAX_MAP_NAME_LEN: usize = 64;
pub const MAX_STATUS_TEXT_LEN: usize = 256;

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Feature: u32 {
        /// The device operates at the selected locations in the order they were selected.
        const LIST_ORDER = 0x0000_0001;
        /// The selected locations may be changed while the device is operating.
        const SELECT_WHILE_RUNNING = 0x0000_0002;
        /// The device reports per-location progress through the `Progress` attribute.
        const PROGRESS_REPORTING = 0x0000_0004;
        /// Locations are grouped into maps, reported through the `SupportedMaps` attribute.
        const MAPS = 0x0000_0008;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum AttributeId {
    SupportedLocations = 0x0000,
    SupportedMaps = 0x0001,
    SelectedLocations = 0x0002,
    CurrentLocation = 0x0003,
    EstimatedEndTime = 0x0004,
    Progress = 0x0005,
}

attribute_enum!(AttributeId);

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum CommandId {
    SelectLocations = 0x00,
    SkipCurrentLocation = 0x02,
}

command_enum!(CommandId);

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum RespCommandId {
    SelectLocationsResponse = 0x01,
    SkipCurrentLocationResponse = 0x03,
}

/// The static configuration of a Service Area cluster instance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ServiceAreaConfig {
    /// The endpoint the cluster instance lives on
    pub endpoint_id: EndptId,
    /// The features advertised in the `FeatureMap` attribute
    pub features: Feature,
    /// The value of the `ClusterRevision` attribute
    pub revision: u16,
}

impl ServiceAreaConfig {
    pub const fn new(endpoint_id: EndptId, features: Feature) -> Self {
        Self {
            endpoint_id,
            features,
            revision: CLUSTER_REVISION,
        }
    }
}
