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

use core::fmt;

use strum::FromRepr;

use crate::error::{Error, ErrorCode};
use crate::tlv::{FromTLV, Nullable, TLVElement, TLVTag, TLVWrite, ToTLV};
use crate::tlv_u8_enum;

use super::{
    AreaType, FloorSurfaceTag, LandmarkTag, PositionTag, MAX_LOCATION_NAME_LEN,
    MAX_MAP_NAME_LEN, MAX_SELECTED_LOCATIONS, MAX_STATUS_TEXT_LEN,
};

pub type LocationName = heapless::String<MAX_LOCATION_NAME_LEN>;
pub type MapName = heapless::String<MAX_MAP_NAME_LEN>;
pub type StatusText = heapless::String<MAX_STATUS_TEXT_LEN>;

/// Copy `text` into a `StatusText`, truncating it at a char boundary if it does not fit.
pub fn status_text(text: &str) -> StatusText {
    let mut status_text = StatusText::new();
    set_status_text(&mut status_text, text);

    status_text
}

/// Replace the content of `status_text` with `text`, truncating at a char boundary.
pub fn set_status_text(status_text: &mut StatusText, text: &str) {
    status_text.clear();

    let mut len = text.len().min(MAX_STATUS_TEXT_LEN);
    while !text.is_char_boundary(len) {
        len -= 1;
    }

    // Cannot fail, `len` is within the capacity
    let _ = status_text.push_str(&text[..len]);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum OperationalStatus {
    Pending = 0,
    Operating = 1,
    Skipped = 2,
    Completed = 3,
}

impl OperationalStatus {
    /// Whether the device is done with the location, i.e. it was either completed or skipped.
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Skipped | Self::Completed)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum SelectLocationsStatus {
    Success = 0,
    UnsupportedLocation = 1,
    DuplicatedLocations = 2,
    InvalidInMode = 3,
    InvalidSet = 4,
}

impl SelectLocationsStatus {
    /// Statuses which must be reported with an empty status text.
    pub const fn requires_empty_text(&self) -> bool {
        matches!(self, Self::UnsupportedLocation | Self::DuplicatedLocations)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromRepr)]
#[repr(u8)]
pub enum SkipCurrentLocationStatus {
    Success = 0,
    InvalidLocationList = 1,
    InvalidInMode = 2,
}

impl SkipCurrentLocationStatus {
    /// Statuses which must be reported with an empty status text.
    pub const fn requires_empty_text(&self) -> bool {
        matches!(self, Self::InvalidLocationList)
    }
}

tlv_u8_enum!(OperationalStatus SelectLocationsStatus SkipCurrentLocationStatus);

/// The human-facing description of a location.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct LocationDescriptor {
    pub location_name: LocationName,
    pub floor_number: Nullable<i16>,
    pub area_type: Nullable<AreaType>,
}

impl ToTLV for LocationDescriptor {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        self.location_name.to_tlv(&TLVTag::Context(0), tw)?;
        self.floor_number.to_tlv(&TLVTag::Context(1), tw)?;
        self.area_type.to_tlv(&TLVTag::Context(2), tw)?;
        tw.end_container()
    }
}

impl FromTLV for LocationDescriptor {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            location_name: FromTLV::from_ctx(element, 0)?,
            floor_number: FromTLV::from_ctx(element, 1)?,
            area_type: FromTLV::from_ctx(element, 2)?,
        })
    }
}

/// Everything which describes a location, apart from its ID and map.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct LocationInfo {
    pub location_info: Nullable<LocationDescriptor>,
    pub landmark_tag: Nullable<LandmarkTag>,
    pub position_tag: Nullable<PositionTag>,
    pub surface_tag: Nullable<FloorSurfaceTag>,
}

impl ToTLV for LocationInfo {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        self.location_info.to_tlv(&TLVTag::Context(0), tw)?;
        self.landmark_tag.to_tlv(&TLVTag::Context(1), tw)?;
        self.position_tag.to_tlv(&TLVTag::Context(2), tw)?;
        self.surface_tag.to_tlv(&TLVTag::Context(3), tw)?;
        tw.end_container()
    }
}

impl FromTLV for LocationInfo {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            location_info: FromTLV::from_ctx(element, 0)?,
            landmark_tag: FromTLV::from_ctx(element, 1)?,
            position_tag: FromTLV::from_ctx(element, 2)?,
            surface_tag: FromTLV::from_ctx(element, 3)?,
        })
    }
}

/// An entry of the `SupportedLocations` attribute.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct LocationStruct {
    pub location_id: u32,
    pub map_id: Nullable<u8>,
    pub location_info: LocationInfo,
}

impl LocationStruct {
    /// Build a location from its individual fields.
    ///
    /// The location descriptor is left `null` when the name is empty and neither
    /// the floor number nor the area type is provided.
    ///
    /// Fails with `ConstraintError` if the name is longer than `MAX_LOCATION_NAME_LEN` bytes.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        location_id: u32,
        map_id: Nullable<u8>,
        location_name: &str,
        floor_number: Nullable<i16>,
        area_type: Nullable<AreaType>,
        landmark_tag: Nullable<LandmarkTag>,
        position_tag: Nullable<PositionTag>,
        surface_tag: Nullable<FloorSurfaceTag>,
    ) -> Result<Self, Error> {
        let location_info = if location_name.is_empty()
            && floor_number.is_none()
            && area_type.is_none()
        {
            Nullable::none()
        } else {
            let mut name = LocationName::new();
            name.push_str(location_name)
                .map_err(|_| ErrorCode::ConstraintError)?;

            Nullable::some(LocationDescriptor {
                location_name: name,
                floor_number,
                area_type,
            })
        };

        Ok(Self {
            location_id,
            map_id,
            location_info: LocationInfo {
                location_info,
                landmark_tag,
                position_tag,
                surface_tag,
            },
        })
    }

    /// The name of the location, if it has a descriptor.
    pub fn name(&self) -> Option<&str> {
        self.location_info
            .location_info
            .as_opt_ref()
            .map(|descriptor| descriptor.location_name.as_str())
    }

    /// Compare two locations field by field, optionally leaving out the location
    /// ID and the map ID.
    pub fn is_equal(&self, other: &Self, ignore_location_id: bool, ignore_map_id: bool) -> bool {
        (ignore_location_id || self.location_id == other.location_id)
            && (ignore_map_id || self.map_id == other.map_id)
            && self.location_info == other.location_info
    }
}

impl ToTLV for LocationStruct {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        tw.u32(&TLVTag::Context(0), self.location_id)?;
        self.map_id.to_tlv(&TLVTag::Context(1), tw)?;
        self.location_info.to_tlv(&TLVTag::Context(2), tw)?;
        tw.end_container()
    }
}

impl FromTLV for LocationStruct {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            location_id: FromTLV::from_ctx(element, 0)?,
            map_id: FromTLV::from_ctx(element, 1)?,
            location_info: FromTLV::from_ctx(element, 2)?,
        })
    }
}

impl fmt::Display for LocationStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "location {}", self.location_id)?;

        if let Some(map_id) = self.map_id.get() {
            write!(f, " (map {})", map_id)?;
        }

        if let Some(name) = self.name() {
            write!(f, " \"{}\"", name)?;
        }

        Ok(())
    }
}

/// An entry of the `SupportedMaps` attribute.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MapStruct {
    pub map_id: u8,
    pub name: MapName,
}

impl MapStruct {
    /// Fails with `ConstraintError` if the name is longer than `MAX_MAP_NAME_LEN` bytes.
    pub fn new(map_id: u8, name: &str) -> Result<Self, Error> {
        let mut map_name = MapName::new();
        map_name
            .push_str(name)
            .map_err(|_| ErrorCode::ConstraintError)?;

        Ok(Self {
            map_id,
            name: map_name,
        })
    }
}

impl ToTLV for MapStruct {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        tw.u8(&TLVTag::Context(0), self.map_id)?;
        self.name.to_tlv(&TLVTag::Context(1), tw)?;
        tw.end_container()
    }
}

impl FromTLV for MapStruct {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            map_id: FromTLV::from_ctx(element, 0)?,
            name: FromTLV::from_ctx(element, 1)?,
        })
    }
}

/// An entry of the `Progress` attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgressStruct {
    pub location_id: u32,
    pub status: OperationalStatus,
    pub total_operational_time: Option<Nullable<u32>>,
    pub estimated_time: Option<Nullable<u32>>,
}

impl ProgressStruct {
    /// A progress entry for a location the device has not started yet.
    pub const fn pending(location_id: u32) -> Self {
        Self {
            location_id,
            status: OperationalStatus::Pending,
            total_operational_time: None,
            estimated_time: None,
        }
    }
}

impl ToTLV for ProgressStruct {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        tw.u32(&TLVTag::Context(0), self.location_id)?;
        self.status.to_tlv(&TLVTag::Context(1), tw)?;
        self.total_operational_time
            .to_tlv(&TLVTag::Context(2), tw)?;
        self.estimated_time.to_tlv(&TLVTag::Context(3), tw)?;
        tw.end_container()
    }
}

impl FromTLV for ProgressStruct {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            location_id: FromTLV::from_ctx(element, 0)?,
            status: FromTLV::from_ctx(element, 1)?,
            total_operational_time: FromTLV::from_ctx(element, 2)?,
            estimated_time: FromTLV::from_ctx(element, 3)?,
        })
    }
}

/// The payload of the `SelectLocations` command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SelectLocationsRequest {
    /// The locations to operate at; `null` clears the selection.
    pub new_locations: Nullable<Vec<u32>>,
}

impl SelectLocationsRequest {
    /// The requested locations, an empty slice for a `null` list.
    pub fn locations(&self) -> &[u32] {
        self.new_locations
            .as_opt_ref()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the request carries an explicit list within the accepted size range.
    pub fn has_valid_size(&self) -> bool {
        self.new_locations
            .as_opt_ref()
            .map(|locations| !locations.is_empty() && locations.len() <= MAX_SELECTED_LOCATIONS)
            .unwrap_or(true)
    }
}

impl FromTLV for SelectLocationsRequest {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            new_locations: FromTLV::from_ctx(element, 0)?,
        })
    }
}

impl ToTLV for SelectLocationsRequest {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        self.new_locations.to_tlv(&TLVTag::Context(0), tw)?;
        tw.end_container()
    }
}

/// The payload of the `SelectLocationsResponse` command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SelectLocationsResponse {
    pub status: SelectLocationsStatus,
    pub status_text: StatusText,
}

impl SelectLocationsResponse {
    pub fn new(status: SelectLocationsStatus, status_text: &str) -> Self {
        Self {
            status,
            status_text: self::status_text(status_text),
        }
    }

    pub fn success() -> Self {
        Self::new(SelectLocationsStatus::Success, "")
    }
}

impl ToTLV for SelectLocationsResponse {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        self.status.to_tlv(&TLVTag::Context(0), tw)?;
        self.status_text.to_tlv(&TLVTag::Context(1), tw)?;
        tw.end_container()
    }
}

impl FromTLV for SelectLocationsResponse {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            status: FromTLV::from_ctx(element, 0)?,
            status_text: FromTLV::from_ctx(element, 1)?,
        })
    }
}

/// The payload of the `SkipCurrentLocationResponse` command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SkipCurrentLocationResponse {
    pub status: SkipCurrentLocationStatus,
    pub status_text: StatusText,
}

impl SkipCurrentLocationResponse {
    pub fn new(status: SkipCurrentLocationStatus, status_text: &str) -> Self {
        Self {
            status,
            status_text: self::status_text(status_text),
        }
    }

    pub fn success() -> Self {
        Self::new(SkipCurrentLocationStatus::Success, "")
    }
}

impl ToTLV for SkipCurrentLocationResponse {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        self.status.to_tlv(&TLVTag::Context(0), tw)?;
        self.status_text.to_tlv(&TLVTag::Context(1), tw)?;
        tw.end_container()
    }
}

impl FromTLV for SkipCurrentLocationResponse {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Self {
            status: FromTLV::from_ctx(element, 0)?,
            status_text: FromTLV::from_ctx(element, 1)?,
        })
    }
}
