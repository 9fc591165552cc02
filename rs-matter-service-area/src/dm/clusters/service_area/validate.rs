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

//! Checks of the constraints the Service Area lists must satisfy.
//!
//! These are used both when the device mutates the lists and when the storage is
//! validated on initialization.

use log::warn;

use crate::tlv::Nullable;

use super::{LocationStruct, ProgressStruct, StorageDelegate};

/// Check that a location is well-formed with respect to the supported maps currently
/// in `storage`.
///
/// - It must have a location descriptor or a landmark tag.
/// - A descriptor with an empty name must come with a floor number, an area type or
///   a landmark tag.
/// - A position tag requires a landmark tag.
/// - Its map ID must be `null` if there are no supported maps, and must reference one
///   of them otherwise.
pub fn is_valid_supported_location<S: StorageDelegate>(
    storage: &S,
    location: &LocationStruct,
) -> bool {
    let info = &location.location_info;

    if info.location_info.is_none() && info.landmark_tag.is_none() {
        warn!(
            "Invalid {}: neither a location descriptor nor a landmark tag",
            location
        );
        return false;
    }

    if let Some(descriptor) = info.location_info.as_opt_ref() {
        if descriptor.location_name.is_empty()
            && descriptor.floor_number.is_none()
            && descriptor.area_type.is_none()
            && info.landmark_tag.is_none()
        {
            warn!(
                "Invalid {}: empty name without floor number, area type or landmark tag",
                location
            );
            return false;
        }
    }

    if info.position_tag.is_some() && info.landmark_tag.is_none() {
        warn!("Invalid {}: position tag without a landmark tag", location);
        return false;
    }

    match location.map_id.get() {
        None if storage.supported_maps_count() > 0 => {
            warn!("Invalid {}: a map ID is required", location);
            false
        }
        Some(map_id) if !storage.is_supported_map(map_id) => {
            warn!("Invalid {}: map {} is not supported", location, map_id);
            false
        }
        _ => true,
    }
}

/// Check that no location in `storage` clashes with `location`.
///
/// Two locations clash when they have the same location ID, or when everything but
/// their location IDs is the same. With `skip_same_id` set, the stored entry with the
/// same location ID as `location` is not compared, which is what a modification of
/// that entry needs.
pub fn is_unique_supported_location<S: StorageDelegate>(
    storage: &S,
    location: &LocationStruct,
    skip_same_id: bool,
) -> bool {
    let has_maps = storage.supported_maps_count() > 0;

    for index in 0..storage.supported_locations_count() {
        let Some(existing) = storage.supported_location(index) else {
            continue;
        };

        if existing.location_id == location.location_id {
            if skip_same_id {
                continue;
            }

            warn!("Duplicate location ID {}", location.location_id);
            return false;
        }

        if existing.is_equal(location, true, !has_maps) {
            warn!("{} duplicates {}", location, existing);
            return false;
        }
    }

    true
}

/// Check that no map other than `skip_map_id` in `storage` is named `name`.
pub fn is_unique_map_name<S: StorageDelegate>(
    storage: &S,
    name: &str,
    skip_map_id: Option<u8>,
) -> bool {
    let unique = !(0..storage.supported_maps_count())
        .filter_map(|index| storage.supported_map(index))
        .any(|map| Some(map.map_id) != skip_map_id && map.name.as_str() == name);

    if !unique {
        warn!("Duplicate map name \"{}\"", name);
    }

    unique
}

/// Check that a progress element only reports a total operational time once the
/// device is done with its location.
pub fn is_valid_progress_element(element: &ProgressStruct) -> bool {
    let has_total_time = element
        .total_operational_time
        .map(|time| time.is_some())
        .unwrap_or(false);

    if has_total_time && !element.status.is_done() {
        warn!(
            "Progress of location {}: total operational time reported while {:?}",
            element.location_id, element.status
        );
        return false;
    }

    true
}

/// Whether a change of the `EstimatedEndTime` attribute from `old` to `new` should
/// be reported to subscribers.
///
/// Only meaningful changes are reported: a change between zero and non-zero, a
/// decrease, or a non-zero value appearing where there was none. Increases and
/// transitions to `null` are stored without being reported.
pub fn should_report_estimated_end_time(old: Nullable<u32>, new: Nullable<u32>) -> bool {
    match (old.get(), new.get()) {
        (Some(old), Some(new)) => (old == 0) != (new == 0) || new < old,
        (None, Some(new)) => new != 0,
        _ => false,
    }
}
