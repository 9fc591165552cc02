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

use crate::error::Error;
use crate::tlv::Nullable;

use super::{
    set_status_text, LocationStruct, MapStruct, ProgressStruct, SelectLocationsRequest,
    SelectLocationsStatus, StatusText,
};

/// The storage backing the list attributes of the Service Area cluster.
///
/// Entries are addressed by their index, which must stay stable as long as the
/// list is not mutated. Implementations are expected to be synchronous and cheap, as
/// they are called while the attribute reports and command responses are being
/// encoded.
///
/// Only [`ServiceAreaHandler`](super::ServiceAreaHandler) should mutate the storage, as
/// it is the one enforcing the constraints between the lists. All mutators return
/// `false` when the storage could not perform the change, in which case it must be
/// left untouched.
pub trait StorageDelegate {
    // SupportedLocations

    fn supported_locations_count(&self) -> usize;

    fn supported_location(&self, index: usize) -> Option<LocationStruct>;

    /// Find the supported location with the given ID, returning its index too.
    fn supported_location_by_id(&self, location_id: u32) -> Option<(usize, LocationStruct)> {
        (0..self.supported_locations_count())
            .filter_map(|index| self.supported_location(index).map(|loc| (index, loc)))
            .find(|(_, loc)| loc.location_id == location_id)
    }

    fn is_supported_location(&self, location_id: u32) -> bool {
        self.supported_location_by_id(location_id).is_some()
    }

    fn add_supported_location(&self, location: LocationStruct) -> bool;

    fn modify_supported_location(&self, index: usize, location: LocationStruct) -> bool;

    fn remove_supported_location(&self, index: usize) -> bool;

    fn clear_supported_locations(&self) -> bool;

    // SupportedMaps

    fn supported_maps_count(&self) -> usize;

    fn supported_map(&self, index: usize) -> Option<MapStruct>;

    /// Find the supported map with the given ID, returning its index too.
    fn supported_map_by_id(&self, map_id: u8) -> Option<(usize, MapStruct)> {
        (0..self.supported_maps_count())
            .filter_map(|index| self.supported_map(index).map(|map| (index, map)))
            .find(|(_, map)| map.map_id == map_id)
    }

    fn is_supported_map(&self, map_id: u8) -> bool {
        self.supported_map_by_id(map_id).is_some()
    }

    fn add_supported_map(&self, map: MapStruct) -> bool;

    fn modify_supported_map(&self, index: usize, map: MapStruct) -> bool;

    fn remove_supported_map(&self, index: usize) -> bool;

    fn clear_supported_maps(&self) -> bool;

    // SelectedLocations

    fn selected_locations_count(&self) -> usize;

    fn selected_location(&self, index: usize) -> Option<u32>;

    fn is_selected_location(&self, location_id: u32) -> bool {
        (0..self.selected_locations_count())
            .filter_map(|index| self.selected_location(index))
            .any(|selected| selected == location_id)
    }

    fn add_selected_location(&self, location_id: u32) -> bool;

    fn remove_selected_location(&self, index: usize) -> bool;

    fn clear_selected_locations(&self) -> bool;

    // Progress

    fn progress_count(&self) -> usize;

    fn progress_element(&self, index: usize) -> Option<ProgressStruct>;

    /// Find the progress element of the given location, returning its index too.
    fn progress_element_by_id(&self, location_id: u32) -> Option<(usize, ProgressStruct)> {
        (0..self.progress_count())
            .filter_map(|index| self.progress_element(index).map(|elem| (index, elem)))
            .find(|(_, elem)| elem.location_id == location_id)
    }

    fn add_progress_element(&self, element: ProgressStruct) -> bool;

    fn modify_progress_element(&self, index: usize, element: ProgressStruct) -> bool;

    fn remove_progress_element(&self, index: usize) -> bool;

    fn clear_progress(&self) -> bool;

    // Current location and estimated end time

    /// The `CurrentLocation` kept by the device itself, if any.
    ///
    /// Returning `None` lets the handler keep the value.
    fn current_location(&self) -> Option<Nullable<u32>> {
        None
    }

    /// Called by the handler whenever `CurrentLocation` changes.
    fn set_current_location(&self, _location_id: Nullable<u32>) {}

    /// The `EstimatedEndTime` kept by the device itself, if any.
    ///
    /// Returning `None` lets the handler keep the value.
    fn estimated_end_time(&self) -> Option<Nullable<u32>> {
        None
    }

    /// Called by the handler whenever `EstimatedEndTime` changes.
    fn set_estimated_end_time(&self, _estimated_end_time: Nullable<u32>) {}
}

impl<T> StorageDelegate for &T
where
    T: StorageDelegate,
{
    fn supported_locations_count(&self) -> usize {
        (**self).supported_locations_count()
    }

    fn supported_location(&self, index: usize) -> Option<LocationStruct> {
        (**self).supported_location(index)
    }

    fn supported_location_by_id(&self, location_id: u32) -> Option<(usize, LocationStruct)> {
        (**self).supported_location_by_id(location_id)
    }

    fn add_supported_location(&self, location: LocationStruct) -> bool {
        (**self).add_supported_location(location)
    }

    fn modify_supported_location(&self, index: usize, location: LocationStruct) -> bool {
        (**self).modify_supported_location(index, location)
    }

    fn remove_supported_location(&self, index: usize) -> bool {
        (**self).remove_supported_location(index)
    }

    fn clear_supported_locations(&self) -> bool {
        (**self).clear_supported_locations()
    }

    fn supported_maps_count(&self) -> usize {
        (**self).supported_maps_count()
    }

    fn supported_map(&self, index: usize) -> Option<MapStruct> {
        (**self).supported_map(index)
    }

    fn supported_map_by_id(&self, map_id: u8) -> Option<(usize, MapStruct)> {
        (**self).supported_map_by_id(map_id)
    }

    fn add_supported_map(&self, map: MapStruct) -> bool {
        (**self).add_supported_map(map)
    }

    fn modify_supported_map(&self, index: usize, map: MapStruct) -> bool {
        (**self).modify_supported_map(index, map)
    }

    fn remove_supported_map(&self, index: usize) -> bool {
        (**self).remove_supported_map(index)
    }

    fn clear_supported_maps(&self) -> bool {
        (**self).clear_supported_maps()
    }

    fn selected_locations_count(&self) -> usize {
        (**self).selected_locations_count()
    }

    fn selected_location(&self, index: usize) -> Option<u32> {
        (**self).selected_location(index)
    }

    fn add_selected_location(&self, location_id: u32) -> bool {
        (**self).add_selected_location(location_id)
    }

    fn remove_selected_location(&self, index: usize) -> bool {
        (**self).remove_selected_location(index)
    }

    fn clear_selected_locations(&self) -> bool {
        (**self).clear_selected_locations()
    }

    fn progress_count(&self) -> usize {
        (**self).progress_count()
    }

    fn progress_element(&self, index: usize) -> Option<ProgressStruct> {
        (**self).progress_element(index)
    }

    fn progress_element_by_id(&self, location_id: u32) -> Option<(usize, ProgressStruct)> {
        (**self).progress_element_by_id(location_id)
    }

    fn add_progress_element(&self, element: ProgressStruct) -> bool {
        (**self).add_progress_element(element)
    }

    fn modify_progress_element(&self, index: usize, element: ProgressStruct) -> bool {
        (**self).modify_progress_element(index, element)
    }

    fn remove_progress_element(&self, index: usize) -> bool {
        (**self).remove_progress_element(index)
    }

    fn clear_progress(&self) -> bool {
        (**self).clear_progress()
    }

    fn current_location(&self) -> Option<Nullable<u32>> {
        (**self).current_location()
    }

    fn set_current_location(&self, location_id: Nullable<u32>) {
        (**self).set_current_location(location_id)
    }

    fn estimated_end_time(&self) -> Option<Nullable<u32>> {
        (**self).estimated_end_time()
    }

    fn set_estimated_end_time(&self, estimated_end_time: Nullable<u32>) {
        (**self).set_estimated_end_time(estimated_end_time)
    }
}

/// The policy decisions of the Service Area cluster which only the device can take.
///
/// Hooks which produce a status text write it into the provided `StatusText`.
pub trait Delegate {
    /// Called once from [`ServiceAreaHandler::init`](super::ServiceAreaHandler::init).
    fn init(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Whether the device accepts a new selection of locations in its current mode,
    /// e.g. a device without `SELECT_WHILE_RUNNING` refuses it while operating.
    ///
    /// When refusing, `status_text` must explain why.
    fn is_set_selected_locations_allowed(&self, _status_text: &mut StatusText) -> bool {
        true
    }

    /// Device-specific validation of a `SelectLocations` request which has already
    /// passed the generic checks (supported and unique location IDs).
    ///
    /// When refusing, `status` must be set to `InvalidSet` or `DuplicatedLocations`
    /// and, for `InvalidSet`, `status_text` must explain why.
    fn is_valid_select_locations_set(
        &self,
        _request: &SelectLocationsRequest,
        _status: &mut SelectLocationsStatus,
        _status_text: &mut StatusText,
    ) -> bool {
        true
    }

    /// Stop operating at the current location and move on to the next one.
    ///
    /// With `LIST_ORDER` the device moves to the next selected location in order,
    /// stopping once it was the last one; otherwise it may pick any selected location
    /// it did not complete yet.
    ///
    /// When refusing, `status_text` must explain why.
    fn handle_skip_current_location(&self, status_text: &mut StatusText) -> bool {
        set_status_text(
            status_text,
            "Skip Current Location command not supported by device",
        );

        false
    }

    /// Whether the supported locations may change in the current mode.
    fn is_supported_locations_change_allowed(&self) -> bool {
        true
    }

    /// Whether the supported maps may change in the current mode.
    fn is_supported_map_change_allowed(&self) -> bool {
        true
    }

    /// Called after the supported locations changed, once the selected locations,
    /// the current location and the progress were brought back in line.
    fn handle_supported_locations_updated(&self) {}
}

impl<T> Delegate for &T
where
    T: Delegate,
{
    fn init(&self) -> Result<(), Error> {
        (**self).init()
    }

    fn is_set_selected_locations_allowed(&self, status_text: &mut StatusText) -> bool {
        (**self).is_set_selected_locations_allowed(status_text)
    }

    fn is_valid_select_locations_set(
        &self,
        request: &SelectLocationsRequest,
        status: &mut SelectLocationsStatus,
        status_text: &mut StatusText,
    ) -> bool {
        (**self).is_valid_select_locations_set(request, status, status_text)
    }

    fn handle_skip_current_location(&self, status_text: &mut StatusText) -> bool {
        (**self).handle_skip_current_location(status_text)
    }

    fn is_supported_locations_change_allowed(&self) -> bool {
        (**self).is_supported_locations_change_allowed()
    }

    fn is_supported_map_change_allowed(&self) -> bool {
        (**self).is_supported_map_change_allowed()
    }

    fn handle_supported_locations_updated(&self) {
        (**self).handle_supported_locations_updated()
    }
}

/// A device accepting every change and refusing to skip locations.
impl Delegate for () {}
