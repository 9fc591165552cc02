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

use core::cell::Cell;

use log::{debug, error, info, warn};

use crate::dm::{
    AttrDataEncoder, AttrId, ChangeNotify, CmdDataEncoder, Dataver, GlobalElements, Handler,
    InvokeContext, ReadContext,
};
use crate::error::{Error, ErrorCode};
use crate::tlv::{FromTLV, Nullable, ToTLV};

use super::{
    is_unique_map_name, is_unique_supported_location, is_valid_progress_element,
    is_valid_supported_location, set_status_text, should_report_estimated_end_time, AreaType,
    AttributeId, CommandId, Delegate, Feature, FloorSurfaceTag, LandmarkTag, LocationStruct,
    MapStruct, OperationalStatus, PositionTag, ProgressStruct, RespCommandId,
    SelectLocationsRequest, SelectLocationsResponse, SelectLocationsStatus, ServiceAreaConfig,
    SkipCurrentLocationResponse, SkipCurrentLocationStatus, StatusText, StorageDelegate, ID,
    MAX_PROGRESS_ELEMENTS, MAX_SELECTED_LOCATIONS, MAX_SUPPORTED_LOCATIONS, MAX_SUPPORTED_MAPS,
};

/// The server of the Service Area cluster on one endpoint.
///
/// The handler serves the attribute reads and the commands of the cluster, and offers
/// the device-facing API through which the device changes the cluster state. The list
/// attributes live in `storage`, the device policy decisions are taken by `delegate`.
/// All changes of the lists must go through this API: it keeps them consistent with
/// each other and reports the changes to `notify`.
///
/// The device-facing mutators return `false` and leave the cluster state untouched
/// when the change is not acceptable; the reason is logged.
pub struct ServiceAreaHandler<'a, S: StorageDelegate, D: Delegate> {
    config: ServiceAreaConfig,
    dataver: Dataver,
    storage: &'a S,
    delegate: &'a D,
    notify: &'a dyn ChangeNotify,
    current_location: Cell<Nullable<u32>>,
    estimated_end_time: Cell<Nullable<u32>>,
}

impl<'a, S: StorageDelegate, D: Delegate> ServiceAreaHandler<'a, S, D> {
    /// Create a new instance.
    pub const fn new(
        dataver: Dataver,
        config: ServiceAreaConfig,
        storage: &'a S,
        delegate: &'a D,
        notify: &'a dyn ChangeNotify,
    ) -> Self {
        Self {
            config,
            dataver,
            storage,
            delegate,
            notify,
            current_location: Cell::new(Nullable::none()),
            estimated_end_time: Cell::new(Nullable::none()),
        }
    }

    /// Check that the content the storage starts with is consistent, then initialize
    /// the delegate.
    ///
    /// Must be called once before the instance is registered for serving requests.
    pub fn init(&self) -> Result<(), Error> {
        let storage = self.storage;

        if !self.has_feature(Feature::MAPS) && storage.supported_maps_count() > 0 {
            error!(
                "Endpoint {}: supported maps provided without the MAPS feature",
                self.config.endpoint_id
            );
            Err(ErrorCode::InvalidState)?;
        }

        if !self.has_feature(Feature::PROGRESS_REPORTING) && storage.progress_count() > 0 {
            error!(
                "Endpoint {}: progress provided without the PROGRESS_REPORTING feature",
                self.config.endpoint_id
            );
            Err(ErrorCode::InvalidState)?;
        }

        for index in 0..storage.supported_maps_count() {
            let map = storage
                .supported_map(index)
                .ok_or(ErrorCode::InvalidState)?;

            let duplicate_id = (0..index)
                .filter_map(|other| storage.supported_map(other))
                .any(|other| other.map_id == map.map_id);

            if map.name.is_empty()
                || duplicate_id
                || !is_unique_map_name(storage, &map.name, Some(map.map_id))
            {
                error!(
                    "Endpoint {}: invalid supported map {}",
                    self.config.endpoint_id, map.map_id
                );
                Err(ErrorCode::InvalidState)?;
            }
        }

        for index in 0..storage.supported_locations_count() {
            let location = storage
                .supported_location(index)
                .ok_or(ErrorCode::InvalidState)?;

            let duplicate_id = (0..index)
                .filter_map(|other| storage.supported_location(other))
                .any(|other| other.location_id == location.location_id);

            if duplicate_id
                || !is_valid_supported_location(storage, &location)
                || !is_unique_supported_location(storage, &location, true)
            {
                error!(
                    "Endpoint {}: invalid supported {}",
                    self.config.endpoint_id, location
                );
                Err(ErrorCode::InvalidState)?;
            }
        }

        for index in 0..storage.selected_locations_count() {
            let location_id = storage
                .selected_location(index)
                .ok_or(ErrorCode::InvalidState)?;

            let duplicate = (0..index)
                .filter_map(|other| storage.selected_location(other))
                .any(|other| other == location_id);

            if duplicate || !storage.is_supported_location(location_id) {
                error!(
                    "Endpoint {}: invalid selected location {}",
                    self.config.endpoint_id, location_id
                );
                Err(ErrorCode::InvalidState)?;
            }
        }

        for index in 0..storage.progress_count() {
            let element = storage
                .progress_element(index)
                .ok_or(ErrorCode::InvalidState)?;

            let duplicate = (0..index)
                .filter_map(|other| storage.progress_element(other))
                .any(|other| other.location_id == element.location_id);

            if duplicate
                || !storage.is_supported_location(element.location_id)
                || !is_valid_progress_element(&element)
            {
                error!(
                    "Endpoint {}: invalid progress of location {}",
                    self.config.endpoint_id, element.location_id
                );
                Err(ErrorCode::InvalidState)?;
            }
        }

        self.delegate.init()?;

        info!(
            "Endpoint {}: Service Area cluster initialized, features {:?}",
            self.config.endpoint_id, self.config.features
        );

        Ok(())
    }

    pub fn config(&self) -> &ServiceAreaConfig {
        &self.config
    }

    pub fn features(&self) -> Feature {
        self.config.features
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.config.features.contains(feature)
    }

    pub fn dataver(&self) -> u32 {
        self.dataver.get()
    }

    pub fn storage(&self) -> &'a S {
        self.storage
    }

    pub fn delegate(&self) -> &'a D {
        self.delegate
    }

    /// The current location, as kept by the storage when it keeps it.
    pub fn current_location(&self) -> Nullable<u32> {
        self.storage
            .current_location()
            .unwrap_or_else(|| self.current_location.get())
    }

    /// The estimated end time, as kept by the storage when it keeps it.
    pub fn estimated_end_time(&self) -> Nullable<u32> {
        self.storage
            .estimated_end_time()
            .unwrap_or_else(|| self.estimated_end_time.get())
    }

    /// Handle the `SelectLocations` command.
    pub fn handle_select_locations(
        &self,
        request: &SelectLocationsRequest,
    ) -> SelectLocationsResponse {
        let mut status_text = StatusText::new();
        let status = self.select_locations(request, &mut status_text);

        if status.requires_empty_text() {
            status_text.clear();
        } else if status != SelectLocationsStatus::Success && status_text.is_empty() {
            warn!(
                "Endpoint {}: no status text provided for {:?}",
                self.config.endpoint_id, status
            );
            set_status_text(&mut status_text, "The selected locations were rejected");
        }

        info!(
            "Endpoint {}: SelectLocations {:?} -> {:?} \"{}\"",
            self.config.endpoint_id,
            request.new_locations.as_opt_ref(),
            status,
            status_text
        );

        SelectLocationsResponse {
            status,
            status_text,
        }
    }

    fn select_locations(
        &self,
        request: &SelectLocationsRequest,
        status_text: &mut StatusText,
    ) -> SelectLocationsStatus {
        if !request.has_valid_size() {
            set_status_text(status_text, "Invalid number of locations");
            return SelectLocationsStatus::InvalidSet;
        }

        let locations = request.locations();
        let mut unchanged = locations.len() == self.storage.selected_locations_count();

        for (index, location_id) in locations.iter().enumerate() {
            if !self.storage.is_supported_location(*location_id) {
                return SelectLocationsStatus::UnsupportedLocation;
            }

            unchanged = unchanged && self.storage.selected_location(index) == Some(*location_id);
        }

        if unchanged {
            debug!(
                "Endpoint {}: selected locations unchanged",
                self.config.endpoint_id
            );
            return SelectLocationsStatus::Success;
        }

        if !self.delegate.is_set_selected_locations_allowed(status_text) {
            return SelectLocationsStatus::InvalidInMode;
        }

        let duplicated = locations
            .iter()
            .enumerate()
            .any(|(index, location_id)| locations[..index].contains(location_id));
        if duplicated {
            return SelectLocationsStatus::DuplicatedLocations;
        }

        let mut status = SelectLocationsStatus::Success;
        if !self
            .delegate
            .is_valid_select_locations_set(request, &mut status, status_text)
        {
            if status == SelectLocationsStatus::Success {
                status = SelectLocationsStatus::InvalidSet;
            }

            return status;
        }

        status_text.clear();

        let previous: heapless::Vec<u32, MAX_SELECTED_LOCATIONS> =
            (0..self.storage.selected_locations_count())
                .filter_map(|index| self.storage.selected_location(index))
                .take(MAX_SELECTED_LOCATIONS)
                .collect();

        if !self.replace_selected_locations(locations) {
            error!(
                "Endpoint {}: failed to store the selected locations",
                self.config.endpoint_id
            );

            if !self.replace_selected_locations(&previous) {
                error!(
                    "Endpoint {}: failed to restore the selected locations",
                    self.config.endpoint_id
                );
                self.attribute_changed(AttributeId::SelectedLocations);
            }

            set_status_text(status_text, "Unable to store the selected locations");
            return SelectLocationsStatus::InvalidInMode;
        }

        self.attribute_changed(AttributeId::SelectedLocations);

        SelectLocationsStatus::Success
    }

    fn replace_selected_locations(&self, locations: &[u32]) -> bool {
        self.storage.clear_selected_locations()
            && locations
                .iter()
                .all(|location_id| self.storage.add_selected_location(*location_id))
    }

    /// Handle the `SkipCurrentLocation` command.
    pub fn handle_skip_current_location(&self) -> SkipCurrentLocationResponse {
        let response = self.skip_current_location();

        info!(
            "Endpoint {}: SkipCurrentLocation {:?} -> {:?} \"{}\"",
            self.config.endpoint_id,
            self.current_location().get(),
            response.status,
            response.status_text
        );

        response
    }

    fn skip_current_location(&self) -> SkipCurrentLocationResponse {
        if self.storage.selected_locations_count() == 0 {
            return SkipCurrentLocationResponse::new(
                SkipCurrentLocationStatus::InvalidLocationList,
                "",
            );
        }

        if self.current_location().is_none() {
            return SkipCurrentLocationResponse::new(
                SkipCurrentLocationStatus::InvalidInMode,
                "Current Location attribute is null",
            );
        }

        let mut status_text = StatusText::new();

        if self.delegate.handle_skip_current_location(&mut status_text) {
            return SkipCurrentLocationResponse {
                status: SkipCurrentLocationStatus::Success,
                status_text,
            };
        }

        if status_text.is_empty() {
            warn!(
                "Endpoint {}: no status text provided for a refused skip",
                self.config.endpoint_id
            );
            set_status_text(&mut status_text, "The current location cannot be skipped");
        }

        SkipCurrentLocationResponse {
            status: SkipCurrentLocationStatus::InvalidInMode,
            status_text,
        }
    }

    /// Add a location to the `SupportedLocations` attribute.
    #[allow(clippy::too_many_arguments)]
    pub fn add_supported_location(
        &self,
        location_id: u32,
        map_id: Nullable<u8>,
        location_name: &str,
        floor_number: Nullable<i16>,
        area_type: Nullable<AreaType>,
        landmark_tag: Nullable<LandmarkTag>,
        position_tag: Nullable<PositionTag>,
        surface_tag: Nullable<FloorSurfaceTag>,
    ) -> bool {
        if !self.delegate.is_supported_locations_change_allowed() {
            warn!(
                "Endpoint {}: supported locations cannot change in the current mode",
                self.config.endpoint_id
            );
            return false;
        }

        if self.storage.supported_locations_count() >= MAX_SUPPORTED_LOCATIONS {
            warn!(
                "Endpoint {}: no room for location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        let Ok(location) = LocationStruct::new(
            location_id,
            map_id,
            location_name,
            floor_number,
            area_type,
            landmark_tag,
            position_tag,
            surface_tag,
        ) else {
            warn!(
                "Endpoint {}: name of location {} is too long",
                self.config.endpoint_id, location_id
            );
            return false;
        };

        if !is_valid_supported_location(self.storage, &location)
            || !is_unique_supported_location(self.storage, &location, false)
        {
            return false;
        }

        debug!("Endpoint {}: adding {}", self.config.endpoint_id, location);

        if !self.storage.add_supported_location(location) {
            error!(
                "Endpoint {}: failed to store location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::SupportedLocations);

        true
    }

    /// Replace the content of the supported location `location_id`.
    ///
    /// Moving the location to another map invalidates it: it is dropped from the
    /// selected locations and the progress, and stops being the current location.
    #[allow(clippy::too_many_arguments)]
    pub fn modify_supported_location(
        &self,
        location_id: u32,
        map_id: Nullable<u8>,
        location_name: &str,
        floor_number: Nullable<i16>,
        area_type: Nullable<AreaType>,
        landmark_tag: Nullable<LandmarkTag>,
        position_tag: Nullable<PositionTag>,
        surface_tag: Nullable<FloorSurfaceTag>,
    ) -> bool {
        let Some((index, existing)) = self.storage.supported_location_by_id(location_id) else {
            warn!(
                "Endpoint {}: location {} is not supported",
                self.config.endpoint_id, location_id
            );
            return false;
        };

        let Ok(location) = LocationStruct::new(
            location_id,
            map_id,
            location_name,
            floor_number,
            area_type,
            landmark_tag,
            position_tag,
            surface_tag,
        ) else {
            warn!(
                "Endpoint {}: name of location {} is too long",
                self.config.endpoint_id, location_id
            );
            return false;
        };

        let map_changed = existing.map_id != location.map_id;

        if map_changed && !self.delegate.is_supported_locations_change_allowed() {
            warn!(
                "Endpoint {}: supported locations cannot change in the current mode",
                self.config.endpoint_id
            );
            return false;
        }

        if !is_valid_supported_location(self.storage, &location) {
            return false;
        }

        if existing == location {
            return true;
        }

        if !is_unique_supported_location(self.storage, &location, true) {
            return false;
        }

        debug!(
            "Endpoint {}: modifying {} into {}",
            self.config.endpoint_id, existing, location
        );

        if !self.storage.modify_supported_location(index, location) {
            error!(
                "Endpoint {}: failed to store location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        if map_changed {
            self.supported_locations_changed(Some(location_id));
        } else {
            self.attribute_changed(AttributeId::SupportedLocations);
        }

        true
    }

    /// Remove the supported location `location_id`, together with everything referencing it.
    pub fn remove_supported_location(&self, location_id: u32) -> bool {
        if !self.delegate.is_supported_locations_change_allowed() {
            warn!(
                "Endpoint {}: supported locations cannot change in the current mode",
                self.config.endpoint_id
            );
            return false;
        }

        let Some((index, _)) = self.storage.supported_location_by_id(location_id) else {
            warn!(
                "Endpoint {}: location {} is not supported",
                self.config.endpoint_id, location_id
            );
            return false;
        };

        if !self.storage.remove_supported_location(index) {
            error!(
                "Endpoint {}: failed to remove location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        self.supported_locations_changed(None);

        true
    }

    /// Remove all supported locations, together with everything referencing them.
    pub fn clear_supported_locations(&self) -> bool {
        if !self.delegate.is_supported_locations_change_allowed() {
            warn!(
                "Endpoint {}: supported locations cannot change in the current mode",
                self.config.endpoint_id
            );
            return false;
        }

        self.clear_locations()
    }

    fn clear_locations(&self) -> bool {
        if self.storage.supported_locations_count() == 0 {
            return true;
        }

        if !self.storage.clear_supported_locations() {
            error!(
                "Endpoint {}: failed to clear the supported locations",
                self.config.endpoint_id
            );
            return false;
        }

        self.supported_locations_changed(None);

        true
    }

    /// Add a map to the `SupportedMaps` attribute.
    ///
    /// The first map can only be added while there are no supported locations, as
    /// these would have no map.
    pub fn add_supported_map(&self, map_id: u8, name: &str) -> bool {
        if !self.has_feature(Feature::MAPS) {
            warn!(
                "Endpoint {}: maps are not supported without the MAPS feature",
                self.config.endpoint_id
            );
            return false;
        }

        let count = self.storage.supported_maps_count();

        if count >= MAX_SUPPORTED_MAPS {
            warn!(
                "Endpoint {}: no room for map {}",
                self.config.endpoint_id, map_id
            );
            return false;
        }

        if count == 0 && self.storage.supported_locations_count() > 0 {
            warn!(
                "Endpoint {}: cannot add map {} to locations without maps",
                self.config.endpoint_id, map_id
            );
            return false;
        }

        let Some(map) = self.new_map(map_id, name) else {
            return false;
        };

        if self.storage.is_supported_map(map_id) {
            warn!(
                "Endpoint {}: duplicate map ID {}",
                self.config.endpoint_id, map_id
            );
            return false;
        }

        if !is_unique_map_name(self.storage, name, None) {
            return false;
        }

        if !self.storage.add_supported_map(map) {
            error!(
                "Endpoint {}: failed to store map {}",
                self.config.endpoint_id, map_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::SupportedMaps);

        true
    }

    /// Change the name of the supported map `map_id`.
    pub fn rename_supported_map(&self, map_id: u8, new_name: &str) -> bool {
        let Some((index, existing)) = self.storage.supported_map_by_id(map_id) else {
            warn!(
                "Endpoint {}: map {} is not supported",
                self.config.endpoint_id, map_id
            );
            return false;
        };

        let Some(map) = self.new_map(map_id, new_name) else {
            return false;
        };

        if existing == map {
            return true;
        }

        if !is_unique_map_name(self.storage, new_name, Some(map_id)) {
            return false;
        }

        if !self.storage.modify_supported_map(index, map) {
            error!(
                "Endpoint {}: failed to store map {}",
                self.config.endpoint_id, map_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::SupportedMaps);

        true
    }

    /// Remove the supported map `map_id` and the locations on it.
    pub fn remove_supported_map(&self, map_id: u8) -> bool {
        if !self.delegate.is_supported_map_change_allowed() {
            warn!(
                "Endpoint {}: supported maps cannot change in the current mode",
                self.config.endpoint_id
            );
            return false;
        }

        let Some((index, _)) = self.storage.supported_map_by_id(map_id) else {
            warn!(
                "Endpoint {}: map {} is not supported",
                self.config.endpoint_id, map_id
            );
            return false;
        };

        if !self.storage.remove_supported_map(index) {
            error!(
                "Endpoint {}: failed to remove map {}",
                self.config.endpoint_id, map_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::SupportedMaps);

        let mut locations_removed = false;

        for index in (0..self.storage.supported_locations_count()).rev() {
            let on_map = self
                .storage
                .supported_location(index)
                .map(|location| location.map_id == Nullable::some(map_id))
                .unwrap_or(false);

            if on_map {
                if self.storage.remove_supported_location(index) {
                    locations_removed = true;
                } else {
                    error!(
                        "Endpoint {}: failed to remove a location of map {}",
                        self.config.endpoint_id, map_id
                    );
                }
            }
        }

        if locations_removed {
            self.supported_locations_changed(None);
        }

        true
    }

    /// Remove all supported maps, and with them all supported locations.
    pub fn clear_supported_maps(&self) -> bool {
        if !self.delegate.is_supported_map_change_allowed() {
            warn!(
                "Endpoint {}: supported maps cannot change in the current mode",
                self.config.endpoint_id
            );
            return false;
        }

        if self.storage.supported_maps_count() > 0 {
            if !self.storage.clear_supported_maps() {
                error!(
                    "Endpoint {}: failed to clear the supported maps",
                    self.config.endpoint_id
                );
                return false;
            }

            self.attribute_changed(AttributeId::SupportedMaps);
        }

        self.clear_locations()
    }

    fn new_map(&self, map_id: u8, name: &str) -> Option<MapStruct> {
        if name.is_empty() {
            warn!(
                "Endpoint {}: map {} needs a name",
                self.config.endpoint_id, map_id
            );
            return None;
        }

        match MapStruct::new(map_id, name) {
            Ok(map) => Some(map),
            Err(_) => {
                warn!(
                    "Endpoint {}: name of map {} is too long",
                    self.config.endpoint_id, map_id
                );
                None
            }
        }
    }

    /// Append a location to the `SelectedLocations` attribute.
    pub fn add_selected_location(&self, location_id: u32) -> bool {
        if self.storage.selected_locations_count() >= MAX_SELECTED_LOCATIONS {
            warn!(
                "Endpoint {}: no room to select location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        if !self.storage.is_supported_location(location_id) {
            warn!(
                "Endpoint {}: location {} is not supported",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        if self.storage.is_selected_location(location_id) {
            warn!(
                "Endpoint {}: location {} is already selected",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        let mut status_text = StatusText::new();
        if !self
            .delegate
            .is_set_selected_locations_allowed(&mut status_text)
        {
            warn!(
                "Endpoint {}: cannot select location {}: {}",
                self.config.endpoint_id, location_id, status_text
            );
            return false;
        }

        if !self.storage.add_selected_location(location_id) {
            error!(
                "Endpoint {}: failed to select location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::SelectedLocations);

        true
    }

    pub fn clear_selected_locations(&self) -> bool {
        if self.storage.selected_locations_count() == 0 {
            return true;
        }

        if !self.storage.clear_selected_locations() {
            error!(
                "Endpoint {}: failed to clear the selected locations",
                self.config.endpoint_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::SelectedLocations);

        true
    }

    /// Set the location the device is currently operating at.
    ///
    /// Setting it to `null` also sets the estimated end time to `null`.
    pub fn set_current_location(&self, location_id: Nullable<u32>) -> bool {
        if let Some(location_id) = location_id.get() {
            if !self.storage.is_supported_location(location_id) {
                warn!(
                    "Endpoint {}: location {} is not supported",
                    self.config.endpoint_id, location_id
                );
                return false;
            }
        }

        self.update_current_location(location_id);

        true
    }

    fn update_current_location(&self, location_id: Nullable<u32>) {
        if self.current_location() == location_id {
            return;
        }

        self.current_location.set(location_id);
        self.storage.set_current_location(location_id);
        self.attribute_changed(AttributeId::CurrentLocation);

        if location_id.is_none() {
            self.update_estimated_end_time(Nullable::none());
        }
    }

    /// Set the time (in seconds since the Unix epoch) the device expects to be done
    /// with the current location.
    ///
    /// Fails for a non-null time while there is no current location.
    pub fn set_estimated_end_time(&self, estimated_end_time: Nullable<u32>) -> bool {
        if self.current_location().is_none() && estimated_end_time.is_some() {
            warn!(
                "Endpoint {}: no estimated end time without a current location",
                self.config.endpoint_id
            );
            return false;
        }

        self.update_estimated_end_time(estimated_end_time);

        true
    }

    fn update_estimated_end_time(&self, estimated_end_time: Nullable<u32>) {
        let old = self.estimated_end_time();
        if old == estimated_end_time {
            return;
        }

        self.estimated_end_time.set(estimated_end_time);
        self.storage.set_estimated_end_time(estimated_end_time);

        if should_report_estimated_end_time(old, estimated_end_time) {
            self.attribute_changed(AttributeId::EstimatedEndTime);
        } else {
            // Unreported, but readers filtering on the data version must see it
            self.dataver.changed();
        }
    }

    /// Start tracking the progress of location `location_id`, as `Pending`.
    pub fn add_pending_progress_element(&self, location_id: u32) -> bool {
        if !self.has_feature(Feature::PROGRESS_REPORTING) {
            warn!(
                "Endpoint {}: progress is not reported without the PROGRESS_REPORTING feature",
                self.config.endpoint_id
            );
            return false;
        }

        if self.storage.progress_count() >= MAX_PROGRESS_ELEMENTS {
            warn!(
                "Endpoint {}: no room for the progress of location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        if !self.storage.is_supported_location(location_id) {
            warn!(
                "Endpoint {}: location {} is not supported",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        if self.storage.progress_element_by_id(location_id).is_some() {
            warn!(
                "Endpoint {}: progress of location {} already tracked",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        if !self
            .storage
            .add_progress_element(ProgressStruct::pending(location_id))
        {
            error!(
                "Endpoint {}: failed to store the progress of location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::Progress);

        true
    }

    /// Set the operational status of location `location_id`.
    ///
    /// A location which is no longer done loses its total operational time.
    pub fn set_progress_status(&self, location_id: u32, status: OperationalStatus) -> bool {
        self.update_progress(location_id, |element| {
            if element.status == status {
                return Some(false);
            }

            element.status = status;

            if !status.is_done() && element.total_operational_time.is_some() {
                element.total_operational_time = Some(Nullable::none());
            }

            Some(true)
        })
    }

    /// Set the time spent operating at location `location_id`.
    ///
    /// Only a location which is done (completed or skipped) can have a non-null time.
    pub fn set_progress_total_operational_time(
        &self,
        location_id: u32,
        total_operational_time: Nullable<u32>,
    ) -> bool {
        self.update_progress(location_id, |element| {
            if element.total_operational_time == Some(total_operational_time) {
                return Some(false);
            }

            if total_operational_time.is_some() && !element.status.is_done() {
                warn!(
                    "Location {} is {:?}, it cannot have a total operational time",
                    location_id, element.status
                );
                return None;
            }

            element.total_operational_time = Some(total_operational_time);

            Some(true)
        })
    }

    /// Set the time the device expects to spend operating at location `location_id`.
    pub fn set_progress_estimated_time(
        &self,
        location_id: u32,
        estimated_time: Nullable<u32>,
    ) -> bool {
        self.update_progress(location_id, |element| {
            if element.estimated_time == Some(estimated_time) {
                return Some(false);
            }

            element.estimated_time = Some(estimated_time);

            Some(true)
        })
    }

    /// Apply `f` to the progress element of `location_id`.
    ///
    /// `f` returns `None` to reject the change, or whether it changed the element.
    fn update_progress<F>(&self, location_id: u32, f: F) -> bool
    where
        F: FnOnce(&mut ProgressStruct) -> Option<bool>,
    {
        let Some((index, mut element)) = self.storage.progress_element_by_id(location_id) else {
            warn!(
                "Endpoint {}: no progress tracked for location {}",
                self.config.endpoint_id, location_id
            );
            return false;
        };

        match f(&mut element) {
            None => false,
            Some(false) => true,
            Some(true) => {
                if !self.storage.modify_progress_element(index, element) {
                    error!(
                        "Endpoint {}: failed to store the progress of location {}",
                        self.config.endpoint_id, location_id
                    );
                    return false;
                }

                self.attribute_changed(AttributeId::Progress);

                true
            }
        }
    }

    pub fn clear_progress(&self) -> bool {
        if self.storage.progress_count() == 0 {
            return true;
        }

        if !self.storage.clear_progress() {
            error!(
                "Endpoint {}: failed to clear the progress",
                self.config.endpoint_id
            );
            return false;
        }

        self.attribute_changed(AttributeId::Progress);

        true
    }

    /// The selected location the device should move to once done with the current one.
    ///
    /// With `LIST_ORDER` this is the selected location following the current one (or
    /// the first one when there is no current location). Otherwise it is the first
    /// selected location, other than the current one, which is not completed or skipped.
    pub fn next_selected_location(&self) -> Option<u32> {
        let mut selected = (0..self.storage.selected_locations_count())
            .filter_map(|index| self.storage.selected_location(index));

        let current = self.current_location().get();

        if self.has_feature(Feature::LIST_ORDER) {
            match current {
                None => selected.next(),
                Some(current) => selected.skip_while(|id| *id != current).nth(1),
            }
        } else {
            selected
                .filter(|id| Some(*id) != current)
                .find(|id| {
                    self.storage
                        .progress_element_by_id(*id)
                        .map(|(_, element)| !element.status.is_done())
                        .unwrap_or(true)
                })
        }
    }

    /// Bring the attributes depending on the supported locations back in line after a
    /// change of the supported locations, and report everything which changed.
    ///
    /// `invalidated` is a location which is still supported but should no longer be
    /// referenced, e.g. because it moved to another map.
    fn supported_locations_changed(&self, invalidated: Option<u32>) {
        let stale = |location_id: u32| {
            Some(location_id) == invalidated || !self.storage.is_supported_location(location_id)
        };

        let mut selected_changed = false;
        for index in (0..self.storage.selected_locations_count()).rev() {
            if self.storage.selected_location(index).map(stale).unwrap_or(false) {
                selected_changed |= self.storage.remove_selected_location(index);
            }
        }

        let mut progress_changed = false;
        for index in (0..self.storage.progress_count()).rev() {
            let is_stale = self
                .storage
                .progress_element(index)
                .map(|element| stale(element.location_id))
                .unwrap_or(false);

            if is_stale {
                progress_changed |= self.storage.remove_progress_element(index);
            }
        }

        self.attribute_changed(AttributeId::SupportedLocations);

        if selected_changed {
            self.attribute_changed(AttributeId::SelectedLocations);
        }

        if progress_changed {
            self.attribute_changed(AttributeId::Progress);
        }

        if self.current_location().get().map(stale).unwrap_or(false) {
            self.update_current_location(Nullable::none());
        }

        self.delegate.handle_supported_locations_updated();
    }

    fn attribute_changed(&self, attr: AttributeId) {
        self.dataver.changed();

        debug!(
            "Endpoint {}: attribute {:?} changed",
            self.config.endpoint_id, attr
        );

        self.notify
            .notify(self.config.endpoint_id, ID, attr as AttrId);
    }

    fn check_readable(&self, attr_id: AttrId) -> Result<(), Error> {
        if GlobalElements::is_global(attr_id) {
            return Ok(());
        }

        match AttributeId::try_from(attr_id)? {
            AttributeId::SupportedMaps if !self.has_feature(Feature::MAPS) => {
                Err(ErrorCode::AttributeNotFound.into())
            }
            AttributeId::Progress if !self.has_feature(Feature::PROGRESS_REPORTING) => {
                Err(ErrorCode::AttributeNotFound.into())
            }
            _ => Ok(()),
        }
    }
}

impl<S: StorageDelegate, D: Delegate> Handler for ServiceAreaHandler<'_, S, D> {
    fn read(&self, ctx: &ReadContext<'_>, encoder: AttrDataEncoder<'_>) -> Result<(), Error> {
        let attr = ctx.attr();

        self.check_readable(attr.attr_id)?;

        let Some(writer) = encoder.with_dataver(self.dataver.get())? else {
            return Ok(());
        };

        if let Some(global) = GlobalElements::from_repr(attr.attr_id) {
            return match global {
                GlobalElements::FeatureMap => writer.set(&self.config.features.bits()),
                GlobalElements::ClusterRevision => writer.set(&self.config.revision),
            };
        }

        let storage = self.storage;

        match AttributeId::try_from(attr.attr_id)? {
            AttributeId::SupportedLocations => writer.set_nullable_list(
                storage.supported_locations_count(),
                |index, tag, tw| {
                    storage
                        .supported_location(index)
                        .ok_or(ErrorCode::InvalidState)?
                        .to_tlv(tag, tw)
                },
            ),
            AttributeId::SupportedMaps => {
                writer.set_nullable_list(storage.supported_maps_count(), |index, tag, tw| {
                    storage
                        .supported_map(index)
                        .ok_or(ErrorCode::InvalidState)?
                        .to_tlv(tag, tw)
                })
            }
            AttributeId::SelectedLocations => writer.set_nullable_list(
                storage.selected_locations_count(),
                |index, tag, tw| {
                    storage
                        .selected_location(index)
                        .ok_or(ErrorCode::InvalidState)?
                        .to_tlv(tag, tw)
                },
            ),
            AttributeId::CurrentLocation => writer.set(&self.current_location()),
            AttributeId::EstimatedEndTime => writer.set(&self.estimated_end_time()),
            AttributeId::Progress => {
                writer.set_nullable_list(storage.progress_count(), |index, tag, tw| {
                    storage
                        .progress_element(index)
                        .ok_or(ErrorCode::InvalidState)?
                        .to_tlv(tag, tw)
                })
            }
        }
    }

    fn invoke(&self, ctx: &InvokeContext<'_>, encoder: CmdDataEncoder<'_>) -> Result<(), Error> {
        match CommandId::try_from(ctx.cmd().cmd_id)? {
            CommandId::SelectLocations => {
                let response = match SelectLocationsRequest::from_tlv(ctx.data()) {
                    Ok(request) => self.handle_select_locations(&request),
                    Err(err) => {
                        warn!(
                            "Endpoint {}: malformed SelectLocations request: {}",
                            self.config.endpoint_id, err
                        );
                        SelectLocationsResponse::new(
                            SelectLocationsStatus::InvalidSet,
                            "Malformed list of locations",
                        )
                    }
                };

                encoder
                    .with_command(RespCommandId::SelectLocationsResponse as _)?
                    .set(&response)
            }
            CommandId::SkipCurrentLocation => {
                let response = self.handle_skip_current_location();

                encoder
                    .with_command(RespCommandId::SkipCurrentLocationResponse as _)?
                    .set(&response)
            }
        }
    }
}
