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

use core::cell::RefCell;

use log::error;

use super::{
    LocationStruct, MapStruct, ProgressStruct, StorageDelegate, MAX_PROGRESS_ELEMENTS,
    MAX_SELECTED_LOCATIONS, MAX_SUPPORTED_LOCATIONS, MAX_SUPPORTED_MAPS,
};

/// A [`StorageDelegate`] keeping the cluster lists in memory, each bounded to the
/// maximum number of entries the cluster allows.
///
/// Not `Sync`: it is meant to be used from the single context which runs the data model.
#[derive(Debug, Default)]
pub struct MemStorage {
    supported_locations: RefCell<heapless::Vec<LocationStruct, MAX_SUPPORTED_LOCATIONS>>,
    supported_maps: RefCell<heapless::Vec<MapStruct, MAX_SUPPORTED_MAPS>>,
    selected_locations: RefCell<heapless::Vec<u32, MAX_SELECTED_LOCATIONS>>,
    progress: RefCell<heapless::Vec<ProgressStruct, MAX_PROGRESS_ELEMENTS>>,
}

impl MemStorage {
    pub const fn new() -> Self {
        Self {
            supported_locations: RefCell::new(heapless::Vec::new()),
            supported_maps: RefCell::new(heapless::Vec::new()),
            selected_locations: RefCell::new(heapless::Vec::new()),
            progress: RefCell::new(heapless::Vec::new()),
        }
    }
}

fn push<T, const N: usize>(list: &RefCell<heapless::Vec<T, N>>, item: T, what: &str) -> bool {
    if list.borrow_mut().push(item).is_err() {
        error!("No space left for another {} entry", what);
        false
    } else {
        true
    }
}

fn replace<T, const N: usize>(list: &RefCell<heapless::Vec<T, N>>, index: usize, item: T) -> bool {
    match list.borrow_mut().get_mut(index) {
        Some(entry) => {
            *entry = item;
            true
        }
        None => false,
    }
}

fn remove<T, const N: usize>(list: &RefCell<heapless::Vec<T, N>>, index: usize) -> bool {
    let mut list = list.borrow_mut();

    if index < list.len() {
        list.remove(index);
        true
    } else {
        false
    }
}

impl StorageDelegate for MemStorage {
    fn supported_locations_count(&self) -> usize {
        self.supported_locations.borrow().len()
    }

    fn supported_location(&self, index: usize) -> Option<LocationStruct> {
        self.supported_locations.borrow().get(index).cloned()
    }

    fn supported_location_by_id(&self, location_id: u32) -> Option<(usize, LocationStruct)> {
        self.supported_locations
            .borrow()
            .iter()
            .enumerate()
            .find(|(_, location)| location.location_id == location_id)
            .map(|(index, location)| (index, location.clone()))
    }

    fn add_supported_location(&self, location: LocationStruct) -> bool {
        push(&self.supported_locations, location, "supported location")
    }

    fn modify_supported_location(&self, index: usize, location: LocationStruct) -> bool {
        replace(&self.supported_locations, index, location)
    }

    fn remove_supported_location(&self, index: usize) -> bool {
        remove(&self.supported_locations, index)
    }

    fn clear_supported_locations(&self) -> bool {
        self.supported_locations.borrow_mut().clear();
        true
    }

    fn supported_maps_count(&self) -> usize {
        self.supported_maps.borrow().len()
    }

    fn supported_map(&self, index: usize) -> Option<MapStruct> {
        self.supported_maps.borrow().get(index).cloned()
    }

    fn add_supported_map(&self, map: MapStruct) -> bool {
        push(&self.supported_maps, map, "supported map")
    }

    fn modify_supported_map(&self, index: usize, map: MapStruct) -> bool {
        replace(&self.supported_maps, index, map)
    }

    fn remove_supported_map(&self, index: usize) -> bool {
        remove(&self.supported_maps, index)
    }

    fn clear_supported_maps(&self) -> bool {
        self.supported_maps.borrow_mut().clear();
        true
    }

    fn selected_locations_count(&self) -> usize {
        self.selected_locations.borrow().len()
    }

    fn selected_location(&self, index: usize) -> Option<u32> {
        self.selected_locations.borrow().get(index).copied()
    }

    fn is_selected_location(&self, location_id: u32) -> bool {
        self.selected_locations.borrow().contains(&location_id)
    }

    fn add_selected_location(&self, location_id: u32) -> bool {
        push(&self.selected_locations, location_id, "selected location")
    }

    fn remove_selected_location(&self, index: usize) -> bool {
        remove(&self.selected_locations, index)
    }

    fn clear_selected_locations(&self) -> bool {
        self.selected_locations.borrow_mut().clear();
        true
    }

    fn progress_count(&self) -> usize {
        self.progress.borrow().len()
    }

    fn progress_element(&self, index: usize) -> Option<ProgressStruct> {
        self.progress.borrow().get(index).copied()
    }

    fn add_progress_element(&self, element: ProgressStruct) -> bool {
        push(&self.progress, element, "progress")
    }

    fn modify_progress_element(&self, index: usize, element: ProgressStruct) -> bool {
        replace(&self.progress, index, element)
    }

    fn remove_progress_element(&self, index: usize) -> bool {
        remove(&self.progress, index)
    }

    fn clear_progress(&self) -> bool {
        self.progress.borrow_mut().clear();
        true
    }
}
