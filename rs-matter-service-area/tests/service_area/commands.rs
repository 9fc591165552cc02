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

use rs_matter_service_area::dm::clusters::service_area::{
    self, AttributeId, Feature, MemStorage, SelectLocationsStatus, SkipCurrentLocationStatus,
    StorageDelegate, MAX_SELECTED_LOCATIONS,
};
use rs_matter_service_area::dm::AttrId;
use rs_matter_service_area::error::ErrorCode;
use rs_matter_service_area::tlv::{Nullable, TLVElement, TLVTag};

use crate::common::device::{TestDevice, SELECTION_LOCKED_TEXT, UNREACHABLE_TEXT};
use crate::common::fixture::{add_location, add_two_floors, handler, ENDPOINT};
use crate::common::im::{
    invoke, read_list, select_locations, select_locations_raw, skip_current_location,
};
use crate::common::init_env_logger;
use crate::common::notify::RecordingNotify;
use crate::common::storage::TestStorage;

const SELECTED: AttrId = AttributeId::SelectedLocations as AttrId;

#[test]
fn test_select_locations() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    assert!(handler.add_supported_map(1, "Ground"));
    assert!(add_location(&handler, 10, Some(1), "Kitchen"));
    notify.take();

    let response = select_locations(&handler, Some(&[10]));
    assert_eq!(response.status, SelectLocationsStatus::Success);
    assert_eq!(response.status_text.as_str(), "");

    assert_eq!(
        read_list::<u32>(&handler, SELECTED).unwrap(),
        Some(vec![10])
    );
    assert_eq!(
        notify.take_all(),
        vec![(ENDPOINT, service_area::ID, SELECTED)]
    );
}

#[test]
fn test_select_locations_keeps_order() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(10));

    let response = select_locations(&handler, Some(&[20, 11, 10]));
    assert_eq!(response.status, SelectLocationsStatus::Success);
    assert_eq!(
        read_list::<u32>(&handler, SELECTED).unwrap(),
        Some(vec![20, 11, 10])
    );
}

#[test]
fn test_select_same_locations_is_noop() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert_eq!(
        select_locations(&handler, Some(&[10, 20])).status,
        SelectLocationsStatus::Success
    );
    notify.take();
    let dataver = handler.dataver();

    // Even when the device would refuse any change
    device.selection_locked.set(true);

    let response = select_locations(&handler, Some(&[10, 20]));
    assert_eq!(response.status, SelectLocationsStatus::Success);
    assert!(notify.is_empty());
    assert_eq!(handler.dataver(), dataver);

    // Same locations, different order
    let response = select_locations(&handler, Some(&[20, 10]));
    assert_eq!(response.status, SelectLocationsStatus::InvalidInMode);
    assert_eq!(response.status_text.as_str(), SELECTION_LOCKED_TEXT);
}

#[test]
fn test_select_duplicated_locations() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    notify.take();

    let response = select_locations(&handler, Some(&[10, 10]));
    assert_eq!(response.status, SelectLocationsStatus::DuplicatedLocations);
    assert_eq!(response.status_text.as_str(), "");

    assert_eq!(read_list::<u32>(&handler, SELECTED).unwrap(), None);
    assert!(notify.is_empty());
}

#[test]
fn test_select_unsupported_location() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);

    let response = select_locations(&handler, Some(&[10, 99, 10]));
    assert_eq!(response.status, SelectLocationsStatus::UnsupportedLocation);
    assert_eq!(response.status_text.as_str(), "");
    assert_eq!(storage.selected_locations_count(), 0);
}

#[test]
fn test_select_unsupported_location_before_duplicates() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);

    let response = select_locations(&handler, Some(&[10, 10, 99]));
    assert_eq!(response.status, SelectLocationsStatus::UnsupportedLocation);
    assert_eq!(response.status_text.as_str(), "");
    assert_eq!(storage.selected_locations_count(), 0);
}

#[test]
fn test_select_duplicated_locations_while_locked() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    notify.take();
    device.selection_locked.set(true);

    let response = select_locations(&handler, Some(&[10, 10]));
    assert_eq!(response.status, SelectLocationsStatus::InvalidInMode);
    assert_eq!(response.status_text.as_str(), SELECTION_LOCKED_TEXT);
    assert!(notify.is_empty());
}

#[test]
fn test_select_locations_storage_failure() {
    init_env_logger();

    let storage = TestStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(10));
    notify.take();

    storage.selected_adds_before_failure.set(Some(1));

    let response = select_locations(&handler, Some(&[20, 11]));
    assert_eq!(response.status, SelectLocationsStatus::InvalidInMode);
    assert_eq!(
        response.status_text.as_str(),
        "Unable to store the selected locations"
    );

    assert_eq!(
        read_list::<u32>(&handler, SELECTED).unwrap(),
        Some(vec![10])
    );
    assert!(notify.is_empty());
}

#[test]
fn test_select_invalid_sizes() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    let response = select_locations(&handler, Some(&[]));
    assert_eq!(response.status, SelectLocationsStatus::InvalidSet);
    assert!(!response.status_text.is_empty());

    for location_id in 0..MAX_SELECTED_LOCATIONS as u32 {
        assert!(add_location(
            &handler,
            location_id,
            None,
            &format!("Room {location_id}")
        ));
    }

    // Rejected on its size alone
    let too_many = (0..=MAX_SELECTED_LOCATIONS as u32).collect::<Vec<_>>();
    let response = select_locations(&handler, Some(too_many.as_slice()));
    assert_eq!(response.status, SelectLocationsStatus::InvalidSet);
    assert!(!response.status_text.is_empty());

    let max = &too_many[..MAX_SELECTED_LOCATIONS];
    let response = select_locations(&handler, Some(max));
    assert_eq!(response.status, SelectLocationsStatus::Success);
    assert_eq!(storage.selected_locations_count(), MAX_SELECTED_LOCATIONS);
}

#[test]
fn test_select_null_clears_selection() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(11));
    notify.take();

    let response = select_locations(&handler, None);
    assert_eq!(response.status, SelectLocationsStatus::Success);
    assert_eq!(read_list::<u32>(&handler, SELECTED).unwrap(), None);
    assert_eq!(notify.take(), vec![SELECTED]);

    // Nothing left to clear
    let response = select_locations(&handler, None);
    assert_eq!(response.status, SelectLocationsStatus::Success);
    assert!(notify.is_empty());
}

#[test]
fn test_select_malformed_request() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    assert!(add_location(&handler, 10, None, "Kitchen"));

    let not_a_list = TLVElement::Struct(vec![(TLVTag::Context(0), TLVElement::Unsigned(10))]);
    let response = select_locations_raw(&handler, &not_a_list);
    assert_eq!(response.status, SelectLocationsStatus::InvalidSet);
    assert!(!response.status_text.is_empty());

    let missing_list = TLVElement::Struct(vec![]);
    let response = select_locations_raw(&handler, &missing_list);
    assert_eq!(response.status, SelectLocationsStatus::InvalidSet);
}

#[test]
fn test_select_refused_by_device() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    notify.take();

    device.selection_locked.set(true);
    let response = select_locations(&handler, Some(&[10]));
    assert_eq!(response.status, SelectLocationsStatus::InvalidInMode);
    assert_eq!(response.status_text.as_str(), SELECTION_LOCKED_TEXT);
    device.selection_locked.set(false);

    device.unreachable.set(Some(20));
    let response = select_locations(&handler, Some(&[10, 20]));
    assert_eq!(response.status, SelectLocationsStatus::InvalidSet);
    assert_eq!(response.status_text.as_str(), UNREACHABLE_TEXT);

    // An explanation is always provided for an invalid set
    device.silent_rejection.set(true);
    let response = select_locations(&handler, Some(&[10, 20]));
    assert_eq!(response.status, SelectLocationsStatus::InvalidSet);
    assert!(!response.status_text.is_empty());

    // ... and never for duplicates
    device.reject_as_duplicates.set(true);
    let response = select_locations(&handler, Some(&[10]));
    assert_eq!(response.status, SelectLocationsStatus::DuplicatedLocations);
    assert_eq!(response.status_text.as_str(), "");

    assert_eq!(storage.selected_locations_count(), 0);
    assert!(notify.is_empty());
}

#[test]
fn test_skip_current_location() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);

    let response = skip_current_location(&handler);
    assert_eq!(response.status, SkipCurrentLocationStatus::InvalidLocationList);
    assert_eq!(response.status_text.as_str(), "");

    assert_eq!(
        select_locations(&handler, Some(&[10, 11])).status,
        SelectLocationsStatus::Success
    );

    let response = skip_current_location(&handler);
    assert_eq!(response.status, SkipCurrentLocationStatus::InvalidInMode);
    assert_eq!(
        response.status_text.as_str(),
        "Current Location attribute is null"
    );

    assert!(handler.set_current_location(Nullable::some(10)));

    let response = skip_current_location(&handler);
    assert_eq!(response.status, SkipCurrentLocationStatus::InvalidInMode);
    assert_eq!(response.status_text.as_str(), "Not skipping");
    assert_eq!(device.skips.get(), 0);

    device.skip_allowed.set(true);

    let response = skip_current_location(&handler);
    assert_eq!(response.status, SkipCurrentLocationStatus::Success);
    assert_eq!(device.skips.get(), 1);
}

#[test]
fn test_skip_not_supported_by_default() {
    init_env_logger();

    let storage = MemStorage::new();
    let notify = RecordingNotify::new();
    let handler = service_area::ServiceAreaHandler::new(
        rs_matter_service_area::dm::Dataver::new(0),
        service_area::ServiceAreaConfig::new(ENDPOINT, Feature::empty()),
        &storage,
        &(),
        &notify,
    );
    handler.init().unwrap();

    assert!(add_location(&handler, 10, None, "Kitchen"));
    assert!(handler.add_selected_location(10));
    assert!(handler.set_current_location(Nullable::some(10)));

    let response = skip_current_location(&handler);
    assert_eq!(response.status, SkipCurrentLocationStatus::InvalidInMode);
    assert_eq!(
        response.status_text.as_str(),
        "Skip Current Location command not supported by device"
    );
}

#[test]
fn test_unknown_command() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    for cmd_id in [0x01, 0x03, 0x42] {
        assert_eq!(
            invoke(&handler, cmd_id, &TLVElement::Struct(vec![])).map_err(|e| e.code()),
            Err(ErrorCode::CommandNotFound)
        );
    }
}
