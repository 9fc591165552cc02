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
    AttributeId, Feature, LandmarkTag, LocationStruct, MapStruct, MemStorage, OperationalStatus,
    PositionTag, ServiceAreaConfig, ServiceAreaHandler, StorageDelegate, MAX_LOCATION_NAME_LEN,
    MAX_SUPPORTED_LOCATIONS,
};
use rs_matter_service_area::dm::{AttrId, Dataver};
use rs_matter_service_area::error::ErrorCode;
use rs_matter_service_area::tlv::Nullable;

use crate::common::device::TestDevice;
use crate::common::fixture::{add_location, add_two_floors, handler, modify_location, ENDPOINT};
use crate::common::init_env_logger;
use crate::common::notify::RecordingNotify;
use crate::common::storage::TestStorage;

const SUPPORTED: AttrId = AttributeId::SupportedLocations as AttrId;
const SELECTED: AttrId = AttributeId::SelectedLocations as AttrId;
const CURRENT: AttrId = AttributeId::CurrentLocation as AttrId;
const END_TIME: AttrId = AttributeId::EstimatedEndTime as AttrId;
const PROGRESS: AttrId = AttributeId::Progress as AttrId;

fn location_ids(storage: &MemStorage) -> Vec<u32> {
    (0..storage.supported_locations_count())
        .filter_map(|index| storage.supported_location(index))
        .map(|location| location.location_id)
        .collect()
}

fn selected_ids(storage: &MemStorage) -> Vec<u32> {
    (0..storage.selected_locations_count())
        .filter_map(|index| storage.selected_location(index))
        .collect()
}

#[test]
fn test_add_location() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    assert!(add_location(&handler, 10, None, "Kitchen"));
    assert_eq!(notify.take(), vec![SUPPORTED]);

    // Neither descriptor nor landmark
    assert!(!add_location(&handler, 11, None, ""));
    // Position without landmark
    assert!(!handler.add_supported_location(
        12,
        Nullable::none(),
        "Hall",
        Nullable::none(),
        Nullable::none(),
        Nullable::none(),
        Nullable::some(PositionTag::Under),
        Nullable::none(),
    ));
    // Map without supported maps
    assert!(!add_location(&handler, 13, Some(1), "Bathroom"));
    // Name too long
    assert!(!add_location(
        &handler,
        14,
        None,
        &"x".repeat(MAX_LOCATION_NAME_LEN + 1)
    ));
    // Duplicate ID
    assert!(!add_location(&handler, 10, None, "Pantry"));
    // Duplicate content
    assert!(!add_location(&handler, 15, None, "Kitchen"));

    assert_eq!(location_ids(&storage), vec![10]);
    assert!(notify.is_empty());

    assert!(add_location(
        &handler,
        16,
        None,
        &"x".repeat(MAX_LOCATION_NAME_LEN)
    ));
}

#[test]
fn test_add_location_with_landmark() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    let add_near_sofa = |location_id, position_tag| {
        handler.add_supported_location(
            location_id,
            Nullable::none(),
            "",
            Nullable::none(),
            Nullable::none(),
            Nullable::some(LandmarkTag::Sofa),
            position_tag,
            Nullable::none(),
        )
    };

    assert!(add_near_sofa(1, Nullable::none()));
    assert!(add_near_sofa(2, Nullable::some(PositionTag::Left)));
    assert!(!add_near_sofa(3, Nullable::some(PositionTag::Left)));
}

#[test]
fn test_location_capacity() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    for location_id in 0..MAX_SUPPORTED_LOCATIONS as u32 {
        assert!(add_location(
            &handler,
            location_id,
            None,
            &format!("Room {location_id}")
        ));
    }

    assert!(!add_location(&handler, 1000, None, "One too many"));
    assert_eq!(storage.supported_locations_count(), MAX_SUPPORTED_LOCATIONS);
}

#[test]
fn test_locations_change_permission() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::MAPS, &storage, &device, &notify);

    add_two_floors(&handler);
    notify.take();

    device.locations_locked.set(true);

    assert!(!add_location(&handler, 12, Some(1), "Hall"));
    assert!(!handler.remove_supported_location(10));
    assert!(!handler.clear_supported_locations());
    // Moving to another map needs the permission too
    assert!(!modify_location(&handler, 10, Some(2), "Kitchen"));
    // Renaming does not
    assert!(modify_location(&handler, 10, Some(1), "Cuisine"));

    assert_eq!(location_ids(&storage), vec![10, 11, 20]);
    assert_eq!(notify.take(), vec![SUPPORTED]);
}

#[test]
fn test_modify_location() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(10));
    notify.take();

    // Unknown
    assert!(!modify_location(&handler, 99, Some(1), "Kitchen"));
    // Clashes with the living room
    assert!(!modify_location(&handler, 10, Some(1), "Living room"));
    // Unchanged
    assert!(modify_location(&handler, 10, Some(1), "Kitchen"));
    assert!(notify.is_empty());

    assert!(modify_location(&handler, 10, Some(1), "Cuisine"));
    assert_eq!(notify.take(), vec![SUPPORTED]);
    assert_eq!(
        storage.supported_location_by_id(10).unwrap().1.name(),
        Some("Cuisine")
    );
    // Still selected, as it did not move
    assert_eq!(selected_ids(&storage), vec![10]);
    assert_eq!(device.locations_updates.get(), 0);
}

#[test]
fn test_modify_location_map_cascades() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(10));
    assert!(handler.add_selected_location(11));
    assert!(handler.add_pending_progress_element(10));
    assert!(handler.set_current_location(Nullable::some(10)));
    assert!(handler.set_estimated_end_time(Nullable::some(500)));
    notify.take();

    assert!(modify_location(&handler, 10, Some(2), "Kitchen"));

    // Still supported, but no longer referenced
    assert_eq!(location_ids(&storage), vec![10, 11, 20]);
    assert_eq!(selected_ids(&storage), vec![11]);
    assert_eq!(storage.progress_count(), 0);
    assert!(handler.current_location().is_none());
    assert!(handler.estimated_end_time().is_none());

    let changes = notify.take();
    for attr in [SUPPORTED, SELECTED, PROGRESS, CURRENT] {
        assert_eq!(
            changes.iter().filter(|changed| **changed == attr).count(),
            1,
            "{attr:#x}"
        );
    }
    // Going to null is not reported
    assert!(!changes.contains(&END_TIME));
    assert_eq!(device.locations_updates.get(), 1);
}

#[test]
fn test_remove_location_cascades() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(11));
    assert!(handler.add_selected_location(20));
    assert!(handler.add_pending_progress_element(11));
    assert!(handler.add_pending_progress_element(20));
    assert!(handler.set_current_location(Nullable::some(20)));
    notify.take();

    assert!(!handler.remove_supported_location(99));

    assert!(handler.remove_supported_location(11));
    assert_eq!(location_ids(&storage), vec![10, 20]);
    assert_eq!(selected_ids(&storage), vec![20]);
    assert_eq!(storage.progress_element(0).unwrap().location_id, 20);
    assert_eq!(handler.current_location(), Nullable::some(20));
    assert_eq!(notify.take(), vec![SUPPORTED, SELECTED, PROGRESS]);
    assert_eq!(device.locations_updates.get(), 1);
}

#[test]
fn test_clear_locations_cascades() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(11));
    assert!(handler.add_pending_progress_element(11));
    assert!(handler.set_current_location(Nullable::some(11)));
    notify.take();

    assert!(handler.clear_supported_locations());

    assert_eq!(storage.supported_locations_count(), 0);
    assert_eq!(storage.selected_locations_count(), 0);
    assert_eq!(storage.progress_count(), 0);
    assert!(handler.current_location().is_none());
    // Maps are left alone
    assert_eq!(storage.supported_maps_count(), 2);
    assert_eq!(
        notify.take(),
        vec![SUPPORTED, SELECTED, PROGRESS, CURRENT]
    );

    // Nothing to clear
    assert!(handler.clear_supported_locations());
    assert!(notify.is_empty());
}

#[test]
fn test_current_location() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    assert!(add_location(&handler, 10, None, "Kitchen"));
    notify.take();

    assert!(!handler.set_current_location(Nullable::some(11)));
    assert!(handler.set_current_location(Nullable::none()));
    assert!(notify.is_empty());

    assert!(handler.set_current_location(Nullable::some(10)));
    assert_eq!(notify.take(), vec![CURRENT]);

    // Unchanged
    assert!(handler.set_current_location(Nullable::some(10)));
    assert!(notify.is_empty());

    assert!(handler.set_estimated_end_time(Nullable::some(100)));
    notify.take();

    assert!(handler.set_current_location(Nullable::none()));
    assert!(handler.estimated_end_time().is_none());
    assert_eq!(notify.take(), vec![CURRENT]);
}

#[test]
fn test_add_selected_location_rejected() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert!(handler.add_selected_location(10));
    notify.take();

    // Unsupported
    assert!(!handler.add_selected_location(99));
    // Already selected
    assert!(!handler.add_selected_location(10));

    device.selection_locked.set(true);
    assert!(!handler.add_selected_location(11));

    assert_eq!(selected_ids(&storage), vec![10]);
    assert!(notify.is_empty());
}

#[test]
fn test_current_location_kept_by_device() {
    init_env_logger();

    let storage = TestStorage::with_device_state();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    assert!(add_location(&handler, 10, None, "Kitchen"));
    assert!(add_location(&handler, 11, None, "Living room"));
    notify.take();

    assert!(handler.set_current_location(Nullable::some(10)));
    assert!(handler.set_estimated_end_time(Nullable::some(100)));
    assert_eq!(storage.current_location.get(), Some(Nullable::some(10)));
    assert_eq!(storage.estimated_end_time.get(), Some(Nullable::some(100)));
    assert_eq!(notify.take(), vec![CURRENT, END_TIME]);

    // Changed by the device behind the handler
    storage.current_location.set(Some(Nullable::some(11)));
    assert_eq!(handler.current_location(), Nullable::some(11));

    assert!(handler.set_current_location(Nullable::some(11)));
    assert!(notify.is_empty());

    assert!(handler.set_current_location(Nullable::none()));
    assert_eq!(storage.current_location.get(), Some(Nullable::none()));
    assert_eq!(storage.estimated_end_time.get(), Some(Nullable::none()));
    assert!(handler.estimated_end_time().is_none());
    assert_eq!(notify.take(), vec![CURRENT]);
}

#[test]
fn test_estimated_end_time_reporting() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::empty(), &storage, &device, &notify);

    assert!(add_location(&handler, 10, None, "Kitchen"));

    // No end time without a current location
    assert!(!handler.set_estimated_end_time(Nullable::some(5)));
    assert!(handler.set_estimated_end_time(Nullable::none()));

    assert!(handler.set_current_location(Nullable::some(10)));
    notify.take();

    let set = |estimated_end_time: Option<u32>| {
        let estimated_end_time = Nullable::from(estimated_end_time);

        assert!(handler.set_estimated_end_time(estimated_end_time));
        assert_eq!(handler.estimated_end_time(), estimated_end_time);
        notify.take().contains(&END_TIME)
    };

    // Null to zero
    assert!(!set(Some(0)));
    // Zero to non-zero
    assert!(set(Some(5)));
    // Decrease
    assert!(set(Some(3)));
    // Increase
    assert!(!set(Some(7)));
    // Non-zero to zero
    assert!(set(Some(0)));
    // To null
    assert!(!set(None));
    // Null to non-zero
    assert!(set(Some(7)));
}

#[test]
fn test_next_selected_location_in_order() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(Feature::all(), &storage, &device, &notify);

    add_two_floors(&handler);
    assert_eq!(handler.next_selected_location(), None);

    for location_id in [20, 10, 11] {
        assert!(handler.add_selected_location(location_id));
    }

    assert_eq!(handler.next_selected_location(), Some(20));

    assert!(handler.set_current_location(Nullable::some(20)));
    assert_eq!(handler.next_selected_location(), Some(10));

    assert!(handler.set_current_location(Nullable::some(11)));
    assert_eq!(handler.next_selected_location(), None);
}

#[test]
fn test_next_selected_location_any_order() {
    init_env_logger();

    let storage = MemStorage::new();
    let device = TestDevice::new();
    let notify = RecordingNotify::new();
    let handler = handler(
        Feature::MAPS | Feature::PROGRESS_REPORTING,
        &storage,
        &device,
        &notify,
    );

    add_two_floors(&handler);

    for location_id in [20, 10, 11] {
        assert!(handler.add_selected_location(location_id));
        assert!(handler.add_pending_progress_element(location_id));
    }

    assert!(handler.set_current_location(Nullable::some(20)));
    assert_eq!(handler.next_selected_location(), Some(10));

    assert!(handler.set_progress_status(10, OperationalStatus::Completed));
    assert_eq!(handler.next_selected_location(), Some(11));

    assert!(handler.set_progress_status(11, OperationalStatus::Skipped));
    assert_eq!(handler.next_selected_location(), None);
}

#[test]
fn test_init_rejects_inconsistent_storage() {
    init_env_logger();

    let device = TestDevice::new();
    let notify = RecordingNotify::new();

    let init = |storage: &MemStorage, features| {
        ServiceAreaHandler::new(
            Dataver::new(0),
            ServiceAreaConfig::new(ENDPOINT, features),
            storage,
            &device,
            &notify,
        )
        .init()
        .map_err(|e| e.code())
    };

    let location = |location_id, map_id: Option<u8>, name| {
        LocationStruct::new(
            location_id,
            map_id.into(),
            name,
            Nullable::none(),
            Nullable::none(),
            Nullable::none(),
            Nullable::none(),
            Nullable::none(),
        )
        .unwrap()
    };

    // Maps without the feature
    let storage = MemStorage::new();
    storage.add_supported_map(MapStruct::new(1, "Ground").unwrap());
    assert_eq!(init(&storage, Feature::empty()), Err(ErrorCode::InvalidState));
    assert_eq!(init(&storage, Feature::MAPS), Ok(()));

    // Location without a map while there are maps
    storage.add_supported_location(location(10, None, "Kitchen"));
    assert_eq!(init(&storage, Feature::MAPS), Err(ErrorCode::InvalidState));

    // Duplicate location IDs
    let storage = MemStorage::new();
    storage.add_supported_location(location(10, None, "Kitchen"));
    storage.add_supported_location(location(10, None, "Hall"));
    assert_eq!(init(&storage, Feature::empty()), Err(ErrorCode::InvalidState));

    // Selection of an unsupported location
    let storage = MemStorage::new();
    storage.add_supported_location(location(10, None, "Kitchen"));
    storage.add_selected_location(11);
    assert_eq!(init(&storage, Feature::empty()), Err(ErrorCode::InvalidState));

    let storage = MemStorage::new();
    storage.add_supported_location(location(10, None, "Kitchen"));
    storage.add_selected_location(10);
    assert_eq!(init(&storage, Feature::empty()), Ok(()));
}
