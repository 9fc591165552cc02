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
    Delegate, Feature, MemStorage, ServiceAreaConfig, ServiceAreaHandler, StorageDelegate,
};
use rs_matter_service_area::dm::{Dataver, EndptId};
use rs_matter_service_area::tlv::Nullable;

use super::device::TestDevice;
use super::notify::RecordingNotify;

pub const ENDPOINT: EndptId = 1;

pub type TestHandler<'a, S = MemStorage> = ServiceAreaHandler<'a, S, TestDevice>;

pub fn handler<'a, S: StorageDelegate>(
    features: Feature,
    storage: &'a S,
    device: &'a TestDevice,
    notify: &'a RecordingNotify,
) -> TestHandler<'a, S> {
    let handler = ServiceAreaHandler::new(
        Dataver::new(0),
        ServiceAreaConfig::new(ENDPOINT, features),
        storage,
        device,
        notify,
    );
    handler.init().unwrap();

    handler
}

/// Add a location described only by its name.
pub fn add_location<S: StorageDelegate, D: Delegate>(
    handler: &ServiceAreaHandler<'_, S, D>,
    location_id: u32,
    map_id: Option<u8>,
    name: &str,
) -> bool {
    handler.add_supported_location(
        location_id,
        map_id.into(),
        name,
        Nullable::none(),
        Nullable::none(),
        Nullable::none(),
        Nullable::none(),
        Nullable::none(),
    )
}

/// Replace a location with one described only by its name.
pub fn modify_location<S: StorageDelegate, D: Delegate>(
    handler: &ServiceAreaHandler<'_, S, D>,
    location_id: u32,
    map_id: Option<u8>,
    name: &str,
) -> bool {
    handler.modify_supported_location(
        location_id,
        map_id.into(),
        name,
        Nullable::none(),
        Nullable::none(),
        Nullable::none(),
        Nullable::none(),
        Nullable::none(),
    )
}

/// Ground floor map 1 with kitchen 10 and living room 11, first floor map 2 with
/// bedroom 20.
pub fn add_two_floors<S: StorageDelegate, D: Delegate>(handler: &ServiceAreaHandler<'_, S, D>) {
    assert!(handler.add_supported_map(1, "Ground"));
    assert!(handler.add_supported_map(2, "First"));
    assert!(add_location(handler, 10, Some(1), "Kitchen"));
    assert!(add_location(handler, 11, Some(1), "Living room"));
    assert!(add_location(handler, 20, Some(2), "Bedroom"));
}
