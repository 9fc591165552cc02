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

//! A simulated robotic vacuum cleaner going through the locations selected with the
//! Service Area cluster.
//!
//! The commands are sent through the data-model `Node`, as the Interaction Model layer
//! would, and every attribute change is logged.

use core::cell::Cell;

use std::time::{SystemTime, UNIX_EPOCH};

use log::info;

use rs_matter_service_area::dm::clusters::service_area::{
    self, set_status_text, AreaType, CommandId, Delegate, Feature, LandmarkTag, MemStorage,
    OperationalStatus, RespCommandId, SelectLocationsRequest, SelectLocationsResponse,
    ServiceAreaConfig, ServiceAreaHandler, SkipCurrentLocationResponse, StatusText,
    StorageDelegate,
};
use rs_matter_service_area::dm::{
    AttrId, ChangeNotify, ClusterId, CmdDetails, CmdId, Dataver, EndptId, Node,
};
use rs_matter_service_area::error::{Error, ErrorCode};
use rs_matter_service_area::tlv::{FromTLV, Nullable, TLVElement, TLVElementWriter, TLVTag, ToTLV};

const ENDPOINT: EndptId = 1;

/// Seconds the robot needs for each location
const CLEANING_TIME: u32 = 600;

/// Logs the attribute changes instead of reporting them to subscribers.
struct LogNotify;

impl ChangeNotify for LogNotify {
    fn notify(&self, endpt: EndptId, clust: ClusterId, attr: AttrId) {
        info!(
            "Report: endpoint {} cluster {:#06x} attribute {:#06x}",
            endpt, clust, attr
        );
    }
}

/// The cleaning logic of the robot, as far as the Service Area cluster is concerned.
#[derive(Default)]
struct Robot {
    running: Cell<bool>,
    skip_requested: Cell<bool>,
}

impl Delegate for Robot {
    fn is_set_selected_locations_allowed(&self, status_text: &mut StatusText) -> bool {
        if self.running.get() {
            set_status_text(status_text, "Cannot change the locations while cleaning");
            return false;
        }

        true
    }

    fn handle_skip_current_location(&self, status_text: &mut StatusText) -> bool {
        if !self.running.get() {
            set_status_text(status_text, "Not cleaning");
            return false;
        }

        self.skip_requested.set(true);

        true
    }

    fn is_supported_locations_change_allowed(&self) -> bool {
        !self.running.get()
    }

    fn is_supported_map_change_allowed(&self) -> bool {
        !self.running.get()
    }

    fn handle_supported_locations_updated(&self) {
        info!("Robot: supported locations updated");
    }
}

type RobotHandler<'a> = ServiceAreaHandler<'a, MemStorage, Robot>;

fn main() -> Result<(), Error> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let storage = MemStorage::new();
    let robot = Robot::default();

    let handler = ServiceAreaHandler::new(
        Dataver::new(0),
        ServiceAreaConfig::new(
            ENDPOINT,
            Feature::SELECT_WHILE_RUNNING | Feature::PROGRESS_REPORTING | Feature::MAPS,
        ),
        &storage,
        &robot,
        &LogNotify,
    );
    handler.init()?;

    setup_floor_plan(&handler)?;

    let mut node: Node<'_> = Node::new();
    node.add(ENDPOINT, service_area::ID, &handler)?;

    // Unknown locations are rejected
    let response = select_locations(&node, &[1, 99])?;
    info!("SelectLocations(1, 99): {:?}", response.status);

    let response = select_locations(&node, &[3, 1, 2])?;
    info!("SelectLocations(3, 1, 2): {:?}", response.status);

    clean(&node, &handler)?;

    let response = skip_current_location(&node)?;
    info!(
        "SkipCurrentLocation once done: {:?} \"{}\"",
        response.status, response.status_text
    );

    Ok(())
}

fn setup_floor_plan(handler: &RobotHandler<'_>) -> Result<(), Error> {
    let added = handler.add_supported_map(1, "Ground floor")
        && handler.add_supported_map(2, "Upstairs")
        && handler.add_supported_location(
            1,
            Nullable::some(1),
            "Kitchen",
            Nullable::some(0),
            Nullable::some(AreaType::Kitchen),
            Nullable::none(),
            Nullable::none(),
            Nullable::none(),
        )
        && handler.add_supported_location(
            2,
            Nullable::some(1),
            "",
            Nullable::some(0),
            Nullable::some(AreaType::LivingRoom),
            Nullable::some(LandmarkTag::Couch),
            Nullable::none(),
            Nullable::none(),
        )
        && handler.add_supported_location(
            3,
            Nullable::some(2),
            "Master bedroom",
            Nullable::some(1),
            Nullable::some(AreaType::Bedroom),
            Nullable::none(),
            Nullable::none(),
            Nullable::none(),
        );

    if !added {
        Err(ErrorCode::InvalidState)?;
    }

    Ok(())
}

/// Go through the selected locations, skipping the second one.
fn clean(node: &Node<'_>, handler: &RobotHandler<'_>) -> Result<(), Error> {
    let robot = handler.delegate();

    for index in 0..handler.storage().selected_locations_count() {
        if let Some(location_id) = handler.storage().selected_location(index) {
            handler.add_pending_progress_element(location_id);
        }
    }

    robot.running.set(true);

    // The selection cannot change while cleaning
    let response = select_locations(node, &[1])?;
    info!(
        "SelectLocations(1) while cleaning: {:?} \"{}\"",
        response.status, response.status_text
    );

    let mut visited = 0;

    while let Some(location_id) = handler.next_selected_location() {
        info!("Robot: cleaning location {}", location_id);

        handler.set_current_location(Nullable::some(location_id));
        handler.set_estimated_end_time(Nullable::some(now() + CLEANING_TIME));
        handler.set_progress_status(location_id, OperationalStatus::Operating);
        handler.set_progress_estimated_time(location_id, Nullable::some(CLEANING_TIME));

        visited += 1;
        if visited == 2 {
            let response = skip_current_location(node)?;
            info!("SkipCurrentLocation: {:?}", response.status);
        }

        if robot.skip_requested.replace(false) {
            info!("Robot: skipping location {}", location_id);
            handler.set_progress_status(location_id, OperationalStatus::Skipped);
            handler.set_progress_total_operational_time(location_id, Nullable::some(0));
        } else {
            handler.set_progress_status(location_id, OperationalStatus::Completed);
            handler.set_progress_total_operational_time(
                location_id,
                Nullable::some(CLEANING_TIME),
            );
        }
    }

    handler.set_current_location(Nullable::none());
    robot.running.set(false);

    info!("Robot: done");

    Ok(())
}

fn select_locations(node: &Node<'_>, locations: &[u32]) -> Result<SelectLocationsResponse, Error> {
    let request = SelectLocationsRequest {
        new_locations: Nullable::some(locations.to_vec()),
    };

    let mut tw = TLVElementWriter::new();
    request.to_tlv(&TLVTag::Anonymous, &mut tw)?;

    let data = invoke(
        node,
        CommandId::SelectLocations as _,
        RespCommandId::SelectLocationsResponse as _,
        &tw.into_element()?,
    )?;

    SelectLocationsResponse::from_tlv(&data)
}

fn skip_current_location(node: &Node<'_>) -> Result<SkipCurrentLocationResponse, Error> {
    let data = invoke(
        node,
        CommandId::SkipCurrentLocation as _,
        RespCommandId::SkipCurrentLocationResponse as _,
        &TLVElement::Struct(vec![]),
    )?;

    SkipCurrentLocationResponse::from_tlv(&data)
}

fn invoke(
    node: &Node<'_>,
    cmd_id: CmdId,
    resp_cmd_id: CmdId,
    data: &TLVElement,
) -> Result<TLVElement, Error> {
    let cmd = CmdDetails::new(ENDPOINT, service_area::ID, cmd_id);

    let mut tw = TLVElementWriter::new();
    node.invoke(&cmd, data, &mut tw)?;

    let response = tw.into_element()?;
    if response.ctx(0)?.ctx(2)?.u32()? != resp_cmd_id {
        Err(ErrorCode::InvalidCommand)?;
    }

    Ok(response.ctx(1)?.clone())
}

fn now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as u32)
        .unwrap_or(0)
}
