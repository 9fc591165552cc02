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

use log::{debug, error};

use crate::error::{Error, ErrorCode};
use crate::tlv::{TLVElement, TLVWrite};

use super::{
    AttrDataEncoder, AttrDetails, ClusterId, CmdDataEncoder, CmdDetails, EndptId, Handler,
    InvokeContext, ReadContext, WriteContext,
};

/// The default maximum number of cluster instances a `Node` can route to.
pub const DEFAULT_MAX_HANDLERS: usize = 16;

/// Routes Interaction Model operations to the cluster instances registered on it.
///
/// The node is a plain value owned by whoever builds the request dispatch, so each
/// test or application assembles its own routing table.
pub struct Node<'a, const N: usize = DEFAULT_MAX_HANDLERS> {
    handlers: heapless::Vec<(EndptId, ClusterId, &'a dyn Handler), N>,
}

impl<'a, const N: usize> Node<'a, N> {
    pub const fn new() -> Self {
        Self {
            handlers: heapless::Vec::new(),
        }
    }

    /// Register `handler` as the server of cluster `cluster_id` on endpoint `endpoint_id`.
    pub fn add(
        &mut self,
        endpoint_id: EndptId,
        cluster_id: ClusterId,
        handler: &'a dyn Handler,
    ) -> Result<(), Error> {
        if self
            .handlers
            .iter()
            .any(|(endpt, clust, _)| *endpt == endpoint_id && *clust == cluster_id)
        {
            error!(
                "Cluster {:#06x} already registered on endpoint {}",
                cluster_id, endpoint_id
            );
            Err(ErrorCode::Duplicate)?;
        }

        self.handlers
            .push((endpoint_id, cluster_id, handler))
            .map_err(|_| ErrorCode::NoSpace)?;

        debug!(
            "Registered cluster {:#06x} on endpoint {}",
            cluster_id, endpoint_id
        );

        Ok(())
    }

    pub fn read(&self, attr: &AttrDetails, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        let handler = self.handler(attr.endpoint_id, attr.cluster_id)?;

        handler.read(&ReadContext::new(attr), AttrDataEncoder::new(attr, tw))
    }

    pub fn write(&self, attr: &AttrDetails, data: &TLVElement) -> Result<(), Error> {
        let handler = self.handler(attr.endpoint_id, attr.cluster_id)?;

        handler.write(&WriteContext::new(attr, data))
    }

    pub fn invoke(
        &self,
        cmd: &CmdDetails,
        data: &TLVElement,
        tw: &mut dyn TLVWrite,
    ) -> Result<(), Error> {
        let handler = self.handler(cmd.endpoint_id, cmd.cluster_id)?;

        handler.invoke(&InvokeContext::new(cmd, data), CmdDataEncoder::new(cmd, tw))
    }

    fn handler(&self, endpoint_id: EndptId, cluster_id: ClusterId) -> Result<&'a dyn Handler, Error> {
        if let Some((_, _, handler)) = self
            .handlers
            .iter()
            .find(|(endpt, clust, _)| *endpt == endpoint_id && *clust == cluster_id)
        {
            Ok(*handler)
        } else if self.handlers.iter().any(|(endpt, _, _)| *endpt == endpoint_id) {
            Err(ErrorCode::ClusterNotFound.into())
        } else {
            Err(ErrorCode::EndpointNotFound.into())
        }
    }
}

impl<const N: usize> Default for Node<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
