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

use crate::error::Error;
use crate::tlv::{TLVTag, TLVWrite, ToTLV};

use super::{ClusterId, CmdId, EndptId};

#[allow(unused_macros)]
#[macro_export]
macro_rules! command_enum {
    ($en:ty) => {
        impl core::convert::TryFrom<$crate::dm::CmdId> for $en {
            type Error = $crate::error::Error;

            fn try_from(id: $crate::dm::CmdId) -> Result<Self, Self::Error> {
                <$en>::from_repr(id).ok_or_else(|| $crate::error::ErrorCode::CommandNotFound.into())
            }
        }
    };
}

/// The concrete (non-wildcard) path of a command.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct CmdPath {
    pub endpoint: EndptId,
    pub cluster: ClusterId,
    pub cmd: CmdId,
}

#[repr(u8)]
enum CmdPathTag {
    Endpoint = 0,
    Cluster = 1,
    Command = 2,
}

impl CmdPath {
    pub const fn new(endpoint: EndptId, cluster: ClusterId, cmd: CmdId) -> Self {
        Self {
            endpoint,
            cluster,
            cmd,
        }
    }
}

impl ToTLV for CmdPath {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        tw.u16(&TLVTag::Context(CmdPathTag::Endpoint as _), self.endpoint)?;
        tw.u32(&TLVTag::Context(CmdPathTag::Cluster as _), self.cluster)?;
        tw.u32(&TLVTag::Context(CmdPathTag::Command as _), self.cmd)?;
        tw.end_container()
    }
}

impl fmt::Display for CmdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:#06x}/{:#04x}", self.endpoint, self.cluster, self.cmd)
    }
}

/// The command an Invoke operation is addressed to.
#[derive(Debug, Clone)]
pub struct CmdDetails {
    pub endpoint_id: EndptId,
    pub cluster_id: ClusterId,
    pub cmd_id: CmdId,
}

impl CmdDetails {
    pub const fn new(endpoint_id: EndptId, cluster_id: ClusterId, cmd_id: CmdId) -> Self {
        Self {
            endpoint_id,
            cluster_id,
            cmd_id,
        }
    }

    pub const fn path(&self) -> CmdPath {
        CmdPath::new(self.endpoint_id, self.cluster_id, self.cmd_id)
    }
}
