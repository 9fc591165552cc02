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

use strum::FromRepr;

use crate::error::Error;
use crate::tlv::{TLVTag, TLVWrite, ToTLV};

use super::{AttrId, ClusterId, EndptId};

/// The global attributes every cluster instance in this crate serves.
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromRepr)]
#[repr(u32)]
pub enum GlobalElements {
    FeatureMap = 0xFFFC,
    ClusterRevision = 0xFFFD,
}

impl GlobalElements {
    pub fn is_global(attr_id: AttrId) -> bool {
        Self::from_repr(attr_id).is_some()
    }
}

#[allow(unused_macros)]
#[macro_export]
macro_rules! attribute_enum {
    ($en:ty) => {
        impl core::convert::TryFrom<$crate::dm::AttrId> for $en {
            type Error = $crate::error::Error;

            fn try_from(id: $crate::dm::AttrId) -> Result<Self, Self::Error> {
                <$en>::from_repr(id)
                    .ok_or_else(|| $crate::error::ErrorCode::AttributeNotFound.into())
            }
        }
    };
}

/// The concrete (non-wildcard) path of an attribute.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct AttrPath {
    pub endpoint: EndptId,
    pub cluster: ClusterId,
    pub attr: AttrId,
}

#[repr(u8)]
enum AttrPathTag {
    Endpoint = 2,
    Cluster = 3,
    Attribute = 4,
}

impl ToTLV for AttrPath {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_struct(tag)?;
        tw.u16(&TLVTag::Context(AttrPathTag::Endpoint as _), self.endpoint)?;
        tw.u32(&TLVTag::Context(AttrPathTag::Cluster as _), self.cluster)?;
        tw.u32(&TLVTag::Context(AttrPathTag::Attribute as _), self.attr)?;
        tw.end_container()
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{:#06x}/{:#06x}",
            self.endpoint, self.cluster, self.attr
        )
    }
}

/// The attribute a Read or Write operation is addressed to.
#[derive(Debug, Clone)]
pub struct AttrDetails {
    /// The actual endpoint ID
    pub endpoint_id: EndptId,
    /// The actual cluster ID
    pub cluster_id: ClusterId,
    /// The actual attribute ID
    pub attr_id: AttrId,
    /// The data version the client already has, if any
    pub dataver: Option<u32>,
}

impl AttrDetails {
    pub const fn new(endpoint_id: EndptId, cluster_id: ClusterId, attr_id: AttrId) -> Self {
        Self {
            endpoint_id,
            cluster_id,
            attr_id,
            dataver: None,
        }
    }

    pub const fn with_dataver(mut self, dataver: u32) -> Self {
        self.dataver = Some(dataver);
        self
    }

    pub fn is_system(&self) -> bool {
        GlobalElements::is_global(self.attr_id)
    }

    pub const fn path(&self) -> AttrPath {
        AttrPath {
            endpoint: self.endpoint_id,
            cluster: self.cluster_id,
            attr: self.attr_id,
        }
    }
}
