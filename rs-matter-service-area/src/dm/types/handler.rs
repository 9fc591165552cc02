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

use crate::error::{Error, ErrorCode};
use crate::tlv::TLVElement;

use super::{AttrDataEncoder, AttrDetails, AttrId, ClusterId, CmdDataEncoder, CmdDetails, EndptId};

/// The sink through which a cluster reports that one of its attributes changed,
/// so that the surrounding reporting engine can schedule subscription reports.
pub trait ChangeNotify {
    fn notify(&self, endpt: EndptId, clust: ClusterId, attr: AttrId);
}

impl<T> ChangeNotify for &T
where
    T: ChangeNotify,
{
    fn notify(&self, endpt: EndptId, clust: ClusterId, attr: AttrId) {
        (**self).notify(endpt, clust, attr)
    }
}

impl ChangeNotify for () {
    fn notify(&self, _endpt: EndptId, _clust: ClusterId, _attr: AttrId) {
        // No-op
    }
}

/// A context object that is passed to the handler when processing an attribute Read operation.
pub struct ReadContext<'a> {
    attr: &'a AttrDetails,
}

impl<'a> ReadContext<'a> {
    #[inline(always)]
    pub const fn new(attr: &'a AttrDetails) -> Self {
        Self { attr }
    }

    /// Return the attribute object that is associated with this read operation.
    #[inline(always)]
    pub fn attr(&self) -> &AttrDetails {
        self.attr
    }
}

/// A context object that is passed to the handler when processing an attribute Write operation.
pub struct WriteContext<'a> {
    attr: &'a AttrDetails,
    data: &'a TLVElement,
}

impl<'a> WriteContext<'a> {
    #[inline(always)]
    pub const fn new(attr: &'a AttrDetails, data: &'a TLVElement) -> Self {
        Self { attr, data }
    }

    /// Return the attribute object that is associated with this write operation.
    #[inline(always)]
    pub fn attr(&self) -> &AttrDetails {
        self.attr
    }

    /// Return the attribute data that is associated with this write operation.
    #[inline(always)]
    pub fn data(&self) -> &TLVElement {
        self.data
    }
}

/// A context object that is passed to the handler when processing a command Invoke operation.
pub struct InvokeContext<'a> {
    cmd: &'a CmdDetails,
    data: &'a TLVElement,
}

impl<'a> InvokeContext<'a> {
    #[inline(always)]
    pub const fn new(cmd: &'a CmdDetails, data: &'a TLVElement) -> Self {
        Self { cmd, data }
    }

    /// Return the command object that is associated with this invoke operation.
    #[inline(always)]
    pub fn cmd(&self) -> &CmdDetails {
        self.cmd
    }

    /// Return the command data that is associated with this invoke operation.
    #[inline(always)]
    pub fn data(&self) -> &TLVElement {
        self.data
    }
}

/// A cluster server, as seen by the Interaction Model.
///
/// Handlers run synchronously on the context which dispatches the incoming requests.
pub trait Handler {
    fn read(&self, ctx: &ReadContext<'_>, encoder: AttrDataEncoder<'_>) -> Result<(), Error>;

    fn write(&self, _ctx: &WriteContext<'_>) -> Result<(), Error> {
        Err(ErrorCode::UnsupportedWrite.into())
    }

    fn invoke(&self, _ctx: &InvokeContext<'_>, _encoder: CmdDataEncoder<'_>) -> Result<(), Error> {
        Err(ErrorCode::CommandNotFound.into())
    }
}

impl<T> Handler for &T
where
    T: Handler,
{
    fn read(&self, ctx: &ReadContext<'_>, encoder: AttrDataEncoder<'_>) -> Result<(), Error> {
        (**self).read(ctx, encoder)
    }

    fn write(&self, ctx: &WriteContext<'_>) -> Result<(), Error> {
        (**self).write(ctx)
    }

    fn invoke(&self, ctx: &InvokeContext<'_>, encoder: CmdDataEncoder<'_>) -> Result<(), Error> {
        (**self).invoke(ctx, encoder)
    }
}
