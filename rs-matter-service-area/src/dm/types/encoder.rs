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

use crate::error::Error;
use crate::tlv::{TLVTag, TLVWrite, ToTLV};

use super::{AttrDetails, AttrPath, CmdDetails, CmdId, CmdPath};

#[repr(u8)]
enum AttrDataTag {
    DataVer = 0,
    Path = 1,
    Data = 2,
}

#[repr(u8)]
enum CmdDataTag {
    Path = 0,
    Data = 1,
}

/// Encodes the reply to an attribute Read operation.
pub struct AttrDataEncoder<'a> {
    dataver_filter: Option<u32>,
    path: AttrPath,
    tw: &'a mut dyn TLVWrite,
}

impl<'a> AttrDataEncoder<'a> {
    pub fn new(attr: &AttrDetails, tw: &'a mut dyn TLVWrite) -> Self {
        Self {
            dataver_filter: attr.dataver,
            path: attr.path(),
            tw,
        }
    }

    /// Start the attribute data report.
    ///
    /// Returns `None` when the reader already holds data of version `dataver`, in
    /// which case nothing is written.
    pub fn with_dataver(mut self, dataver: u32) -> Result<Option<AttrDataWriter<'a>>, Error> {
        if self
            .dataver_filter
            .map(|dataver_filter| dataver_filter != dataver)
            .unwrap_or(true)
        {
            self.tw.start_struct(&TLVTag::Anonymous)?;
            self.tw
                .u32(&TLVTag::Context(AttrDataTag::DataVer as _), dataver)?;
            self.path
                .to_tlv(&TLVTag::Context(AttrDataTag::Path as _), &mut *self.tw)?;

            Ok(Some(AttrDataWriter { tw: self.tw }))
        } else {
            Ok(None)
        }
    }
}

pub struct AttrDataWriter<'a> {
    tw: &'a mut dyn TLVWrite,
}

impl<'a> AttrDataWriter<'a> {
    pub const TAG: TLVTag = TLVTag::Context(AttrDataTag::Data as _);

    pub fn set<T: ToTLV + ?Sized>(mut self, value: &T) -> Result<(), Error> {
        value.to_tlv(&Self::TAG, &mut *self.tw)?;
        self.complete()
    }

    /// Encode a list attribute with `len` entries, `f` producing the entry at each index.
    ///
    /// A list with no entries is reported as `null` rather than as an empty array.
    pub fn set_nullable_list<F>(mut self, len: usize, mut f: F) -> Result<(), Error>
    where
        F: FnMut(usize, &TLVTag, &mut dyn TLVWrite) -> Result<(), Error>,
    {
        if len == 0 {
            self.tw.null(&Self::TAG)?;
        } else {
            self.tw.start_array(&Self::TAG)?;
            for index in 0..len {
                f(index, &TLVTag::Anonymous, &mut *self.tw)?;
            }
            self.tw.end_container()?;
        }

        self.complete()
    }

    pub fn complete(mut self) -> Result<(), Error> {
        self.tw.end_container()
    }

    pub fn writer(&mut self) -> &mut dyn TLVWrite {
        &mut *self.tw
    }
}

/// Encodes the response of a command Invoke operation.
pub struct CmdDataEncoder<'a> {
    path: CmdPath,
    tw: &'a mut dyn TLVWrite,
}

impl<'a> CmdDataEncoder<'a> {
    pub fn new(cmd: &CmdDetails, tw: &'a mut dyn TLVWrite) -> Self {
        Self {
            path: cmd.path(),
            tw,
        }
    }

    /// Start a response carrying the data of command `cmd` (the response command).
    pub fn with_command(mut self, cmd: CmdId) -> Result<CmdDataWriter<'a>, Error> {
        let path = CmdPath::new(self.path.endpoint, self.path.cluster, cmd);

        self.tw.start_struct(&TLVTag::Anonymous)?;
        path.to_tlv(&TLVTag::Context(CmdDataTag::Path as _), &mut *self.tw)?;

        Ok(CmdDataWriter { tw: self.tw })
    }
}

pub struct CmdDataWriter<'a> {
    tw: &'a mut dyn TLVWrite,
}

impl CmdDataWriter<'_> {
    pub const TAG: TLVTag = TLVTag::Context(CmdDataTag::Data as _);

    pub fn set<T: ToTLV + ?Sized>(mut self, value: &T) -> Result<(), Error> {
        value.to_tlv(&Self::TAG, &mut *self.tw)?;
        self.complete()
    }

    pub fn complete(mut self) -> Result<(), Error> {
        self.tw.end_container()
    }
}
