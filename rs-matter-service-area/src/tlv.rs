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

//! The interface between the data model and the (external) TLV codec.
//!
//! Handlers never see raw TLV bytes. Outgoing data is pushed through the [`TLVWrite`]
//! writer trait, while incoming command payloads arrive already decoded as a
//! [`TLVElement`] tree. [`TLVElementWriter`] is a `TLVWrite` implementation which
//! builds such a tree; it is what the tests use and what an embedder bridging to a
//! byte codec can start from.

use core::fmt;

use crate::error::Error;

pub use element::*;
pub use traits::*;

mod element;
mod traits;

/// The tag of a TLV element.
///
/// Only the tag forms used by the Interaction Model payloads are representable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TLVTag {
    Anonymous,
    Context(u8),
}

impl fmt::Display for TLVTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Anonymous"),
            Self::Context(ctx) => write!(f, "Context({})", ctx),
        }
    }
}

/// A writer of TLV elements.
///
/// Containers are opened with `start_struct` / `start_array` and closed with
/// `end_container`; every other method writes a single element.
pub trait TLVWrite {
    fn null(&mut self, tag: &TLVTag) -> Result<(), Error>;

    fn bool(&mut self, tag: &TLVTag, data: bool) -> Result<(), Error>;

    fn i64(&mut self, tag: &TLVTag, data: i64) -> Result<(), Error>;

    fn u64(&mut self, tag: &TLVTag, data: u64) -> Result<(), Error>;

    fn utf8(&mut self, tag: &TLVTag, data: &str) -> Result<(), Error>;

    fn start_struct(&mut self, tag: &TLVTag) -> Result<(), Error>;

    fn start_array(&mut self, tag: &TLVTag) -> Result<(), Error>;

    fn end_container(&mut self) -> Result<(), Error>;

    fn i8(&mut self, tag: &TLVTag, data: i8) -> Result<(), Error> {
        self.i64(tag, data as _)
    }

    fn i16(&mut self, tag: &TLVTag, data: i16) -> Result<(), Error> {
        self.i64(tag, data as _)
    }

    fn i32(&mut self, tag: &TLVTag, data: i32) -> Result<(), Error> {
        self.i64(tag, data as _)
    }

    fn u8(&mut self, tag: &TLVTag, data: u8) -> Result<(), Error> {
        self.u64(tag, data as _)
    }

    fn u16(&mut self, tag: &TLVTag, data: u16) -> Result<(), Error> {
        self.u64(tag, data as _)
    }

    fn u32(&mut self, tag: &TLVTag, data: u32) -> Result<(), Error> {
        self.u64(tag, data as _)
    }
}

impl<T> TLVWrite for &mut T
where
    T: TLVWrite + ?Sized,
{
    fn null(&mut self, tag: &TLVTag) -> Result<(), Error> {
        (**self).null(tag)
    }

    fn bool(&mut self, tag: &TLVTag, data: bool) -> Result<(), Error> {
        (**self).bool(tag, data)
    }

    fn i64(&mut self, tag: &TLVTag, data: i64) -> Result<(), Error> {
        (**self).i64(tag, data)
    }

    fn u64(&mut self, tag: &TLVTag, data: u64) -> Result<(), Error> {
        (**self).u64(tag, data)
    }

    fn utf8(&mut self, tag: &TLVTag, data: &str) -> Result<(), Error> {
        (**self).utf8(tag, data)
    }

    fn start_struct(&mut self, tag: &TLVTag) -> Result<(), Error> {
        (**self).start_struct(tag)
    }

    fn start_array(&mut self, tag: &TLVTag) -> Result<(), Error> {
        (**self).start_array(tag)
    }

    fn end_container(&mut self) -> Result<(), Error> {
        (**self).end_container()
    }
}
