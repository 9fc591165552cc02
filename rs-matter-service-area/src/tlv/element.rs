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

use log::error;

use crate::error::{Error, ErrorCode};

use super::{TLVTag, TLVWrite};

/// A decoded TLV element.
///
/// Integers keep their signedness only; the width is checked when the element is
/// converted into a concrete Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TLVElement {
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Utf8(String),
    Struct(Vec<(TLVTag, TLVElement)>),
    Array(Vec<TLVElement>),
}

macro_rules! unsigned_accessor {
    ($($t:ident)*) => {
        $(
            pub fn $t(&self) -> Result<$t, Error> {
                match self {
                    Self::Unsigned(value) => $t::try_from(*value).map_err(|_| ErrorCode::InvalidData.into()),
                    _ => Err(ErrorCode::TLVTypeMismatch.into()),
                }
            }
        )*
    };
}

macro_rules! signed_accessor {
    ($($t:ident)*) => {
        $(
            pub fn $t(&self) -> Result<$t, Error> {
                match self {
                    Self::Signed(value) => $t::try_from(*value).map_err(|_| ErrorCode::InvalidData.into()),
                    // Non-negative signed values are indistinguishable from unsigned ones
                    // once they went through a codec which picks the smallest encoding
                    Self::Unsigned(value) => $t::try_from(*value).map_err(|_| ErrorCode::InvalidData.into()),
                    _ => Err(ErrorCode::TLVTypeMismatch.into()),
                }
            }
        )*
    };
}

impl TLVElement {
    unsigned_accessor!(u8 u16 u32 u64);
    signed_accessor!(i8 i16 i32 i64);

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn bool(&self) -> Result<bool, Error> {
        match self {
            Self::Bool(value) => Ok(*value),
            _ => Err(ErrorCode::TLVTypeMismatch.into()),
        }
    }

    pub fn utf8(&self) -> Result<&str, Error> {
        match self {
            Self::Utf8(value) => Ok(value.as_str()),
            _ => Err(ErrorCode::TLVTypeMismatch.into()),
        }
    }

    /// Return the members of this element, if it is a structure.
    pub fn structure(&self) -> Result<&[(TLVTag, TLVElement)], Error> {
        match self {
            Self::Struct(fields) => Ok(fields),
            _ => Err(ErrorCode::TLVTypeMismatch.into()),
        }
    }

    /// Return the elements of this element, if it is an array.
    pub fn array(&self) -> Result<&[TLVElement], Error> {
        match self {
            Self::Array(elements) => Ok(elements),
            _ => Err(ErrorCode::TLVTypeMismatch.into()),
        }
    }

    /// Look up the member of a structure by its context tag.
    ///
    /// Returns `Ok(None)` if this is a structure which does not contain the member.
    pub fn find_ctx(&self, ctx: u8) -> Result<Option<&TLVElement>, Error> {
        Ok(self
            .structure()?
            .iter()
            .find(|(tag, _)| *tag == TLVTag::Context(ctx))
            .map(|(_, element)| element))
    }

    /// Like `find_ctx`, but a missing member is an error.
    pub fn ctx(&self, ctx: u8) -> Result<&TLVElement, Error> {
        self.find_ctx(ctx)?.ok_or_else(|| ErrorCode::TLVNotFound.into())
    }
}

enum Container {
    Struct(Vec<(TLVTag, TLVElement)>),
    Array(Vec<TLVElement>),
}

/// A [`TLVWrite`] implementation which assembles the written elements into
/// [`TLVElement`] trees.
#[derive(Default)]
pub struct TLVElementWriter {
    open: Vec<(TLVTag, Container)>,
    written: Vec<(TLVTag, TLVElement)>,
}

impl TLVElementWriter {
    pub const fn new() -> Self {
        Self {
            open: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Return the top-level elements written so far.
    ///
    /// Elements still inside an open container are not visible.
    pub fn elements(&self) -> &[(TLVTag, TLVElement)] {
        &self.written
    }

    /// Consume the writer, returning the single top-level element written into it.
    pub fn into_element(mut self) -> Result<TLVElement, Error> {
        if !self.open.is_empty() || self.written.len() != 1 {
            error!(
                "Expected exactly one complete element, got {} ({} containers still open)",
                self.written.len(),
                self.open.len()
            );
            Err(ErrorCode::InvalidState)?;
        }

        self.written
            .pop()
            .map(|(_, element)| element)
            .ok_or_else(|| ErrorCode::InvalidState.into())
    }

    /// Consume the writer, returning all top-level elements written into it.
    pub fn into_elements(self) -> Result<Vec<(TLVTag, TLVElement)>, Error> {
        if !self.open.is_empty() {
            Err(ErrorCode::InvalidState)?;
        }

        Ok(self.written)
    }

    fn put(&mut self, tag: &TLVTag, element: TLVElement) -> Result<(), Error> {
        match self.open.last_mut() {
            None => self.written.push((*tag, element)),
            Some((_, Container::Struct(fields))) => {
                if *tag == TLVTag::Anonymous {
                    error!("Structure members must be tagged");
                    Err(ErrorCode::InvalidData)?;
                }

                fields.push((*tag, element));
            }
            Some((_, Container::Array(elements))) => {
                if *tag != TLVTag::Anonymous {
                    error!("Array elements must be anonymous, got {}", tag);
                    Err(ErrorCode::InvalidData)?;
                }

                elements.push(element);
            }
        }

        Ok(())
    }
}

impl TLVWrite for TLVElementWriter {
    fn null(&mut self, tag: &TLVTag) -> Result<(), Error> {
        self.put(tag, TLVElement::Null)
    }

    fn bool(&mut self, tag: &TLVTag, data: bool) -> Result<(), Error> {
        self.put(tag, TLVElement::Bool(data))
    }

    fn i64(&mut self, tag: &TLVTag, data: i64) -> Result<(), Error> {
        self.put(tag, TLVElement::Signed(data))
    }

    fn u64(&mut self, tag: &TLVTag, data: u64) -> Result<(), Error> {
        self.put(tag, TLVElement::Unsigned(data))
    }

    fn utf8(&mut self, tag: &TLVTag, data: &str) -> Result<(), Error> {
        self.put(tag, TLVElement::Utf8(data.into()))
    }

    fn start_struct(&mut self, tag: &TLVTag) -> Result<(), Error> {
        self.open.push((*tag, Container::Struct(Vec::new())));
        Ok(())
    }

    fn start_array(&mut self, tag: &TLVTag) -> Result<(), Error> {
        self.open.push((*tag, Container::Array(Vec::new())));
        Ok(())
    }

    fn end_container(&mut self) -> Result<(), Error> {
        let (tag, container) = self.open.pop().ok_or(ErrorCode::InvalidState)?;

        let element = match container {
            Container::Struct(fields) => TLVElement::Struct(fields),
            Container::Array(elements) => TLVElement::Array(elements),
        };

        self.put(&tag, element)
    }
}
