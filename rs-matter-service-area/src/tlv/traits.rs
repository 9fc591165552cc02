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

use super::{TLVElement, TLVTag, TLVWrite};

pub trait FromTLV: Sized {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error>;

    // Only `Option<T>` is expected to override this
    fn tlv_not_found() -> Result<Self, Error> {
        Err(ErrorCode::TLVNotFound.into())
    }

    /// Decode the member with the given context tag of a structure element.
    fn from_ctx(element: &TLVElement, ctx: u8) -> Result<Self, Error> {
        match element.find_ctx(ctx)? {
            Some(member) => Self::from_tlv(member),
            None => Self::tlv_not_found(),
        }
    }
}

pub trait ToTLV {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error>;
}

impl<T> ToTLV for &T
where
    T: ToTLV + ?Sized,
{
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        (**self).to_tlv(tag, tw)
    }
}

macro_rules! fromtlv_for {
    ($($t:ident)*) => {
        $(
            impl FromTLV for $t {
                fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
                    element.$t()
                }
            }
        )*
    };
}

macro_rules! totlv_for {
    ($($t:ident)*) => {
        $(
            impl ToTLV for $t {
                fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
                    tw.$t(tag, *self)
                }
            }
        )*
    };
}

fromtlv_for!(i8 u8 i16 u16 i32 u32 i64 u64 bool);
totlv_for!(i8 u8 i16 u16 i32 u32 i64 u64 bool);

impl FromTLV for String {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        element.utf8().map(Into::into)
    }
}

impl<const N: usize> FromTLV for heapless::String<N> {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        let mut string = heapless::String::new();
        string
            .push_str(element.utf8()?)
            .map_err(|_| ErrorCode::ConstraintError)?;

        Ok(string)
    }
}

impl ToTLV for str {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.utf8(tag, self)
    }
}

impl ToTLV for String {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.utf8(tag, self)
    }
}

impl<const N: usize> ToTLV for heapless::String<N> {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.utf8(tag, self)
    }
}

impl<T: FromTLV> FromTLV for Vec<T> {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        element.array()?.iter().map(T::from_tlv).collect()
    }
}

impl<T: ToTLV> ToTLV for [T] {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        tw.start_array(tag)?;
        for item in self {
            item.to_tlv(&TLVTag::Anonymous, tw)?;
        }
        tw.end_container()
    }
}

impl<T: ToTLV> ToTLV for Vec<T> {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        self.as_slice().to_tlv(tag, tw)
    }
}

/// An optional (i.e. possibly absent) structure member.
impl<T: FromTLV> FromTLV for Option<T> {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        Ok(Some(T::from_tlv(element)?))
    }

    fn tlv_not_found() -> Result<Self, Error> {
        Ok(None)
    }
}

impl<T: ToTLV> ToTLV for Option<T> {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        match self {
            Some(value) => value.to_tlv(tag, tw),
            None => Ok(()),
        }
    }
}

/// A value which is always present on the wire, but might be the TLV `null`.
///
/// This is the counterpart of the `nullable` quality in the Matter data model.
/// An `Option<Nullable<T>>` describes an optional member which - when present - is nullable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Nullable<T>(Option<T>);

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> Nullable<T> {
    pub const fn some(value: T) -> Self {
        Self(Some(value))
    }

    pub const fn none() -> Self {
        Self(None)
    }

    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub const fn is_some(&self) -> bool {
        self.0.is_some()
    }

    pub const fn as_opt_ref(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T: Copy> Nullable<T> {
    pub fn get(&self) -> Option<T> {
        self.0
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T: FromTLV> FromTLV for Nullable<T> {
    fn from_tlv(element: &TLVElement) -> Result<Self, Error> {
        if element.is_null() {
            Ok(Self::none())
        } else {
            Ok(Self::some(T::from_tlv(element)?))
        }
    }
}

impl<T: ToTLV> ToTLV for Nullable<T> {
    fn to_tlv(&self, tag: &TLVTag, tw: &mut dyn TLVWrite) -> Result<(), Error> {
        match self.as_opt_ref() {
            Some(value) => value.to_tlv(tag, tw),
            None => tw.null(tag),
        }
    }
}

/// Helper for the `FromTLV` / `ToTLV` impls of `#[repr(u8)]` enums.
pub fn enum_from_tlv<T, F>(element: &TLVElement, from_repr: F) -> Result<T, Error>
where
    F: FnOnce(u8) -> Option<T>,
{
    from_repr(element.u8()?).ok_or_else(|| ErrorCode::ConstraintError.into())
}

/// Implement `FromTLV` and `ToTLV` for `#[repr(u8)]` enums deriving `strum::FromRepr`.
#[allow(unused_macros)]
#[macro_export]
macro_rules! tlv_u8_enum {
    ($($en:ty)*) => {
        $(
            impl $crate::tlv::FromTLV for $en {
                fn from_tlv(element: &$crate::tlv::TLVElement) -> Result<Self, $crate::error::Error> {
                    $crate::tlv::enum_from_tlv(element, <$en>::from_repr)
                }
            }

            impl $crate::tlv::ToTLV for $en {
                fn to_tlv(
                    &self,
                    tag: &$crate::tlv::TLVTag,
                    tw: &mut dyn $crate::tlv::TLVWrite,
                ) -> Result<(), $crate::error::Error> {
                    $crate::tlv::TLVWrite::u8(tw, tag, *self as u8)
                }
            }
        )*
    };
}
