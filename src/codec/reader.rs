// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounds-checked little-endian field access on a received frame.

use crate::error::DecodeError;

/// Read-only view over a frame with absolute, frame-relative offsets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameReader<'a> {
    frame: &'a [u8],
}

impl<'a> FrameReader<'a> {
    pub(crate) const fn new(frame: &'a [u8]) -> Self {
        Self { frame }
    }

    pub(crate) fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        self.frame
            .get(offset..offset + len)
            .ok_or(DecodeError::TooShort {
                expected: offset + len,
                actual: self.frame.len(),
            })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    pub(crate) fn u8(&self, offset: usize) -> Result<u8, DecodeError> {
        Ok(self.array::<1>(offset)?[0])
    }

    pub(crate) fn i8(&self, offset: usize) -> Result<i8, DecodeError> {
        Ok(i8::from_le_bytes(self.array(offset)?))
    }

    pub(crate) fn u16(&self, offset: usize) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.array(offset)?))
    }

    pub(crate) fn i16(&self, offset: usize) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.array(offset)?))
    }

    pub(crate) fn i32(&self, offset: usize) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.array(offset)?))
    }

    pub(crate) fn u32(&self, offset: usize) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.array(offset)?))
    }

    pub(crate) fn f32(&self, offset: usize) -> Result<f32, DecodeError> {
        Ok(f32::from_le_bytes(self.array(offset)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let frame = [0x01, 0x02, 0x03, 0x04, 0x00, 0x00, 0x80, 0x3F];
        let reader = FrameReader::new(&frame);

        assert_eq!(reader.u16(0).unwrap(), 0x0201);
        assert_eq!(reader.u32(0).unwrap(), 0x0403_0201);
        assert!((reader.f32(4).unwrap() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn out_of_bounds_is_too_short() {
        let frame = [0u8; 6];
        let err = FrameReader::new(&frame).u32(4).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TooShort {
                expected: 8,
                actual: 6
            }
        );
    }
}
