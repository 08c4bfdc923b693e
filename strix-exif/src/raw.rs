use strix_common::math::U32Ext;

use crate::error::{Error, Result};

/// Byte order of all multi-byte reads inside one TIFF stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            Self::LittleEndian => u16::from_le_bytes(bytes),
            Self::BigEndian => u16::from_be_bytes(bytes),
        }
    }

    pub fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    pub fn i32_from(self, bytes: [u8; 4]) -> i32 {
        match self {
            Self::LittleEndian => i32::from_le_bytes(bytes),
            Self::BigEndian => i32::from_be_bytes(bytes),
        }
    }

    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            Self::LittleEndian => value.to_le_bytes(),
            Self::BigEndian => value.to_be_bytes(),
        }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::LittleEndian => value.to_le_bytes(),
            Self::BigEndian => value.to_be_bytes(),
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LittleEndian => write!(f, "LittleEndian"),
            Self::BigEndian => write!(f, "BigEndian"),
        }
    }
}

/// Positioned endian-aware reader over a borrowed payload
///
/// All reads fail with [`Error::OutOfBounds`] when the requested span exceeds
/// the slice; the position is left unchanged in that case.
#[derive(Debug, Clone)]
pub struct Raw<'a> {
    pub byte_order: ByteOrder,
    data: &'a [u8],
    pos: usize,
}

impl<'a> Raw<'a> {
    pub fn new(byte_order: ByteOrder, data: &'a [u8]) -> Self {
        Self {
            byte_order,
            data,
            pos: 0,
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn position(&self) -> u32 {
        // Payloads are capped at u32 by the TIFF offset width
        self.pos as u32
    }

    pub fn seek_start(&mut self, seek: u32) -> Result<()> {
        let pos = seek.usize();
        if pos > self.data.len() {
            return Err(self.out_of_bounds(seek, 0));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_exact<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self
            .data
            .get(self.pos..self.pos + N)
            .ok_or_else(|| self.out_of_bounds(self.position(), N as u32))?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(slice);
        self.pos += N;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.byte_order.u16_from(self.read_exact()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.byte_order.u32_from(self.read_exact()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.byte_order.i32_from(self.read_exact()?))
    }

    /// Random access into the payload without moving the position
    pub fn slice_at(&self, offset: u32, len: u32) -> Result<&'a [u8]> {
        let start = offset.usize();
        let end = offset
            .safe_add(len)
            .map_err(|_| self.out_of_bounds(offset, len))?
            .usize();
        self.data
            .get(start..end)
            .ok_or_else(|| self.out_of_bounds(offset, len))
    }

    fn out_of_bounds(&self, offset: u32, len: u32) -> Error {
        Error::OutOfBounds {
            offset,
            len,
            payload_len: self.data.len(),
        }
    }
}
