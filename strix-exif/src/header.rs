use crate::error::{Error, Result};
use crate::raw::ByteOrder;

/// JPEG APP1 lead-in preceding the TIFF preamble
pub const EXIF_IDENTIFIER_STRING: &[u8] = b"Exif\0\0";

const TIFF_MAGIC: u16 = 42;

/// Decoded 8-byte TIFF preamble
///
/// The first-IFD offset counts from byte 0 of the byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExifHeader {
    pub byte_order: ByteOrder,
    pub first_ifd_offset: u32,
}

impl std::fmt::Display for ExifHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExifHeader<BYTE-ORDER=[{}] FIRST-IFD-OFFSET=(0x{:x})>",
            self.byte_order, self.first_ifd_offset
        )
    }
}

/// Drop the `Exif\0\0` lead-in if present, leaving the bare TIFF preamble
pub fn trim_exif_lead_in(data: &[u8]) -> &[u8] {
    data.strip_prefix(EXIF_IDENTIFIER_STRING).unwrap_or(data)
}

/// Decode the TIFF preamble at the start of `data`
///
/// Accepts either a bare preamble or one preceded by the `Exif\0\0` lead-in.
/// A byte-order mark or magic mismatch is [`Error::NoExif`], the sentinel
/// scanners use to skip ahead.
pub fn parse_exif_header(data: &[u8]) -> Result<ExifHeader> {
    let data = trim_exif_lead_in(data);

    let Some(preamble) = data.get(..8) else {
        return Err(Error::NoExif);
    };

    let byte_order = match &preamble[..2] {
        b"II" => ByteOrder::LittleEndian,
        b"MM" => ByteOrder::BigEndian,
        _ => return Err(Error::NoExif),
    };

    if byte_order.u16_from([preamble[2], preamble[3]]) != TIFF_MAGIC {
        return Err(Error::NoExif);
    }

    let first_ifd_offset =
        byte_order.u32_from([preamble[4], preamble[5], preamble[6], preamble[7]]);

    Ok(ExifHeader {
        byte_order,
        first_ifd_offset,
    })
}

/// Emit the 8-byte TIFF preamble for the given order and first-IFD offset
pub fn build_exif_header(byte_order: ByteOrder, first_ifd_offset: u32) -> [u8; 8] {
    let mut header = [0; 8];
    header[..2].copy_from_slice(match byte_order {
        ByteOrder::LittleEndian => b"II",
        ByteOrder::BigEndian => b"MM",
    });
    header[2..4].copy_from_slice(&byte_order.u16_bytes(TIFF_MAGIC));
    header[4..8].copy_from_slice(&byte_order.u32_bytes(first_ifd_offset));
    header
}

/// Find the Exif data inside an image blob
///
/// Tries [`parse_exif_header`] at every position and returns the tail slice
/// at the first one that succeeds. The Exif block sits near the start of most
/// JPEGs, so the scan is cheap in practice.
pub fn search_and_extract_exif(data: &[u8]) -> Result<&[u8]> {
    for position in 0..data.len() {
        match parse_exif_header(&data[position..]) {
            Ok(_) => return Ok(&data[position..]),
            Err(Error::NoExif) => continue,
            Err(err) => return Err(err),
        }
    }

    Err(Error::NoExif)
}

/// [`search_and_extract_exif`] over the contents of a file
pub fn search_file_and_extract_exif(path: impl AsRef<std::path::Path>) -> Result<Vec<u8>> {
    let data = std::fs::read(path)?;
    let exif = search_and_extract_exif(&data)?;
    Ok(exif.to_vec())
}
