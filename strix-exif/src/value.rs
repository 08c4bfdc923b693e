use strix_common::math::U32Ext;

use crate::error::{Error, Result};
use crate::raw::{ByteOrder, Raw};
use crate::tags::Tag;
use crate::types::{Rational, SRational, TagType, TagValue};

/// Everything needed to decode one entry's value
///
/// The 12-byte entry record ends in a 4-byte field that holds the value
/// itself when `unit_count × type size ≤ 4` and an offset into the TIFF
/// payload otherwise. The context captures that field, its position, and the
/// payload, so values resolve lazily and zero-copy.
#[derive(Debug, Clone)]
pub struct ValueContext<'a> {
    ifd_path: String,
    tag_id: Tag,
    tag_type: TagType,
    unit_count: u32,
    raw_value_offset: [u8; 4],
    value_field_offset: u32,
    byte_order: ByteOrder,
    payload: &'a [u8],
}

impl<'a> ValueContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ifd_path: impl Into<String>,
        tag_id: Tag,
        tag_type: TagType,
        unit_count: u32,
        raw_value_offset: [u8; 4],
        value_field_offset: u32,
        byte_order: ByteOrder,
        payload: &'a [u8],
    ) -> Self {
        Self {
            ifd_path: ifd_path.into(),
            tag_id,
            tag_type,
            unit_count,
            raw_value_offset,
            value_field_offset,
            byte_order,
            payload,
        }
    }

    /// Stripped path of the owning IFD
    pub fn ifd_path(&self) -> &str {
        &self.ifd_path
    }

    pub fn tag_id(&self) -> Tag {
        self.tag_id
    }

    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    /// The 4-byte value-or-offset field as it appears on disk
    pub fn raw_value_offset(&self) -> [u8; 4] {
        self.raw_value_offset
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn data_len(&self) -> Result<u32> {
        Ok(self.unit_count.safe_mul(self.tag_type.size())?)
    }

    /// Whether the value sits inline in the 4-byte field
    pub fn is_embedded(&self) -> Result<bool> {
        Ok(self.data_len()? <= 4)
    }

    /// The 4-byte field decoded as an offset
    pub fn value_offset(&self) -> u32 {
        self.byte_order.u32_from(self.raw_value_offset)
    }

    /// The value's bytes, dereferencing the offset when not embedded
    pub fn raw_bytes(&self) -> Result<&'a [u8]> {
        let len = self.data_len()?;
        let raw = Raw::new(self.byte_order, self.payload);
        if self.is_embedded()? {
            raw.slice_at(self.value_field_offset, len)
        } else {
            raw.slice_at(self.value_offset(), len)
        }
    }

    /// Decode into the typed sequence for the entry's tag type
    pub fn values(&self) -> Result<TagValue<'a>> {
        let bytes = self.raw_bytes()?;
        let order = self.byte_order;

        Ok(match self.tag_type {
            TagType::Byte => TagValue::Bytes(bytes),
            TagType::Undefined => TagValue::Undefined(bytes),
            TagType::Ascii => TagValue::Ascii(decode_ascii(bytes)),
            TagType::Short => TagValue::Shorts(
                bytes
                    .chunks_exact(2)
                    .map(|c| order.u16_from([c[0], c[1]]))
                    .collect(),
            ),
            TagType::Long => TagValue::Longs(
                bytes
                    .chunks_exact(4)
                    .map(|c| order.u32_from([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            TagType::SLong => TagValue::SLongs(
                bytes
                    .chunks_exact(4)
                    .map(|c| order.i32_from([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            TagType::Rational => TagValue::Rationals(
                bytes
                    .chunks_exact(8)
                    .map(|c| Rational {
                        numerator: order.u32_from([c[0], c[1], c[2], c[3]]),
                        denominator: order.u32_from([c[4], c[5], c[6], c[7]]),
                    })
                    .collect(),
            ),
            TagType::SRational => TagValue::SRationals(
                bytes
                    .chunks_exact(8)
                    .map(|c| SRational {
                        numerator: order.i32_from([c[0], c[1], c[2], c[3]]),
                        denominator: order.i32_from([c[4], c[5], c[6], c[7]]),
                    })
                    .collect(),
            ),
            TagType::Unknown(code) => return Err(Error::UnknownTagType(code)),
        })
    }

    /// Render the value for display
    ///
    /// UNDEFINED-typed entries have no generic rendering; resolve those
    /// through [`crate::UndefinedDispatch`] instead.
    pub fn resolve_as_string(&self, just_first: bool) -> Result<String> {
        if self.tag_type == TagType::Undefined {
            return Err(Error::UnhandledUndefined {
                ifd_path: self.ifd_path.clone(),
                tag: self.tag_id,
            });
        }

        Ok(self.values()?.render(just_first))
    }
}

/// ASCII values are NUL-terminated; the terminator (and any padding NULs)
/// are dropped for display while `unit_count` still includes them.
fn decode_ascii(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|b| *b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
