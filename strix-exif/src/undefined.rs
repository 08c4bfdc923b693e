//! Custom decoders for UNDEFINED-typed tags
//!
//! The UNDEFINED TIFF type has no generic value shape; each tag carrying it
//! needs its own decoder. Unregistered tags fail with
//! [`Error::UnhandledUndefined`], which callers conventionally render as
//! `!UNDEFINED!` and do not treat as fatal.

use std::collections::HashMap;

use sha1::{Digest, Sha1};

use crate::error::{Error, Result};
use crate::path::{IFD_PATH_STANDARD_EXIF, IFD_PATH_STANDARD_EXIF_IOP};
use crate::tags::Tag;
use crate::value::ValueContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentsConfigurationId {
    Ycbcr,
    Rgb,
    Other,
}

impl std::fmt::Display for ComponentsConfigurationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ycbcr => "YCBCR",
            Self::Rgb => "RGB",
            Self::Other => "OTHER",
        })
    }
}

/// Character encoding declared by the first 8 bytes of a UserComment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingType {
    Ascii,
    Jis,
    Unicode,
    Undefined,
}

impl EncodingType {
    fn from_signature(signature: &[u8; 8]) -> Self {
        match signature {
            b"ASCII\0\0\0" => Self::Ascii,
            b"JIS\0\0\0\0\0" => Self::Jis,
            b"UNICODE\0" => Self::Unicode,
            _ => Self::Undefined,
        }
    }
}

impl std::fmt::Display for EncodingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ascii => "ASCII",
            Self::Jis => "JIS",
            Self::Unicode => "UNICODE",
            Self::Undefined => "UNDEFINED",
        })
    }
}

/// A decoded UNDEFINED value
///
/// One variant per registered decoder family; `Display` produces the
/// canonical rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum UndefinedValue<'a> {
    /// Version blobs (ExifVersion, FlashpixVersion, InteroperabilityVersion)
    /// shown as their raw ASCII, e.g. `0230`
    Ascii(String),
    ComponentsConfiguration {
        id: ComponentsConfigurationId,
        bytes: &'a [u8],
    },
    /// Vendor blob reduced to a fingerprint: leading type ID and SHA-1
    MakerNote {
        type_id: &'a [u8],
        digest: String,
        len: u32,
    },
    UserComment {
        encoding: EncodingType,
        data: &'a [u8],
    },
}

impl std::fmt::Display for UndefinedValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascii(s) => f.write_str(s),
            Self::ComponentsConfiguration { id, bytes } => {
                write!(
                    f,
                    "ComponentsConfiguration<ID=[{id}] BYTES=[{}]>",
                    join_decimal(bytes)
                )
            }
            Self::MakerNote {
                type_id,
                digest,
                len,
            } => {
                let type_id: Vec<_> = type_id.iter().map(|b| format!("{b:02x}")).collect();
                write!(
                    f,
                    "MakerNote<TYPE-ID=[{}] LEN=({len}) SHA1=[{digest}]>",
                    type_id.join(" ")
                )
            }
            Self::UserComment { encoding, data } => {
                let head = &data[..data.len().min(8)];
                write!(
                    f,
                    "UserComment<SIZE=({}) ENCODING=[{encoding}] V=[{}]... LEN=({})>",
                    data.len(),
                    join_decimal(head),
                    data.len()
                )
            }
        }
    }
}

fn join_decimal(bytes: &[u8]) -> String {
    let parts: Vec<_> = bytes.iter().map(u8::to_string).collect();
    parts.join(" ")
}

pub type UndefinedDecoder = for<'a> fn(&ValueContext<'a>) -> Result<UndefinedValue<'a>>;

/// Registry of `(stripped IFD path, tag ID)` → decoder
#[derive(Debug, Clone)]
pub struct UndefinedDispatch {
    decoders: HashMap<(String, Tag), UndefinedDecoder>,
}

impl UndefinedDispatch {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry preloaded with the standard Exif decoders
    pub fn standard() -> Self {
        let mut dispatch = Self::new();

        dispatch.register(IFD_PATH_STANDARD_EXIF, Tag(0x9000), decode_ascii_version);
        dispatch.register(IFD_PATH_STANDARD_EXIF, Tag(0xA000), decode_ascii_version);
        dispatch.register(
            IFD_PATH_STANDARD_EXIF,
            Tag(0x9101),
            decode_components_configuration,
        );
        dispatch.register(IFD_PATH_STANDARD_EXIF, Tag::MAKER_NOTE, decode_maker_note);
        dispatch.register(IFD_PATH_STANDARD_EXIF, Tag::USER_COMMENT, decode_user_comment);
        dispatch.register(IFD_PATH_STANDARD_EXIF_IOP, Tag(0x0002), decode_ascii_version);

        dispatch
    }

    pub fn register(&mut self, ifd_path: &str, tag: Tag, decoder: UndefinedDecoder) {
        self.decoders.insert((ifd_path.to_owned(), tag), decoder);
    }

    /// Decode an UNDEFINED-typed entry through its registered decoder
    pub fn decode<'a>(&self, context: &ValueContext<'a>) -> Result<UndefinedValue<'a>> {
        let key = (context.ifd_path().to_owned(), context.tag_id());
        let Some(decoder) = self.decoders.get(&key) else {
            return Err(Error::UnhandledUndefined {
                ifd_path: key.0,
                tag: key.1,
            });
        };

        decoder(context)
    }
}

impl Default for UndefinedDispatch {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_ascii_version<'a>(context: &ValueContext<'a>) -> Result<UndefinedValue<'a>> {
    let bytes = context.raw_bytes()?;
    Ok(UndefinedValue::Ascii(
        String::from_utf8_lossy(bytes).into_owned(),
    ))
}

fn decode_components_configuration<'a>(
    context: &ValueContext<'a>,
) -> Result<UndefinedValue<'a>> {
    let bytes = context.raw_bytes()?;
    let id = match bytes {
        [1, 2, 3, 0] => ComponentsConfigurationId::Ycbcr,
        [4, 5, 6, 0] => ComponentsConfigurationId::Rgb,
        _ => ComponentsConfigurationId::Other,
    };

    Ok(UndefinedValue::ComponentsConfiguration { id, bytes })
}

fn decode_maker_note<'a>(context: &ValueContext<'a>) -> Result<UndefinedValue<'a>> {
    let bytes = context.raw_bytes()?;
    let digest = Sha1::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();

    Ok(UndefinedValue::MakerNote {
        type_id: &bytes[..bytes.len().min(20)],
        digest,
        len: context.unit_count(),
    })
}

fn decode_user_comment<'a>(context: &ValueContext<'a>) -> Result<UndefinedValue<'a>> {
    let bytes = context.raw_bytes()?;
    if bytes.len() < 8 {
        return Err(Error::OutOfBounds {
            offset: 0,
            len: 8,
            payload_len: bytes.len(),
        });
    }

    let mut signature = [0; 8];
    signature.copy_from_slice(&bytes[..8]);

    Ok(UndefinedValue::UserComment {
        encoding: EncodingType::from_signature(&signature),
        data: &bytes[8..],
    })
}
