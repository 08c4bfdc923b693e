use strix_common::math::MathError;

use crate::tags::Tag;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No TIFF preamble at this position
    ///
    /// Non-fatal at the scan boundary: [`crate::search_and_extract_exif`]
    /// skips ahead on this error and fails with it only after exhausting the
    /// input.
    #[error("No Exif data")]
    NoExif,

    #[error("Tag {tag} not known under [{ifd_path}]")]
    TagNotFound { ifd_path: String, tag: Tag },

    #[error("No decoder registered for undefined-typed tag {tag} under [{ifd_path}]")]
    UnhandledUndefined { ifd_path: String, tag: Tag },

    #[error("Offset 0x{offset:08x}+{len} exceeds payload of {payload_len} bytes")]
    OutOfBounds {
        offset: u32,
        len: u32,
        payload_len: usize,
    },

    #[error("Unknown tag type 0x{0:04x}")]
    UnknownTagType(u16),

    #[error("Offset 0x{offset:08x} already visited for [{ifd_name}]")]
    CycleDetected { offset: u32, ifd_name: String },

    #[error("Directory declares {count} entries, limit is {limit}")]
    TooManyEntries { count: u16, limit: u16 },

    #[error("Directory nesting exceeds depth limit of {limit}")]
    MaxDepthExceeded { limit: usize },

    #[error("Unknown directory [{0}]")]
    IfdNotFound(String),

    #[error("Visitor: {0}")]
    Visitor(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("Math: {0}")]
    Math(#[from] MathError),
}

pub(crate) trait ResultExt<T> {
    fn e(self, err: Error) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E> {
    fn e(self, err: Error) -> Result<T> {
        self.map_err(|_| err)
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn e(self, err: Error) -> Result<T> {
        match self {
            Some(v) => Ok(v),
            None => Err(err),
        }
    }
}
