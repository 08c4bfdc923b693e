#![doc = include_str!("../README.md")]

pub mod collect;
pub mod error;
pub mod header;
pub mod path;
pub mod raw;
pub mod tags;
pub mod types;
pub mod undefined;
pub mod value;
pub mod walk;

pub use collect::{collect, Ifd, IfdIndex, IfdTagEntry};
pub use error::{Error, Result};
pub use header::{
    build_exif_header, parse_exif_header, search_and_extract_exif, search_file_and_extract_exif,
    ExifHeader, EXIF_IDENTIFIER_STRING,
};
pub use path::{
    IfdMapping, IfdPath, IfdPathSegment, IFD_PATH_STANDARD, IFD_PATH_STANDARD_EXIF,
    IFD_PATH_STANDARD_EXIF_IOP, IFD_PATH_STANDARD_GPS,
};
pub use raw::{ByteOrder, Raw};
pub use tags::{Tag, TagDescriptor, TagIndex};
pub use types::{Rational, SRational, TagType, TagValue};
pub use undefined::{EncodingType, UndefinedDispatch, UndefinedValue};
pub use value::ValueContext;
pub use walk::{visit, IfdWalker, TraversalLimits};
