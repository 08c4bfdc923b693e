use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::path::{
    IFD_PATH_STANDARD, IFD_PATH_STANDARD_EXIF, IFD_PATH_STANDARD_EXIF_IOP, IFD_PATH_STANDARD_GPS,
};
use crate::types::TagType;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Tag(pub u16);

impl Tag {
    pub const MAKER_NOTE: Self = Self(0x927C);
    pub const USER_COMMENT: Self = Self(0x9286);

    pub const EXIF_IFD_POINTER: Self = Self(0x8769);
    pub const GPS_INFO_IFD_POINTER: Self = Self(0x8825);
    pub const INTEROPERABILITY_IFD_POINTER: Self = Self(0xA005);

    pub const JPEG_INTERCHANGE_FORMAT: Self = Self(0x0201);
    pub const JPEG_INTERCHANGE_FORMAT_LENGTH: Self = Self(0x0202);
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// What the dictionary knows about a tag under one IFD path
#[derive(Debug, Clone, Copy)]
pub struct TagDescriptor {
    pub id: Tag,
    pub name: &'static str,
    /// Registered types; the on-wire type from the entry always wins
    pub types: &'static [TagType],
}

/// Registry of `(stripped IFD path, tag ID)` → descriptor
///
/// A miss is [`Error::TagNotFound`], a soft error: visitors decide whether to
/// skip the entry, the traversal itself keeps going either way.
#[derive(Debug, Clone)]
pub struct TagIndex {
    tags: HashMap<String, HashMap<Tag, TagDescriptor>>,
}

impl TagIndex {
    /// Dictionary preloaded with the standard TIFF/Exif/GPS/Iop tags
    pub fn new() -> Self {
        let mut index = Self {
            tags: HashMap::new(),
        };
        for &(path, id, name, types) in STANDARD_TAGS {
            index.register(
                path,
                TagDescriptor {
                    id: Tag(id),
                    name,
                    types,
                },
            );
        }
        index
    }

    pub fn register(&mut self, ifd_path: &str, descriptor: TagDescriptor) {
        self.tags
            .entry(ifd_path.to_owned())
            .or_default()
            .insert(descriptor.id, descriptor);
    }

    pub fn get(&self, ifd_path: &str, tag: Tag) -> Result<&TagDescriptor> {
        self.tags
            .get(ifd_path)
            .and_then(|tags| tags.get(&tag))
            .ok_or_else(|| Error::TagNotFound {
                ifd_path: ifd_path.to_owned(),
                tag,
            })
    }
}

impl Default for TagIndex {
    fn default() -> Self {
        Self::new()
    }
}

type TagRow = (&'static str, u16, &'static str, &'static [TagType]);

#[rustfmt::skip]
const STANDARD_TAGS: &[TagRow] = &[
    (IFD_PATH_STANDARD, 0x0100, "ImageWidth", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD, 0x0101, "ImageLength", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD, 0x0102, "BitsPerSample", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0103, "Compression", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0106, "PhotometricInterpretation", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x010E, "ImageDescription", &[TagType::Ascii]),
    (IFD_PATH_STANDARD, 0x010F, "Make", &[TagType::Ascii]),
    (IFD_PATH_STANDARD, 0x0110, "Model", &[TagType::Ascii]),
    (IFD_PATH_STANDARD, 0x0111, "StripOffsets", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD, 0x0112, "Orientation", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0115, "SamplesPerPixel", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0116, "RowsPerStrip", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD, 0x0117, "StripByteCounts", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD, 0x011A, "XResolution", &[TagType::Rational]),
    (IFD_PATH_STANDARD, 0x011B, "YResolution", &[TagType::Rational]),
    (IFD_PATH_STANDARD, 0x011C, "PlanarConfiguration", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0128, "ResolutionUnit", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x012D, "TransferFunction", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0131, "Software", &[TagType::Ascii]),
    (IFD_PATH_STANDARD, 0x0132, "DateTime", &[TagType::Ascii]),
    (IFD_PATH_STANDARD, 0x013B, "Artist", &[TagType::Ascii]),
    (IFD_PATH_STANDARD, 0x013E, "WhitePoint", &[TagType::Rational]),
    (IFD_PATH_STANDARD, 0x013F, "PrimaryChromaticities", &[TagType::Rational]),
    (IFD_PATH_STANDARD, 0x0201, "JPEGInterchangeFormat", &[TagType::Long]),
    (IFD_PATH_STANDARD, 0x0202, "JPEGInterchangeFormatLength", &[TagType::Long]),
    (IFD_PATH_STANDARD, 0x0211, "YCbCrCoefficients", &[TagType::Rational]),
    (IFD_PATH_STANDARD, 0x0212, "YCbCrSubSampling", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0213, "YCbCrPositioning", &[TagType::Short]),
    (IFD_PATH_STANDARD, 0x0214, "ReferenceBlackWhite", &[TagType::Rational]),
    (IFD_PATH_STANDARD, 0x8298, "Copyright", &[TagType::Ascii]),
    (IFD_PATH_STANDARD, 0x8769, "ExifTag", &[TagType::Long]),
    (IFD_PATH_STANDARD, 0x8825, "GPSTag", &[TagType::Long]),

    (IFD_PATH_STANDARD_EXIF, 0x829A, "ExposureTime", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0x829D, "FNumber", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0x8822, "ExposureProgram", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0x8824, "SpectralSensitivity", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0x8827, "ISOSpeedRatings", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0x8830, "SensitivityType", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0x8832, "RecommendedExposureIndex", &[TagType::Long]),
    (IFD_PATH_STANDARD_EXIF, 0x9000, "ExifVersion", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0x9003, "DateTimeOriginal", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0x9004, "DateTimeDigitized", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0x9101, "ComponentsConfiguration", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0x9102, "CompressedBitsPerPixel", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0x9201, "ShutterSpeedValue", &[TagType::SRational]),
    (IFD_PATH_STANDARD_EXIF, 0x9202, "ApertureValue", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0x9203, "BrightnessValue", &[TagType::SRational]),
    (IFD_PATH_STANDARD_EXIF, 0x9204, "ExposureBiasValue", &[TagType::SRational]),
    (IFD_PATH_STANDARD_EXIF, 0x9205, "MaxApertureValue", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0x9206, "SubjectDistance", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0x9207, "MeteringMode", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0x9208, "LightSource", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0x9209, "Flash", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0x920A, "FocalLength", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0x9214, "SubjectArea", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0x927C, "MakerNote", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0x9286, "UserComment", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0x9290, "SubSecTime", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0x9291, "SubSecTimeOriginal", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0x9292, "SubSecTimeDigitized", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0xA000, "FlashpixVersion", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0xA001, "ColorSpace", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA002, "PixelXDimension", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD_EXIF, 0xA003, "PixelYDimension", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD_EXIF, 0xA004, "RelatedSoundFile", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0xA005, "InteroperabilityTag", &[TagType::Long]),
    (IFD_PATH_STANDARD_EXIF, 0xA20B, "FlashEnergy", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0xA20E, "FocalPlaneXResolution", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0xA20F, "FocalPlaneYResolution", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0xA210, "FocalPlaneResolutionUnit", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA214, "SubjectLocation", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA215, "ExposureIndex", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0xA217, "SensingMethod", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA300, "FileSource", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0xA301, "SceneType", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0xA302, "CFAPattern", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF, 0xA401, "CustomRendered", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA402, "ExposureMode", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA403, "WhiteBalance", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA404, "DigitalZoomRatio", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0xA405, "FocalLengthIn35mmFilm", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA406, "SceneCaptureType", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA407, "GainControl", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA408, "Contrast", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA409, "Saturation", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA40A, "Sharpness", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA40C, "SubjectDistanceRange", &[TagType::Short]),
    (IFD_PATH_STANDARD_EXIF, 0xA420, "ImageUniqueID", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0xA430, "CameraOwnerName", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0xA431, "BodySerialNumber", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0xA432, "LensSpecification", &[TagType::Rational]),
    (IFD_PATH_STANDARD_EXIF, 0xA433, "LensMake", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0xA434, "LensModel", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF, 0xA435, "LensSerialNumber", &[TagType::Ascii]),

    (IFD_PATH_STANDARD_EXIF_IOP, 0x0001, "InteroperabilityIndex", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_EXIF_IOP, 0x0002, "InteroperabilityVersion", &[TagType::Undefined]),
    (IFD_PATH_STANDARD_EXIF_IOP, 0x1001, "RelatedImageWidth", &[TagType::Short, TagType::Long]),
    (IFD_PATH_STANDARD_EXIF_IOP, 0x1002, "RelatedImageLength", &[TagType::Short, TagType::Long]),

    (IFD_PATH_STANDARD_GPS, 0x0000, "GPSVersionID", &[TagType::Byte]),
    (IFD_PATH_STANDARD_GPS, 0x0001, "GPSLatitudeRef", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x0002, "GPSLatitude", &[TagType::Rational]),
    (IFD_PATH_STANDARD_GPS, 0x0003, "GPSLongitudeRef", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x0004, "GPSLongitude", &[TagType::Rational]),
    (IFD_PATH_STANDARD_GPS, 0x0005, "GPSAltitudeRef", &[TagType::Byte]),
    (IFD_PATH_STANDARD_GPS, 0x0006, "GPSAltitude", &[TagType::Rational]),
    (IFD_PATH_STANDARD_GPS, 0x0007, "GPSTimeStamp", &[TagType::Rational]),
    (IFD_PATH_STANDARD_GPS, 0x0008, "GPSSatellites", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x0009, "GPSStatus", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x000A, "GPSMeasureMode", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x000B, "GPSDOP", &[TagType::Rational]),
    (IFD_PATH_STANDARD_GPS, 0x000C, "GPSSpeedRef", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x000D, "GPSSpeed", &[TagType::Rational]),
    (IFD_PATH_STANDARD_GPS, 0x0010, "GPSImgDirectionRef", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x0011, "GPSImgDirection", &[TagType::Rational]),
    (IFD_PATH_STANDARD_GPS, 0x0012, "GPSMapDatum", &[TagType::Ascii]),
    (IFD_PATH_STANDARD_GPS, 0x001D, "GPSDateStamp", &[TagType::Ascii]),
];
