#![allow(dead_code)]

use strix_exif::error::Error;
use strix_exif::{
    visit, IfdMapping, TagIndex, TagType, UndefinedDispatch, IFD_PATH_STANDARD,
};

pub const MAKER_NOTE_BLOB: &[u8] = b"strix-makernote-fixture!";
pub const MAKER_NOTE_SHA1: &str = "f095315b53babfdfad1df90dc7dc8e0ba5ae7e5a";

pub fn entry(tag: u16, tag_type: u16, count: u32, value: [u8; 4]) -> Vec<u8> {
    let mut record = Vec::with_capacity(12);
    record.extend_from_slice(&tag.to_le_bytes());
    record.extend_from_slice(&tag_type.to_le_bytes());
    record.extend_from_slice(&count.to_le_bytes());
    record.extend_from_slice(&value);
    record
}

/// Little-endian payload with the structural shape of a Canon JPEG's Exif:
/// two chained root IFDs, an Exif sub-IFD holding an Iop sub-IFD, and a GPS
/// sub-IFD.
///
/// Layout (offsets from the byte-order mark):
///
/// |   8 | IFD0: Make, Model, Orientation, ExifTag, GPSTag; next -> 264 |
/// |  74 | Make data (6)                                                |
/// |  80 | Model data (22)                                              |
/// | 102 | Exif: ExposureTime, ExifVersion, MakerNote, UserComment,     |
/// |     | InteroperabilityTag; next -> 0                               |
/// | 168 | ExposureTime data (8)                                        |
/// | 176 | MakerNote data (24)                                          |
/// | 200 | UserComment data (16)                                        |
/// | 216 | Iop: InteroperabilityIndex, InteroperabilityVersion          |
/// | 246 | GPSInfo: GPSVersionID                                        |
/// | 264 | IFD1: Compression; next -> 0                                 |
pub fn canon_like_exif() -> Vec<u8> {
    let mut data = Vec::new();

    // TIFF preamble
    data.extend_from_slice(b"II");
    data.extend_from_slice(&[42, 0]);
    data.extend_from_slice(&8_u32.to_le_bytes());

    // IFD0
    data.extend_from_slice(&5_u16.to_le_bytes());
    data.extend_from_slice(&entry(0x010F, 2, 6, 74_u32.to_le_bytes()));
    data.extend_from_slice(&entry(0x0110, 2, 22, 80_u32.to_le_bytes()));
    data.extend_from_slice(&entry(0x0112, 3, 1, [1, 0, 0, 0]));
    data.extend_from_slice(&entry(0x8769, 4, 1, 102_u32.to_le_bytes()));
    data.extend_from_slice(&entry(0x8825, 4, 1, 246_u32.to_le_bytes()));
    data.extend_from_slice(&264_u32.to_le_bytes());

    data.extend_from_slice(b"Canon\0");
    data.extend_from_slice(b"Canon EOS 5D Mark III\0");

    // Exif
    data.extend_from_slice(&5_u16.to_le_bytes());
    data.extend_from_slice(&entry(0x829A, 5, 1, 168_u32.to_le_bytes()));
    data.extend_from_slice(&entry(0x9000, 7, 4, *b"0230"));
    data.extend_from_slice(&entry(0x927C, 7, 24, 176_u32.to_le_bytes()));
    data.extend_from_slice(&entry(0x9286, 7, 16, 200_u32.to_le_bytes()));
    data.extend_from_slice(&entry(0xA005, 4, 1, 216_u32.to_le_bytes()));
    data.extend_from_slice(&0_u32.to_le_bytes());

    data.extend_from_slice(&1_u32.to_le_bytes());
    data.extend_from_slice(&640_u32.to_le_bytes());
    data.extend_from_slice(MAKER_NOTE_BLOB);
    data.extend_from_slice(b"ASCII\0\0\0");
    data.extend_from_slice(b"abcd1234");

    // Iop
    data.extend_from_slice(&2_u16.to_le_bytes());
    data.extend_from_slice(&entry(0x0001, 2, 4, *b"R98\0"));
    data.extend_from_slice(&entry(0x0002, 7, 4, *b"0100"));
    data.extend_from_slice(&0_u32.to_le_bytes());

    // GPSInfo
    data.extend_from_slice(&1_u16.to_le_bytes());
    data.extend_from_slice(&entry(0x0000, 1, 4, [2, 2, 0, 0]));
    data.extend_from_slice(&0_u32.to_le_bytes());

    // IFD1
    data.extend_from_slice(&1_u16.to_le_bytes());
    data.extend_from_slice(&entry(0x0103, 3, 1, [6, 0, 0, 0]));
    data.extend_from_slice(&0_u32.to_le_bytes());

    assert_eq!(data.len(), 282);
    data
}

/// Expected visit sequence for [`canon_like_exif`]
pub fn canon_like_lines() -> Vec<String> {
    [
        "IFD-PATH=[IFD] ID=(0x010f) NAME=[Make] COUNT=(6) TYPE=[ASCII] VALUE=[Canon]",
        "IFD-PATH=[IFD] ID=(0x0110) NAME=[Model] COUNT=(22) TYPE=[ASCII] VALUE=[Canon EOS 5D Mark III]",
        "IFD-PATH=[IFD] ID=(0x0112) NAME=[Orientation] COUNT=(1) TYPE=[SHORT] VALUE=[1]",
        "IFD-PATH=[IFD] ID=(0x8769) NAME=[ExifTag] COUNT=(1) TYPE=[LONG] VALUE=[102]",
        "IFD-PATH=[IFD/Exif] ID=(0x829a) NAME=[ExposureTime] COUNT=(1) TYPE=[RATIONAL] VALUE=[1/640]",
        "IFD-PATH=[IFD/Exif] ID=(0x9000) NAME=[ExifVersion] COUNT=(4) TYPE=[UNDEFINED] VALUE=[0230]",
        "IFD-PATH=[IFD/Exif] ID=(0x927c) NAME=[MakerNote] COUNT=(24) TYPE=[UNDEFINED] VALUE=[MakerNote<TYPE-ID=[73 74 72 69 78 2d 6d 61 6b 65 72 6e 6f 74 65 2d 66 69 78 74] LEN=(24) SHA1=[f095315b53babfdfad1df90dc7dc8e0ba5ae7e5a]>]",
        "IFD-PATH=[IFD/Exif] ID=(0x9286) NAME=[UserComment] COUNT=(16) TYPE=[UNDEFINED] VALUE=[UserComment<SIZE=(8) ENCODING=[ASCII] V=[97 98 99 100 49 50 51 52]... LEN=(8)>]",
        "IFD-PATH=[IFD/Exif] ID=(0xa005) NAME=[InteroperabilityTag] COUNT=(1) TYPE=[LONG] VALUE=[216]",
        "IFD-PATH=[IFD/Exif/Iop] ID=(0x0001) NAME=[InteroperabilityIndex] COUNT=(4) TYPE=[ASCII] VALUE=[R98]",
        "IFD-PATH=[IFD/Exif/Iop] ID=(0x0002) NAME=[InteroperabilityVersion] COUNT=(4) TYPE=[UNDEFINED] VALUE=[0100]",
        "IFD-PATH=[IFD] ID=(0x8825) NAME=[GPSTag] COUNT=(1) TYPE=[LONG] VALUE=[246]",
        "IFD-PATH=[IFD/GPSInfo] ID=(0x0000) NAME=[GPSVersionID] COUNT=(4) TYPE=[BYTE] VALUE=[0x02]",
        "IFD-PATH=[IFD] ID=(0x0103) NAME=[Compression] COUNT=(1) TYPE=[SHORT] VALUE=[6]",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Run a visit, rendering one line per entry
///
/// Unknown tags are skipped; an unregistered UNDEFINED decoder renders as
/// `!UNDEFINED!`.
pub fn describe_visit(mapping: &IfdMapping, data: &[u8]) -> Vec<String> {
    let tag_index = TagIndex::new();
    let dispatch = UndefinedDispatch::standard();
    let mut lines = Vec::new();

    visit(IFD_PATH_STANDARD, mapping, data, &mut |path,
                                                  _ifd_index,
                                                  tag,
                                                  tag_type,
                                                  context| {
        let ifd_path = path.stripped();
        let descriptor = match tag_index.get(&ifd_path, tag) {
            Ok(descriptor) => descriptor,
            Err(Error::TagNotFound { .. }) => return Ok(()),
            Err(err) => return Err(err),
        };

        let value = if tag_type == TagType::Undefined {
            match dispatch.decode(context) {
                Ok(value) => value.to_string(),
                Err(Error::UnhandledUndefined { .. }) => String::from("!UNDEFINED!"),
                Err(err) => return Err(err),
            }
        } else {
            context.resolve_as_string(true)?
        };

        lines.push(format!(
            "IFD-PATH=[{ifd_path}] ID=({tag}) NAME=[{}] COUNT=({}) TYPE=[{}] VALUE=[{value}]",
            descriptor.name,
            context.unit_count(),
            tag_type.name()
        ));

        Ok(())
    })
    .unwrap();

    lines
}
