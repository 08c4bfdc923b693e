strix_common::utils::convertible_enum!(
    #[repr(u16)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TagType {
        Byte = 1,
        Ascii = 2,
        Short = 3,
        Long = 4,
        Rational = 5,
        Undefined = 7,
        SLong = 9,
        SRational = 10,
    }
);

impl TagType {
    /// Size of one unit in bytes
    pub fn size(self) -> u32 {
        match self {
            Self::Byte | Self::Ascii | Self::Undefined => 1,
            Self::Short => 2,
            Self::Long | Self::SLong => 4,
            Self::Rational | Self::SRational => 8,
            Self::Unknown(_) => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "BYTE",
            Self::Ascii => "ASCII",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Rational => "RATIONAL",
            Self::Undefined => "UNDEFINED",
            Self::SLong => "SLONG",
            Self::SRational => "SRATIONAL",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn u16(self) -> u16 {
        self.into()
    }
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl std::fmt::Display for Rational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl std::fmt::Display for SRational {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A decoded entry value
///
/// One variant per TIFF type. Byte-shaped values borrow from the payload;
/// multi-byte units are decoded into owned sequences because their in-file
/// representation depends on the stream byte order.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue<'a> {
    Bytes(&'a [u8]),
    Ascii(String),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<Rational>),
    Undefined(&'a [u8]),
    SLongs(Vec<i32>),
    SRationals(Vec<SRational>),
}

impl TagValue<'_> {
    /// Render for display
    ///
    /// Units are stringified and joined with a single space. With
    /// `just_first`, multi-unit values show only the first unit; ASCII is
    /// always shown whole. Bytes render as `0x%02x`.
    pub fn render(&self, just_first: bool) -> String {
        match self {
            Self::Ascii(s) => s.clone(),
            Self::Bytes(b) | Self::Undefined(b) => {
                join(b.iter().map(|x| format!("0x{x:02x}")), just_first)
            }
            Self::Shorts(v) => join(v.iter().map(u16::to_string), just_first),
            Self::Longs(v) => join(v.iter().map(u32::to_string), just_first),
            Self::SLongs(v) => join(v.iter().map(i32::to_string), just_first),
            Self::Rationals(v) => join(v.iter().map(Rational::to_string), just_first),
            Self::SRationals(v) => join(v.iter().map(SRational::to_string), just_first),
        }
    }
}

fn join(mut units: impl Iterator<Item = String>, just_first: bool) -> String {
    if just_first {
        units.next().unwrap_or_default()
    } else {
        units.collect::<Vec<_>>().join(" ")
    }
}
