use std::collections::HashSet;

use strix_common::math::U32Ext;

use crate::error::{Error, Result};
use crate::header::{parse_exif_header, trim_exif_lead_in, ExifHeader};
use crate::path::{IfdMapping, IfdPath};
use crate::raw::Raw;
use crate::tags::Tag;
use crate::types::TagType;
use crate::value::ValueContext;

/// Bounds on the work a single parse may do
///
/// The format itself does not bound directory size or nesting, so both caps
/// are configurable. Real files occasionally exceed 256 entries; raise the
/// cap for those rather than trusting arbitrary counts from a corrupt file.
#[derive(Debug, Clone, Copy)]
pub struct TraversalLimits {
    pub max_depth: usize,
    pub max_entries_per_ifd: u16,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_entries_per_ifd: 256,
        }
    }
}

pub(crate) struct ParsedEntry {
    pub tag_id: Tag,
    pub tag_type: TagType,
    pub unit_count: u32,
    pub raw_value_offset: [u8; 4],
    pub value_field_offset: u32,
    pub child_ifd_name: Option<String>,
}

pub(crate) struct ParsedIfd {
    pub offset: u32,
    pub entries: Vec<ParsedEntry>,
    pub next_ifd_offset: u32,
}

/// Depth-first walk over the IFD chain of one TIFF stream
///
/// The walker degrades gracefully on malformed input: entries with unknown
/// types or out-of-range offsets are skipped, directories that revisit an
/// offset or blow a [`TraversalLimits`] cap abort only their own branch. A
/// header that does not parse, and any error returned by a visitor, abort
/// the whole walk.
pub struct IfdWalker<'a> {
    pub(crate) mapping: &'a IfdMapping,
    pub(crate) payload: &'a [u8],
    pub(crate) header: ExifHeader,
    pub(crate) limits: TraversalLimits,
    pub(crate) visited: HashSet<(u32, String)>,
}

impl<'a> IfdWalker<'a> {
    /// Parse the TIFF preamble of `exif_data` and prepare a walk
    ///
    /// `exif_data` may start with the `Exif\0\0` lead-in or with the bare
    /// preamble; offsets are interpreted from the byte-order mark onward.
    pub fn new(mapping: &'a IfdMapping, exif_data: &'a [u8]) -> Result<Self> {
        let payload = trim_exif_lead_in(exif_data);
        let header = parse_exif_header(payload)?;

        Ok(Self {
            mapping,
            payload,
            header,
            limits: TraversalLimits::default(),
            visited: HashSet::new(),
        })
    }

    pub fn with_limits(mut self, limits: TraversalLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn header(&self) -> ExifHeader {
        self.header
    }

    /// Stream every entry to `visitor` in on-disk order
    ///
    /// The visitor receives the fully-qualified path of the owning IFD, the
    /// IFD's sibling index, the tag ID, the on-wire tag type, and the value
    /// context. Sub-IFD entries are emitted inline, right after the pointer
    /// entry that nests them.
    pub fn visit<V>(&mut self, root_ifd_name: &str, visitor: &mut V) -> Result<()>
    where
        V: FnMut(&IfdPath, u32, Tag, TagType, &ValueContext<'a>) -> Result<()>,
    {
        if !self.mapping.contains(root_ifd_name) {
            return Err(Error::IfdNotFound(root_ifd_name.to_owned()));
        }

        self.visited.clear();
        self.visit_chain(
            IfdPath::root(root_ifd_name),
            self.header.first_ifd_offset,
            visitor,
        )
    }

    fn visit_chain<V>(&mut self, mut path: IfdPath, mut offset: u32, visitor: &mut V) -> Result<()>
    where
        V: FnMut(&IfdPath, u32, Tag, TagType, &ValueContext<'a>) -> Result<()>,
    {
        loop {
            if !self.enter_ifd(offset, &path) {
                return Ok(());
            }

            let parsed = match self.parse_ifd(&path, offset) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::warn!("Skipping unreadable directory [{path}]: {err}");
                    return Ok(());
                }
            };

            let stripped = path.stripped();
            for entry in &parsed.entries {
                let context = ValueContext::new(
                    stripped.clone(),
                    entry.tag_id,
                    entry.tag_type,
                    entry.unit_count,
                    entry.raw_value_offset,
                    entry.value_field_offset,
                    self.header.byte_order,
                    self.payload,
                );

                visitor(&path, path.leaf_index(), entry.tag_id, entry.tag_type, &context)?;

                if let Some(child_name) = &entry.child_ifd_name {
                    let child_offset = self.header.byte_order.u32_from(entry.raw_value_offset);
                    self.visit_chain(path.child(child_name.as_str(), 0), child_offset, visitor)?;
                }
            }

            if parsed.next_ifd_offset == 0 {
                return Ok(());
            }
            offset = parsed.next_ifd_offset;
            path = path.next_sibling();
        }
    }

    /// Guard one directory visit; false aborts the branch
    pub(crate) fn enter_ifd(&mut self, offset: u32, path: &IfdPath) -> bool {
        if path.depth() > self.limits.max_depth {
            let err = Error::MaxDepthExceeded {
                limit: self.limits.max_depth,
            };
            tracing::warn!("Abandoning [{path}]: {err}");
            return false;
        }

        if !self.visited.insert((offset, path.leaf_name().to_owned())) {
            let err = Error::CycleDetected {
                offset,
                ifd_name: path.leaf_name().to_owned(),
            };
            tracing::warn!("Abandoning [{path}]: {err}");
            return false;
        }

        true
    }

    /// Read one directory: entry count, the 12-byte entry records, and the
    /// trailing next-IFD offset
    ///
    /// Entries with an unknown type code, an overflowing data size, or an
    /// out-of-range offset are dropped here with a warning; both traversal
    /// engines therefore agree on what survives.
    pub(crate) fn parse_ifd(&self, path: &IfdPath, offset: u32) -> Result<ParsedIfd> {
        let mut raw = Raw::new(self.header.byte_order, self.payload);
        raw.seek_start(offset)?;

        let count = raw.read_u16()?;
        if count > self.limits.max_entries_per_ifd {
            return Err(Error::TooManyEntries {
                count,
                limit: self.limits.max_entries_per_ifd,
            });
        }

        tracing::debug!("Reading [{path}] with {count} entries at 0x{offset:08x}");

        let stripped = path.stripped();
        let mut entries = Vec::with_capacity(count.into());

        for _ in 0..count {
            let value_field_offset = raw.position().safe_add(8)?;
            let tag_id = Tag(raw.read_u16()?);
            let tag_type = TagType::from(raw.read_u16()?);
            let unit_count = raw.read_u32()?;
            let raw_value_offset = raw.read_exact::<4>()?;

            if let TagType::Unknown(code) = tag_type {
                tracing::warn!(
                    "Skipping tag {tag_id} in [{path}]: {}",
                    Error::UnknownTagType(code)
                );
                continue;
            }

            let Ok(data_len) = unit_count.safe_mul(tag_type.size()) else {
                tracing::warn!("Skipping tag {tag_id} in [{path}]: data size overflows");
                continue;
            };

            if data_len > 4 {
                let value_offset = self.header.byte_order.u32_from(raw_value_offset);
                let in_bounds = value_offset
                    .safe_add(data_len)
                    .is_ok_and(|end| end.usize() <= self.payload.len());
                if !in_bounds {
                    let err = Error::OutOfBounds {
                        offset: value_offset,
                        len: data_len,
                        payload_len: self.payload.len(),
                    };
                    tracing::warn!("Skipping tag {tag_id} in [{path}]: {err}");
                    continue;
                }
            }

            entries.push(ParsedEntry {
                tag_id,
                tag_type,
                unit_count,
                raw_value_offset,
                value_field_offset,
                child_ifd_name: self.mapping.child_of(&stripped, tag_id).map(str::to_owned),
            });
        }

        let next_ifd_offset = raw.read_u32()?;

        Ok(ParsedIfd {
            offset,
            entries,
            next_ifd_offset,
        })
    }
}

/// Walk the Exif data, streaming every entry to `visitor`
///
/// Convenience wrapper around [`IfdWalker`] with default limits; returns the
/// decoded header. `root_ifd_name` is normally
/// [`crate::IFD_PATH_STANDARD`].
pub fn visit<'a, V>(
    root_ifd_name: &str,
    mapping: &'a IfdMapping,
    exif_data: &'a [u8],
    visitor: &mut V,
) -> Result<ExifHeader>
where
    V: FnMut(&IfdPath, u32, Tag, TagType, &ValueContext<'a>) -> Result<()>,
{
    let mut walker = IfdWalker::new(mapping, exif_data)?;
    walker.visit(root_ifd_name, visitor)?;
    Ok(walker.header())
}
