use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::header::ExifHeader;
use crate::path::{IfdMapping, IfdPath, IFD_PATH_STANDARD};
use crate::raw::{ByteOrder, Raw};
use crate::tags::{Tag, TagIndex};
use crate::types::{TagType, TagValue};
use crate::undefined::UndefinedDispatch;
use crate::value::ValueContext;
use crate::walk::{IfdWalker, ParsedIfd};

/// One materialized directory entry
///
/// Borrows from the TIFF payload; the payload must outlive the index.
#[derive(Debug, Clone)]
pub struct IfdTagEntry<'a> {
    pub tag_id: Tag,
    pub tag_type: TagType,
    pub unit_count: u32,
    /// The 4-byte value-or-offset field as it appears on disk
    pub raw_value_offset: [u8; 4],
    /// Stripped path of the owning IFD
    pub ifd_path: String,
    /// Stripped path of the sub-IFD this entry points to, if the IFD mapping
    /// registers its tag as a child edge
    pub child_ifd_path: Option<String>,
    value_field_offset: u32,
    byte_order: ByteOrder,
    payload: &'a [u8],
}

impl<'a> IfdTagEntry<'a> {
    pub fn value_context(&self) -> ValueContext<'a> {
        ValueContext::new(
            self.ifd_path.clone(),
            self.tag_id,
            self.tag_type,
            self.unit_count,
            self.raw_value_offset,
            self.value_field_offset,
            self.byte_order,
            self.payload,
        )
    }

    pub fn value(&self) -> Result<TagValue<'a>> {
        self.value_context().values()
    }

    /// The 4-byte field decoded as an offset
    pub fn value_offset(&self) -> u32 {
        self.byte_order.u32_from(self.raw_value_offset)
    }

    /// Single-unit SHORT/LONG value, `None` for any other shape
    fn u32_value(&self) -> Result<Option<u32>> {
        Ok(match self.value()? {
            TagValue::Longs(v) if v.len() == 1 => Some(v[0]),
            TagValue::Shorts(v) if v.len() == 1 => Some(v[0].into()),
            _ => None,
        })
    }
}

/// One materialized IFD
///
/// Root IFDs form a linked list through `next_ifd`; sub-IFDs hang off
/// `children` in the encounter order of their pointer entries.
#[derive(Debug)]
pub struct Ifd<'a> {
    /// Discovery number, 0 for the root
    pub id: usize,
    pub path: IfdPath,
    /// Stripped path, e.g. `IFD/Exif`
    pub ifd_path: String,
    /// Fully-qualified path, e.g. `IFD0/Exif0`
    pub fq_ifd_path: String,
    /// Position among same-named siblings
    pub ifd_index: u32,
    pub byte_order: ByteOrder,
    /// Offset within the TIFF payload
    pub offset: u32,
    /// Entries in on-disk order
    pub entries: Vec<IfdTagEntry<'a>>,
    pub children: Vec<Rc<Ifd<'a>>>,
    pub next_ifd_offset: u32,
    pub next_ifd: Option<Rc<Ifd<'a>>>,
}

impl<'a> Ifd<'a> {
    /// First entry carrying `tag`, in on-disk order
    pub fn entry(&self, tag: Tag) -> Option<&IfdTagEntry<'a>> {
        self.entries.iter().find(|e| e.tag_id == tag)
    }

    pub fn entries_with_tag(&self, tag: Tag) -> impl Iterator<Item = &IfdTagEntry<'a>> {
        self.entries.iter().filter(move |e| e.tag_id == tag)
    }

    /// The embedded thumbnail referenced by this IFD, if any
    ///
    /// Resolves `JPEGInterchangeFormat`/`JPEGInterchangeFormatLength` into a
    /// slice of the payload. Thumbnails conventionally live in the second
    /// root IFD.
    pub fn thumbnail_data(&self) -> Result<Option<&'a [u8]>> {
        let Some(offset_entry) = self.entry(Tag::JPEG_INTERCHANGE_FORMAT) else {
            return Ok(None);
        };
        let Some(len_entry) = self.entry(Tag::JPEG_INTERCHANGE_FORMAT_LENGTH) else {
            return Ok(None);
        };

        let (Some(offset), Some(len)) = (offset_entry.u32_value()?, len_entry.u32_value()?)
        else {
            return Ok(None);
        };

        Raw::new(self.byte_order, offset_entry.payload)
            .slice_at(offset, len)
            .map(Some)
    }
}

/// Everything [`collect`] discovers in one walk
#[derive(Debug)]
pub struct IfdIndex<'a> {
    pub root_ifd: Rc<Ifd<'a>>,
    /// Every IFD exactly once, in discovery order
    pub ifds: Vec<Rc<Ifd<'a>>>,
    /// Discovery number → IFD
    pub tree: BTreeMap<usize, Rc<Ifd<'a>>>,
    /// Stripped path → IFDs at that path, in discovery order
    pub lookup: HashMap<String, Vec<Rc<Ifd<'a>>>>,
}

impl IfdIndex<'_> {
    /// Render every entry as one line, resolving names through `tag_index`
    /// and UNDEFINED values through `dispatch`
    pub fn debug_dump(&self, tag_index: &TagIndex, dispatch: &UndefinedDispatch) -> String {
        let mut out = String::new();

        for ifd in &self.ifds {
            for entry in &ifd.entries {
                let context = entry.value_context();
                let name = tag_index
                    .get(&entry.ifd_path, entry.tag_id)
                    .map(|d| d.name)
                    .unwrap_or("Unknown");

                let value = if entry.tag_type == TagType::Undefined {
                    dispatch
                        .decode(&context)
                        .map(|v| v.to_string())
                        .unwrap_or_else(|_| String::from("!UNDEFINED!"))
                } else {
                    context
                        .resolve_as_string(true)
                        .unwrap_or_else(|err| format!("!{err}!"))
                };

                out.push_str(&format!(
                    "IFD-PATH=[{}] ID=({}) NAME=[{}] COUNT=({}) TYPE=[{}] VALUE=[{}]\n",
                    entry.ifd_path,
                    entry.tag_id,
                    name,
                    entry.unit_count,
                    entry.tag_type.name(),
                    value
                ));
            }
        }

        out
    }
}

impl<'a> IfdWalker<'a> {
    /// Materialize the IFD tree and its flat lookup index
    pub fn collect(&mut self, root_ifd_name: &str) -> Result<IfdIndex<'a>> {
        if !self.mapping.contains(root_ifd_name) {
            return Err(Error::IfdNotFound(root_ifd_name.to_owned()));
        }

        self.visited.clear();

        let path = IfdPath::root(root_ifd_name);
        let offset = self.header.first_ifd_offset;
        let mut counter = 0;

        // The root directory must parse; everything below degrades softly,
        // exactly as in visit().
        self.enter_ifd(offset, &path);
        let parsed = self.parse_ifd(&path, offset)?;
        let root_ifd = self.build_ifd(parsed, path, &mut counter)?;

        let mut index = IfdIndex {
            root_ifd: root_ifd.clone(),
            ifds: Vec::new(),
            tree: BTreeMap::new(),
            lookup: HashMap::new(),
        };
        register(&root_ifd, &mut index);

        Ok(index)
    }

    fn collect_link(
        &mut self,
        path: IfdPath,
        offset: u32,
        counter: &mut usize,
    ) -> Result<Option<Rc<Ifd<'a>>>> {
        if !self.enter_ifd(offset, &path) {
            return Ok(None);
        }

        let parsed = match self.parse_ifd(&path, offset) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("Skipping unreadable directory [{path}]: {err}");
                return Ok(None);
            }
        };

        self.build_ifd(parsed, path, counter).map(Some)
    }

    fn build_ifd(
        &mut self,
        parsed: ParsedIfd,
        path: IfdPath,
        counter: &mut usize,
    ) -> Result<Rc<Ifd<'a>>> {
        let id = *counter;
        *counter += 1;

        let stripped = path.stripped();
        let mut entries = Vec::with_capacity(parsed.entries.len());
        let mut children = Vec::new();

        for entry in parsed.entries {
            if let Some(child_name) = &entry.child_ifd_name {
                let child_offset = self.header.byte_order.u32_from(entry.raw_value_offset);
                let child_path = path.child(child_name.as_str(), 0);
                if let Some(child) = self.collect_link(child_path, child_offset, counter)? {
                    children.push(child);
                }
            }

            entries.push(IfdTagEntry {
                tag_id: entry.tag_id,
                tag_type: entry.tag_type,
                unit_count: entry.unit_count,
                raw_value_offset: entry.raw_value_offset,
                ifd_path: stripped.clone(),
                child_ifd_path: entry
                    .child_ifd_name
                    .as_deref()
                    .map(|name| format!("{stripped}/{name}")),
                value_field_offset: entry.value_field_offset,
                byte_order: self.header.byte_order,
                payload: self.payload,
            });
        }

        let next_ifd = if parsed.next_ifd_offset != 0 {
            self.collect_link(path.next_sibling(), parsed.next_ifd_offset, counter)?
        } else {
            None
        };

        Ok(Rc::new(Ifd {
            id,
            ifd_path: stripped,
            fq_ifd_path: path.fq(),
            ifd_index: path.leaf_index(),
            byte_order: self.header.byte_order,
            offset: parsed.offset,
            entries,
            children,
            next_ifd_offset: parsed.next_ifd_offset,
            next_ifd,
            path,
        }))
    }
}

fn register<'a>(ifd: &Rc<Ifd<'a>>, index: &mut IfdIndex<'a>) {
    index.ifds.push(ifd.clone());
    index.tree.insert(ifd.id, ifd.clone());
    index
        .lookup
        .entry(ifd.ifd_path.clone())
        .or_default()
        .push(ifd.clone());

    for child in &ifd.children {
        register(child, index);
    }
    if let Some(next) = &ifd.next_ifd {
        register(next, index);
    }
}

/// Walk the Exif data and materialize the [`IfdIndex`]
///
/// Convenience wrapper around [`IfdWalker`] with default limits, rooted at
/// the standard `IFD`.
pub fn collect<'a>(
    mapping: &'a IfdMapping,
    exif_data: &'a [u8],
) -> Result<(ExifHeader, IfdIndex<'a>)> {
    let mut walker = IfdWalker::new(mapping, exif_data)?;
    let index = walker.collect(IFD_PATH_STANDARD)?;
    Ok((walker.header(), index))
}
