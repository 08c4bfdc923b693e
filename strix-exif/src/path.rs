//! IFD naming
//!
//! The same tag ID means different things under different IFDs, so every
//! entry is addressed by the path of the directory it lives in. Paths come in
//! two renderings: fully-qualified with a sibling index on each component
//! (`IFD0/Exif0`, `IFD1`) and stripped (`IFD/Exif`). The stripped form is the
//! comparator used by the tag dictionary and the lookup index.

use crate::error::{Error, Result, ResultExt};
use crate::tags::Tag;

pub const IFD_PATH_STANDARD: &str = "IFD";
pub const IFD_PATH_STANDARD_EXIF: &str = "IFD/Exif";
pub const IFD_PATH_STANDARD_EXIF_IOP: &str = "IFD/Exif/Iop";
pub const IFD_PATH_STANDARD_GPS: &str = "IFD/GPSInfo";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IfdPathSegment {
    pub name: String,
    /// Position among same-named siblings at this level
    pub index: u32,
}

/// Structured IFD path
///
/// Kept as a sequence of `(name, sibling index)` pairs; the two string forms
/// are renderings, never parsed back.
///
/// ```
/// # use strix_exif::IfdPath;
/// let path = IfdPath::root("IFD").child("Exif", 0);
/// assert_eq!(path.fq(), "IFD0/Exif0");
/// assert_eq!(path.stripped(), "IFD/Exif");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IfdPath(Vec<IfdPathSegment>);

impl IfdPath {
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![IfdPathSegment {
            name: name.into(),
            index: 0,
        }])
    }

    pub fn child(&self, name: impl Into<String>, index: u32) -> Self {
        let mut segments = self.0.clone();
        segments.push(IfdPathSegment {
            name: name.into(),
            index,
        });
        Self(segments)
    }

    /// Same path addressing the next sibling of the leaf
    pub fn next_sibling(&self) -> Self {
        let mut segments = self.0.clone();
        if let Some(leaf) = segments.last_mut() {
            leaf.index += 1;
        }
        Self(segments)
    }

    pub fn segments(&self) -> &[IfdPathSegment] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn leaf_name(&self) -> &str {
        &self.0[self.0.len() - 1].name
    }

    pub fn leaf_index(&self) -> u32 {
        self.0[self.0.len() - 1].index
    }

    /// Fully-qualified rendering, e.g. `IFD0/Exif0`
    pub fn fq(&self) -> String {
        let parts: Vec<_> = self
            .0
            .iter()
            .map(|s| format!("{}{}", s.name, s.index))
            .collect();
        parts.join("/")
    }

    /// Index-free rendering, e.g. `IFD/Exif`
    pub fn stripped(&self) -> String {
        let parts: Vec<_> = self.0.iter().map(|s| s.name.as_str()).collect();
        parts.join("/")
    }
}

impl std::fmt::Display for IfdPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.fq())
    }
}

#[derive(Debug, Clone)]
struct IfdNode {
    name: String,
    children: Vec<(Tag, IfdNode)>,
}

impl IfdNode {
    fn child_by_name(&self, name: &str) -> Option<&IfdNode> {
        self.children
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(_, node)| node)
    }
}

/// Tree of known IFD names
///
/// Edges are labeled with the parent tag ID that nests the child, so the
/// traversal can recognize sub-IFD pointer entries. Top-level IFDs hang off
/// the unnamed root under the pseudo tag `0`.
#[derive(Debug, Clone)]
pub struct IfdMapping {
    root: IfdNode,
}

impl IfdMapping {
    pub fn new() -> Self {
        Self {
            root: IfdNode {
                name: String::new(),
                children: Vec::new(),
            },
        }
    }

    /// Mapping preloaded with `IFD` → {`Exif` → {`Iop`}, `GPSInfo`}
    pub fn with_standard() -> Self {
        let mut mapping = Self::new();

        // The preload covers the known tree, so none of these can fail.
        let standard = [
            ("", Tag(0), "IFD"),
            (IFD_PATH_STANDARD, Tag::EXIF_IFD_POINTER, "Exif"),
            (IFD_PATH_STANDARD, Tag::GPS_INFO_IFD_POINTER, "GPSInfo"),
            (
                IFD_PATH_STANDARD_EXIF,
                Tag::INTEROPERABILITY_IFD_POINTER,
                "Iop",
            ),
        ];
        for (parent, tag, name) in standard {
            mapping
                .add_child(parent, tag, name)
                .expect("standard mapping is self-consistent");
        }

        mapping
    }

    /// Register `name` as a sub-IFD of `parent_path`, nested via `tag_id`
    ///
    /// `parent_path` is a stripped path; the empty string addresses the root,
    /// making `name` a new top-level IFD.
    pub fn add_child(&mut self, parent_path: &str, tag_id: Tag, name: &str) -> Result<()> {
        let parent = self
            .node_mut(parent_path)
            .e(Error::IfdNotFound(parent_path.to_owned()))?;
        parent.children.push((
            tag_id,
            IfdNode {
                name: name.to_owned(),
                children: Vec::new(),
            },
        ));
        Ok(())
    }

    /// Name of the sub-IFD that `tag_id` nests under `parent_path`, if any
    pub fn child_of(&self, parent_path: &str, tag_id: Tag) -> Option<&str> {
        let parent = self.node(parent_path)?;
        parent
            .children
            .iter()
            .find(|(tag, _)| *tag == tag_id)
            .map(|(_, node)| node.name.as_str())
    }

    /// Whether a stripped path names a known IFD
    pub fn contains(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    fn node(&self, path: &str) -> Option<&IfdNode> {
        let mut node = &self.root;
        if path.is_empty() {
            return Some(node);
        }
        for name in path.split('/') {
            node = node.child_by_name(name)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &str) -> Option<&mut IfdNode> {
        let mut node = &mut self.root;
        if path.is_empty() {
            return Some(node);
        }
        for name in path.split('/') {
            node = node
                .children
                .iter_mut()
                .find(|(_, child)| child.name == name)
                .map(|(_, child)| child)?;
        }
        Some(node)
    }
}

impl Default for IfdMapping {
    fn default() -> Self {
        Self::new()
    }
}
