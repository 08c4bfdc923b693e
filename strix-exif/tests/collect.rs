mod utils;

use std::rc::Rc;

use strix_exif::error::Error;
use strix_exif::{
    collect, IfdMapping, IfdWalker, Tag, TagIndex, TagValue, TraversalLimits, UndefinedDispatch,
    IFD_PATH_STANDARD, IFD_PATH_STANDARD_EXIF, IFD_PATH_STANDARD_EXIF_IOP, IFD_PATH_STANDARD_GPS,
};
use utils::*;

#[test]
fn tree_shape() {
    let mapping = IfdMapping::with_standard();
    let data = canon_like_exif();

    let (header, index) = collect(&mapping, &data).unwrap();
    assert_eq!(header.first_ifd_offset, 8);

    let root = &index.root_ifd;
    assert_eq!(root.offset, 0x0008);
    assert_eq!(root.id, 0);
    assert!(Rc::ptr_eq(&index.tree[&0], root));

    assert_eq!(index.ifds.len(), 5);
    assert_eq!(index.tree.len(), 5);
    assert_eq!(index.lookup.len(), 4);

    assert_eq!(root.next_ifd_offset, 264);
    let sibling = root.next_ifd.as_ref().unwrap();
    assert_eq!(sibling.offset, root.next_ifd_offset);
    assert_eq!(sibling.next_ifd_offset, 0);
    assert!(sibling.next_ifd.is_none());

    assert_eq!(root.ifd_path, IFD_PATH_STANDARD);
    assert_eq!(root.fq_ifd_path, "IFD0");
    assert_eq!(sibling.ifd_path, IFD_PATH_STANDARD);
    assert_eq!(sibling.fq_ifd_path, "IFD1");
    assert_eq!(sibling.ifd_index, 1);

    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].ifd_path, IFD_PATH_STANDARD_EXIF);
    assert_eq!(root.children[1].ifd_path, IFD_PATH_STANDARD_GPS);
    assert_eq!(root.children[0].children[0].ifd_path, IFD_PATH_STANDARD_EXIF_IOP);
    assert_eq!(root.children[0].children[0].fq_ifd_path, "IFD0/Exif0");
}

#[test]
fn lookup_is_in_discovery_order() {
    let mapping = IfdMapping::with_standard();
    let data = canon_like_exif();

    let (_, index) = collect(&mapping, &data).unwrap();

    assert_eq!(index.lookup[IFD_PATH_STANDARD].len(), 2);
    assert_eq!(index.lookup[IFD_PATH_STANDARD][0].fq_ifd_path, "IFD0");
    assert_eq!(index.lookup[IFD_PATH_STANDARD][1].fq_ifd_path, "IFD1");
    assert_eq!(index.lookup[IFD_PATH_STANDARD_EXIF].len(), 1);
    assert_eq!(index.lookup[IFD_PATH_STANDARD_GPS].len(), 1);
    assert_eq!(index.lookup[IFD_PATH_STANDARD_EXIF_IOP].len(), 1);

    // Every fully-qualified path normalizes back to its lookup key
    for (path, ifds) in &index.lookup {
        for ifd in ifds {
            assert_eq!(&ifd.path.stripped(), path);
        }
    }

    // Discovery numbers are dense and match the flat list
    for (position, ifd) in index.ifds.iter().enumerate() {
        assert_eq!(ifd.id, position);
        assert!(Rc::ptr_eq(&index.tree[&ifd.id], ifd));
    }
}

#[test]
fn entries_are_in_disk_order() {
    let mapping = IfdMapping::with_standard();
    let data = canon_like_exif();

    let (_, index) = collect(&mapping, &data).unwrap();
    let root = &index.root_ifd;

    let tags: Vec<_> = root.entries.iter().map(|e| e.tag_id.0).collect();
    assert_eq!(tags, [0x010F, 0x0110, 0x0112, 0x8769, 0x8825]);

    let exif = &root.children[0];
    let tags: Vec<_> = exif.entries.iter().map(|e| e.tag_id.0).collect();
    assert_eq!(tags, [0x829A, 0x9000, 0x927C, 0x9286, 0xA005]);
}

#[test]
fn child_entries_are_marked() {
    let mapping = IfdMapping::with_standard();
    let data = canon_like_exif();

    let (_, index) = collect(&mapping, &data).unwrap();
    let root = &index.root_ifd;

    let exif_pointers: Vec<_> = root
        .entries
        .iter()
        .filter(|e| e.child_ifd_path.as_deref() == Some(IFD_PATH_STANDARD_EXIF))
        .collect();
    assert_eq!(exif_pointers.len(), 1);
    assert_eq!(exif_pointers[0].tag_id, Tag::EXIF_IFD_POINTER);

    let gps_pointers: Vec<_> = root
        .entries
        .iter()
        .filter(|e| e.child_ifd_path.as_deref() == Some(IFD_PATH_STANDARD_GPS))
        .collect();
    assert_eq!(gps_pointers.len(), 1);
    assert_eq!(gps_pointers[0].tag_id, Tag::GPS_INFO_IFD_POINTER);

    let exif = &root.children[0];
    let iop_pointers: Vec<_> = exif
        .entries
        .iter()
        .filter(|e| e.child_ifd_path.as_deref() == Some(IFD_PATH_STANDARD_EXIF_IOP))
        .collect();
    assert_eq!(iop_pointers.len(), 1);
    assert_eq!(iop_pointers[0].tag_id, Tag::INTEROPERABILITY_IFD_POINTER);

    // Non-pointer entries carry no child path
    assert!(root.entry(Tag(0x010F)).unwrap().child_ifd_path.is_none());
}

#[test]
fn entry_values_decode() {
    let mapping = IfdMapping::with_standard();
    let data = canon_like_exif();

    let (_, index) = collect(&mapping, &data).unwrap();
    let root = &index.root_ifd;

    assert_eq!(
        root.entry(Tag(0x010F)).unwrap().value().unwrap(),
        TagValue::Ascii(String::from("Canon"))
    );

    let exif = &root.children[0];
    let exposure = exif.entry(Tag(0x829A)).unwrap().value().unwrap();
    match exposure {
        TagValue::Rationals(v) => {
            assert_eq!(v.len(), 1);
            assert_eq!(v[0].numerator, 1);
            assert_eq!(v[0].denominator, 640);
        }
        other => panic!("unexpected value: {other:?}"),
    }

    assert_eq!(root.entry(Tag::EXIF_IFD_POINTER).unwrap().value_offset(), 102);
}

#[test]
fn debug_dump_renders_every_entry() {
    let mapping = IfdMapping::with_standard();
    let data = canon_like_exif();

    let (_, index) = collect(&mapping, &data).unwrap();
    let dump = index.debug_dump(&TagIndex::new(), &UndefinedDispatch::standard());

    let lines: Vec<_> = dump.lines().collect();
    assert_eq!(lines.len(), 14);

    // Grouped per IFD in discovery order, unlike the inline visit stream
    assert_eq!(
        lines[3],
        "IFD-PATH=[IFD] ID=(0x8769) NAME=[ExifTag] COUNT=(1) TYPE=[LONG] VALUE=[102]"
    );
    assert_eq!(
        lines[4],
        "IFD-PATH=[IFD] ID=(0x8825) NAME=[GPSTag] COUNT=(1) TYPE=[LONG] VALUE=[246]"
    );
    for line in canon_like_lines() {
        assert!(dump.contains(&line), "missing: {line}");
    }
}

#[test]
fn thumbnail_is_resolved() {
    let mut data = Vec::new();
    data.extend_from_slice(b"II");
    data.extend_from_slice(&[42, 0]);
    data.extend_from_slice(&8_u32.to_le_bytes());
    data.extend_from_slice(&3_u16.to_le_bytes());
    data.extend_from_slice(&entry(0x0103, 3, 1, [6, 0, 0, 0]));
    data.extend_from_slice(&entry(0x0201, 4, 1, 50_u32.to_le_bytes()));
    data.extend_from_slice(&entry(0x0202, 4, 1, 4_u32.to_le_bytes()));
    data.extend_from_slice(&0_u32.to_le_bytes());
    data.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xD9]);

    let mapping = IfdMapping::with_standard();
    let (_, index) = collect(&mapping, &data).unwrap();

    let thumbnail = index.root_ifd.thumbnail_data().unwrap();
    assert_eq!(thumbnail, Some(&[0xFF, 0xD8, 0xFF, 0xD9][..]));

    // Absent pointer tags are not an error
    let canon_data = canon_like_exif();
    let (_, canon) = collect(&mapping, &canon_data).unwrap();
    assert_eq!(canon.root_ifd.thumbnail_data().unwrap(), None);
}

#[test]
fn unreadable_root_is_fatal() {
    let mut data = Vec::new();
    data.extend_from_slice(b"II");
    data.extend_from_slice(&[42, 0]);
    // First-IFD offset far past the end of the payload
    data.extend_from_slice(&0xFFFF_u32.to_le_bytes());

    let mapping = IfdMapping::with_standard();
    assert!(matches!(
        collect(&mapping, &data),
        Err(Error::OutOfBounds { .. })
    ));
}

#[test]
fn entry_cap_is_fatal_for_collect_root() {
    let mapping = IfdMapping::with_standard();
    let data = canon_like_exif();

    let mut walker = IfdWalker::new(&mapping, &data)
        .unwrap()
        .with_limits(TraversalLimits {
            max_depth: 8,
            max_entries_per_ifd: 4,
        });

    assert!(matches!(
        walker.collect(IFD_PATH_STANDARD),
        Err(Error::TooManyEntries { count: 5, limit: 4 })
    ));
}

#[test]
fn unreadable_child_degrades_softly() {
    // ExifTag pointing past the payload: the child IFD cannot be parsed but
    // the root still materializes.
    let mut data = Vec::new();
    data.extend_from_slice(b"II");
    data.extend_from_slice(&[42, 0]);
    data.extend_from_slice(&8_u32.to_le_bytes());
    data.extend_from_slice(&2_u16.to_le_bytes());
    data.extend_from_slice(&entry(0x0103, 3, 1, [6, 0, 0, 0]));
    data.extend_from_slice(&entry(0x8769, 4, 1, 0xFFFF_u32.to_le_bytes()));
    data.extend_from_slice(&0_u32.to_le_bytes());

    let mapping = IfdMapping::with_standard();
    let (_, index) = collect(&mapping, &data).unwrap();

    assert_eq!(index.ifds.len(), 1);
    assert_eq!(index.root_ifd.entries.len(), 2);
    assert!(index.root_ifd.children.is_empty());
    // The pointer entry still records where it would have led
    assert_eq!(
        index.root_ifd.entry(Tag::EXIF_IFD_POINTER).unwrap().child_ifd_path.as_deref(),
        Some(IFD_PATH_STANDARD_EXIF)
    );
}
