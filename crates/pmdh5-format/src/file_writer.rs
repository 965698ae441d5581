//! HDF5 file creation.
//!
//! Produces a v3 superblock, v2 object headers for every group and dataset
//! of an arbitrarily nested tree, compact links and attributes, and
//! contiguous raw data. The file is laid out as
//!
//! ```text
//! superblock | group headers (pre-order, root first) | dataset headers | raw data
//! ```

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::attribute::AttributeMessage;
use crate::data_layout::DataLayout;
use crate::dataspace::Dataspace;
use crate::datatype::Datatype;
use crate::error::FormatError;
use crate::link_message::{compact_link_info, LinkMessage};
use crate::message_type::MessageType;
use crate::object_header_writer::ObjectHeaderWriter;
use crate::superblock::Superblock;
use crate::type_builders::{build_attr_message, AttrValue, DatasetBuilder, GroupBuilder, Node};

const OFFSET_SIZE: u8 = 8;
const LENGTH_SIZE: u8 = 8;

// Fill value message v3: late space allocation, write fill value if set,
// no fill value defined.
const FILL_VALUE_MESSAGE: [u8; 2] = [3, 0x0a];
// Group info message v0 with default link phase-change thresholds.
const GROUP_INFO_MESSAGE: [u8; 2] = [0, 0];
// Message flag: constant for the lifetime of the object.
const MSG_CONSTANT: u8 = 0x01;

fn build_group_oh(links: &[LinkMessage], attrs: &[AttributeMessage]) -> Result<Vec<u8>, FormatError> {
    let mut w = ObjectHeaderWriter::new();
    w.add_message(MessageType::LinkInfo, compact_link_info());
    w.add_message(MessageType::GroupInfo, GROUP_INFO_MESSAGE.to_vec());
    for link in links {
        w.add_message(MessageType::Link, link.serialize(OFFSET_SIZE));
    }
    for attr in attrs {
        w.add_message(MessageType::Attribute, attr.serialize(LENGTH_SIZE)?);
    }
    w.serialize()
}

fn build_dataset_oh(ds: &FlatDataset, data_addr: Option<u64>) -> Result<Vec<u8>, FormatError> {
    let mut w = ObjectHeaderWriter::new();
    w.add_message_with_flags(MessageType::Datatype, ds.datatype.serialize(), MSG_CONSTANT);
    w.add_message(MessageType::Dataspace, ds.dataspace.serialize(LENGTH_SIZE));
    w.add_message_with_flags(MessageType::FillValue, FILL_VALUE_MESSAGE.to_vec(), MSG_CONSTANT);
    let layout = DataLayout::Contiguous {
        address: data_addr,
        size: ds.storage_size,
    };
    w.add_message(MessageType::DataLayout, layout.serialize());
    for attr in &ds.attrs {
        w.add_message(MessageType::Attribute, attr.serialize(LENGTH_SIZE)?);
    }
    w.serialize()
}

fn attr_messages(attrs: &[(String, AttrValue)]) -> Vec<AttributeMessage> {
    attrs.iter().map(|(n, v)| build_attr_message(n, v)).collect()
}

#[derive(Clone, Copy)]
enum ChildRef {
    Group(usize),
    Dataset(usize),
}

struct FlatGroup {
    attrs: Vec<AttributeMessage>,
    links: Vec<(String, ChildRef)>,
}

struct FlatDataset {
    datatype: Datatype,
    dataspace: Dataspace,
    storage_size: u64,
    /// `None` for unallocated storage.
    raw: Option<Vec<u8>>,
    attrs: Vec<AttributeMessage>,
}

impl FlatDataset {
    fn from_builder(db: DatasetBuilder) -> Result<FlatDataset, FormatError> {
        let datatype = db
            .datatype
            .ok_or_else(|| FormatError::DatasetMissingData(db.name.clone()))?;
        let shape = db.shape.unwrap_or_default();
        let dataspace = Dataspace::simple(&shape);
        let storage_size = dataspace.element_count() * datatype.type_size() as u64;

        let raw = match (db.data, db.unallocated) {
            (Some(raw), _) => {
                if raw.len() as u64 != storage_size {
                    return Err(FormatError::DataSizeMismatch {
                        name: db.name,
                        expected: storage_size,
                        actual: raw.len() as u64,
                    });
                }
                Some(raw)
            }
            (None, true) => None,
            (None, false) => return Err(FormatError::DatasetMissingData(db.name)),
        };

        Ok(FlatDataset {
            datatype,
            dataspace,
            storage_size,
            raw,
            attrs: attr_messages(&db.attrs),
        })
    }

    /// Address recorded in the layout message for raw data placed at `cursor`.
    fn data_address(&self, cursor: u64) -> Option<u64> {
        match &self.raw {
            Some(raw) if !raw.is_empty() => Some(cursor),
            _ => None,
        }
    }
}

/// Flatten `group` and its descendants in pre-order; returns the group's index.
fn flatten(
    group: GroupBuilder,
    groups: &mut Vec<FlatGroup>,
    datasets: &mut Vec<FlatDataset>,
) -> Result<usize, FormatError> {
    let idx = groups.len();
    groups.push(FlatGroup {
        attrs: attr_messages(&group.attrs),
        links: Vec::new(),
    });

    let mut links = Vec::with_capacity(group.children.len());
    for child in group.children {
        match child {
            Node::Group(g) => {
                let name = g.name.clone();
                let child_idx = flatten(g, groups, datasets)?;
                links.push((name, ChildRef::Group(child_idx)));
            }
            Node::Dataset(d) => {
                let name = d.name.clone();
                datasets.push(FlatDataset::from_builder(d)?);
                links.push((name, ChildRef::Dataset(datasets.len() - 1)));
            }
        }
    }
    groups[idx].links = links;
    Ok(idx)
}

/// The main file creation API.
#[derive(Debug, Default)]
pub struct FileWriter {
    root: GroupBuilder,
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root group `/`.
    pub fn root(&self) -> &GroupBuilder {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut GroupBuilder {
        &mut self.root
    }

    pub fn set_root_attr(&mut self, name: &str, value: AttrValue) {
        self.root.set_attr(name, value);
    }

    /// Group at an absolute path, creating missing intermediate groups.
    pub fn require_group(&mut self, path: &str) -> Result<&mut GroupBuilder, FormatError> {
        self.root.require_group(path)
    }

    /// Add a dataset at an absolute path; parent groups are created as needed.
    pub fn create_dataset(&mut self, path: &str) -> Result<&mut DatasetBuilder, FormatError> {
        let trimmed = path.trim_matches('/');
        let (parent, name) = trimmed.rsplit_once('/').unwrap_or(("", trimmed));
        self.root.require_group(parent)?.create_dataset(name)
    }

    /// Serialize the tree to HDF5 bytes.
    pub fn finish(self) -> Result<Vec<u8>, FormatError> {
        let mut groups = Vec::new();
        let mut datasets = Vec::new();
        flatten(self.root, &mut groups, &mut datasets)?;

        // Header sizes do not depend on the addresses they contain, so
        // measure with placeholder addresses first.
        let placeholder_links = |g: &FlatGroup| -> Vec<LinkMessage> {
            g.links.iter().map(|(n, _)| LinkMessage::hard(n, 0)).collect()
        };
        let mut group_sizes = Vec::with_capacity(groups.len());
        for g in &groups {
            group_sizes.push(build_group_oh(&placeholder_links(g), &g.attrs)?.len() as u64);
        }
        let mut dataset_sizes = Vec::with_capacity(datasets.len());
        for d in &datasets {
            dataset_sizes.push(build_dataset_oh(d, d.data_address(0))?.len() as u64);
        }

        let sb_len = Superblock::v3(0, 0).encoded_len() as u64;
        let mut cursor = sb_len;
        let mut place = |size: u64| {
            let addr = cursor;
            cursor += size;
            addr
        };
        let group_addrs: Vec<u64> = group_sizes.iter().map(|&s| place(s)).collect();
        let dataset_addrs: Vec<u64> = dataset_sizes.iter().map(|&s| place(s)).collect();
        let data_addrs: Vec<Option<u64>> = datasets
            .iter()
            .map(|d| {
                let len = d.raw.as_ref().map_or(0, |r| r.len() as u64);
                d.data_address(place(len))
            })
            .collect();
        let eof = cursor;

        let mut buf = Vec::with_capacity(eof as usize);
        buf.extend_from_slice(&Superblock::v3(eof, group_addrs[0]).serialize());

        for g in &groups {
            let links: Vec<LinkMessage> = g
                .links
                .iter()
                .map(|(name, child)| {
                    let addr = match *child {
                        ChildRef::Group(i) => group_addrs[i],
                        ChildRef::Dataset(i) => dataset_addrs[i],
                    };
                    LinkMessage::hard(name, addr)
                })
                .collect();
            buf.extend_from_slice(&build_group_oh(&links, &g.attrs)?);
        }
        for (d, addr) in datasets.iter().zip(&data_addrs) {
            buf.extend_from_slice(&build_dataset_oh(d, *addr)?);
        }
        for d in &datasets {
            if let Some(raw) = &d.raw {
                buf.extend_from_slice(raw);
            }
        }

        debug_assert_eq!(buf.len() as u64, eof);
        Ok(buf)
    }
}
