//! Reading API: File, Dataset, and Group handles for reading HDF5 files.

use std::collections::HashMap;

use pmdh5_format::attribute::extract_attributes;
use pmdh5_format::data_layout::DataLayout;
use pmdh5_format::data_read;
use pmdh5_format::dataspace::Dataspace;
use pmdh5_format::datatype::Datatype;
use pmdh5_format::error::FormatError;
use pmdh5_format::group::{self, ObjectKind};
use pmdh5_format::link_message::LinkMessage;
use pmdh5_format::message_type::MessageType;
use pmdh5_format::object_header::{HeaderMessage, ObjectHeader};
use pmdh5_format::signature;
use pmdh5_format::superblock::Superblock;

use crate::error::Error;
use crate::types::{attrs_to_map, classify_datatype, AttrValue, DType};

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// An HDF5 file held in memory for reading.
pub struct File {
    data: Vec<u8>,
    superblock: Superblock,
}

impl File {
    /// Open an HDF5 file by reading it entirely into memory.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// Open an HDF5 file from an in-memory byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        let sig_offset = signature::find_signature(&data)?;
        let superblock = Superblock::parse(&data, sig_offset)?;
        Ok(Self { data, superblock })
    }

    /// Returns a handle to the root group.
    pub fn root(&self) -> Group<'_> {
        Group {
            file: self,
            address: self.superblock.root_group_address,
            path: "/".into(),
        }
    }

    /// Resolve a path and return a `Dataset` handle.
    ///
    /// The path uses `/` separators (e.g., `"data/0/fields/rho"`).
    pub fn dataset(&self, path: &str) -> Result<Dataset<'_>, Error> {
        let addr = group::resolve_path(&self.data, &self.superblock, path)?;
        self.dataset_at(addr, path)
    }

    /// Resolve a path and return a `Group` handle.
    ///
    /// Use `"/"` or `""` for the root group.
    pub fn group(&self, path: &str) -> Result<Group<'_>, Error> {
        let addr = group::resolve_path(&self.data, &self.superblock, path)?;
        self.group_at(addr, path)
    }

    /// Whether anything exists at `path`.
    pub fn exists(&self, path: &str) -> Result<bool, Error> {
        match group::resolve_path(&self.data, &self.superblock, path) {
            Ok(_) => Ok(true),
            Err(FormatError::PathNotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the raw file bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns a reference to the parsed superblock.
    pub fn superblock(&self) -> &Superblock {
        &self.superblock
    }

    fn parse_header(&self, address: u64) -> Result<ObjectHeader, FormatError> {
        ObjectHeader::parse(&self.data, address as usize)
    }

    fn dataset_at(&self, address: u64, path: &str) -> Result<Dataset<'_>, Error> {
        let header = self.parse_header(address)?;
        if group::object_kind(&header) != ObjectKind::Dataset {
            return Err(Error::NotADataset(path.to_string()));
        }
        Ok(Dataset { file: self, header })
    }

    fn group_at(&self, address: u64, path: &str) -> Result<Group<'_>, Error> {
        let header = self.parse_header(address)?;
        if group::object_kind(&header) != ObjectKind::Group {
            return Err(Error::NotAGroup(path.to_string()));
        }
        Ok(Group {
            file: self,
            address,
            path: path.to_string(),
        })
    }

    fn offset_size(&self) -> u8 {
        self.superblock.offset_size
    }

    fn length_size(&self) -> u8 {
        self.superblock.length_size
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("size", &self.data.len())
            .field("superblock_version", &self.superblock.version)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Group handle
// ---------------------------------------------------------------------------

/// A lightweight handle to an HDF5 group.
#[derive(Debug)]
pub struct Group<'f> {
    file: &'f File,
    address: u64,
    path: String,
}

impl<'f> Group<'f> {
    /// Path this handle was opened with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Names of all members in link order.
    pub fn member_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.links()?.into_iter().map(|l| l.name).collect())
    }

    /// List the names of datasets in this group.
    pub fn datasets(&self) -> Result<Vec<String>, Error> {
        self.members_of_kind(ObjectKind::Dataset)
    }

    /// List the names of subgroups in this group.
    pub fn groups(&self) -> Result<Vec<String>, Error> {
        self.members_of_kind(ObjectKind::Group)
    }

    /// Read all attributes of this group.
    pub fn attrs(&self) -> Result<HashMap<String, AttrValue>, Error> {
        let hdr = self.file.parse_header(self.address)?;
        let msgs = extract_attributes(&hdr, self.file.length_size())?;
        Ok(attrs_to_map(&msgs))
    }

    /// Get a dataset within this group by name.
    pub fn dataset(&self, name: &str) -> Result<Dataset<'f>, Error> {
        let addr = self.child_address(name)?;
        self.file.dataset_at(addr, &self.child_path(name))
    }

    /// Get a subgroup within this group by name.
    pub fn group(&self, name: &str) -> Result<Group<'f>, Error> {
        let addr = self.child_address(name)?;
        self.file.group_at(addr, &self.child_path(name))
    }

    fn links(&self) -> Result<Vec<LinkMessage>, Error> {
        let hdr = self.file.parse_header(self.address)?;
        Ok(group::group_links(&hdr, self.file.offset_size())?)
    }

    fn members_of_kind(&self, kind: ObjectKind) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        for link in self.links()? {
            let addr = self.child_address(&link.name)?;
            if group::object_kind(&self.file.parse_header(addr)?) == kind {
                names.push(link.name);
            }
        }
        Ok(names)
    }

    fn child_address(&self, name: &str) -> Result<u64, Error> {
        self.links()?
            .into_iter()
            .find(|l| l.name == name)
            .map(|l| l.object_header_address)
            .ok_or_else(|| FormatError::PathNotFound(self.child_path(name)).into())
    }

    fn child_path(&self, name: &str) -> String {
        format!("{}/{name}", self.path.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Dataset handle
// ---------------------------------------------------------------------------

/// A lightweight handle to an HDF5 dataset.
#[derive(Debug)]
pub struct Dataset<'f> {
    file: &'f File,
    header: ObjectHeader,
}

impl<'f> Dataset<'f> {
    /// Returns the shape (dimensions) of the dataset.
    pub fn shape(&self) -> Result<Vec<u64>, Error> {
        Ok(self.dataspace()?.dimensions)
    }

    /// Returns the simplified datatype of the dataset.
    pub fn dtype(&self) -> Result<DType, Error> {
        Ok(classify_datatype(&self.datatype()?))
    }

    /// Whether raw storage has been written for this dataset.
    ///
    /// Unallocated datasets read back as zeros.
    pub fn is_allocated(&self) -> Result<bool, Error> {
        Ok(match self.data_layout()? {
            DataLayout::Contiguous { address, .. } => address.is_some(),
            DataLayout::Compact { .. } => true,
        })
    }

    /// Read all data as `f64` values.
    pub fn read_f64(&self) -> Result<Vec<f64>, Error> {
        let raw = self.read_raw()?;
        Ok(data_read::read_as_f64(&raw, &self.datatype()?)?)
    }

    /// Read all data as `f32` values.
    pub fn read_f32(&self) -> Result<Vec<f32>, Error> {
        let raw = self.read_raw()?;
        Ok(data_read::read_as_f32(&raw, &self.datatype()?)?)
    }

    /// Read all data as `i64` values.
    pub fn read_i64(&self) -> Result<Vec<i64>, Error> {
        let raw = self.read_raw()?;
        Ok(data_read::read_as_i64(&raw, &self.datatype()?)?)
    }

    /// Read all data as `u64` values.
    pub fn read_u64(&self) -> Result<Vec<u64>, Error> {
        let raw = self.read_raw()?;
        Ok(data_read::read_as_u64(&raw, &self.datatype()?)?)
    }

    /// Read all data as `String` values.
    pub fn read_string(&self) -> Result<Vec<String>, Error> {
        let raw = self.read_raw()?;
        Ok(data_read::read_as_strings(&raw, &self.datatype()?)?)
    }

    /// Read all attributes of this dataset.
    pub fn attrs(&self) -> Result<HashMap<String, AttrValue>, Error> {
        let msgs = extract_attributes(&self.header, self.file.length_size())?;
        Ok(attrs_to_map(&msgs))
    }

    fn datatype(&self) -> Result<Datatype, Error> {
        let msg = find_message(&self.header, MessageType::Datatype)?;
        let (dt, _) = Datatype::parse(&msg.data)?;
        Ok(dt)
    }

    fn dataspace(&self) -> Result<Dataspace, Error> {
        let msg = find_message(&self.header, MessageType::Dataspace)?;
        Ok(Dataspace::parse(&msg.data, self.file.length_size())?)
    }

    fn data_layout(&self) -> Result<DataLayout, Error> {
        let msg = find_message(&self.header, MessageType::DataLayout)?;
        Ok(DataLayout::parse(
            &msg.data,
            self.file.offset_size(),
            self.file.length_size(),
        )?)
    }

    fn read_raw(&self) -> Result<Vec<u8>, Error> {
        Ok(data_read::read_raw_data(
            &self.file.data,
            &self.data_layout()?,
            &self.dataspace()?,
            &self.datatype()?,
        )?)
    }
}

fn find_message(header: &ObjectHeader, msg_type: MessageType) -> Result<&HeaderMessage, Error> {
    header.find(msg_type).ok_or(Error::MissingMessage(msg_type))
}
