//! In-memory tree of groups, datasets and attributes awaiting serialization.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

use crate::attribute::AttributeMessage;
use crate::dataspace::Dataspace;
use crate::datatype::{CharacterSet, Datatype};
use crate::error::FormatError;
use crate::link_message::validate_link_name;

/// Attribute values accepted by the write API.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    F64(f64),
    F64Array(Vec<f64>),
    I64(i64),
    I64Array(Vec<i64>),
    U64(u64),
    String(String),
    StringArray(Vec<String>),
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::F64(v)
    }
}

impl From<&[f64]> for AttrValue {
    fn from(v: &[f64]) -> Self {
        AttrValue::F64Array(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for AttrValue {
    fn from(v: [f64; N]) -> Self {
        AttrValue::F64Array(v.to_vec())
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::I64(v)
    }
}

impl From<u64> for AttrValue {
    fn from(v: u64) -> Self {
        AttrValue::U64(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.into())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

fn le_bytes<T, const N: usize>(values: &[T], f: impl Fn(&T) -> [u8; N]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(values.len() * N);
    for v in values {
        raw.extend_from_slice(&f(v));
    }
    raw
}

/// Pack strings as null-padded fixed-length elements.
///
/// Element size is the longest string, at least one byte since HDF5
/// rejects zero-sized string types.
fn fixed_strings(values: &[&str]) -> (Datatype, Vec<u8>) {
    let size = values.iter().map(|s| s.len()).max().unwrap_or(0).max(1);
    let charset = if values.iter().all(|s| s.is_ascii()) {
        CharacterSet::Ascii
    } else {
        CharacterSet::Utf8
    };
    let mut raw = Vec::with_capacity(size * values.len());
    for s in values {
        raw.extend_from_slice(s.as_bytes());
        raw.resize(raw.len() + size - s.len(), 0);
    }
    (Datatype::fixed_string(size as u32, charset), raw)
}

/// Encode a named value as an attribute message.
pub fn build_attr_message(name: &str, value: &AttrValue) -> AttributeMessage {
    let (datatype, dataspace, raw_data) = match value {
        AttrValue::F64(v) => (Datatype::f64(), Dataspace::scalar(), v.to_le_bytes().to_vec()),
        AttrValue::F64Array(arr) => (
            Datatype::f64(),
            Dataspace::simple(&[arr.len() as u64]),
            le_bytes(arr, |v| v.to_le_bytes()),
        ),
        AttrValue::I64(v) => (
            Datatype::integer(8, true),
            Dataspace::scalar(),
            v.to_le_bytes().to_vec(),
        ),
        AttrValue::I64Array(arr) => (
            Datatype::integer(8, true),
            Dataspace::simple(&[arr.len() as u64]),
            le_bytes(arr, |v| v.to_le_bytes()),
        ),
        AttrValue::U64(v) => (
            Datatype::integer(8, false),
            Dataspace::scalar(),
            v.to_le_bytes().to_vec(),
        ),
        AttrValue::String(s) => {
            let (dt, raw) = fixed_strings(&[s.as_str()]);
            (dt, Dataspace::scalar(), raw)
        }
        AttrValue::StringArray(arr) => {
            let refs: Vec<&str> = arr.iter().map(String::as_str).collect();
            let (dt, raw) = fixed_strings(&refs);
            (dt, Dataspace::simple(&[arr.len() as u64]), raw)
        }
    };
    AttributeMessage {
        name: name.into(),
        datatype,
        dataspace,
        raw_data,
    }
}

fn upsert_attr(attrs: &mut Vec<(String, AttrValue)>, name: &str, value: AttrValue) {
    match attrs.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => attrs.push((name.into(), value)),
    }
}

/// Builder for one dataset.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    pub(crate) name: String,
    pub(crate) datatype: Option<Datatype>,
    pub(crate) shape: Option<Vec<u64>>,
    pub(crate) data: Option<Vec<u8>>,
    pub(crate) unallocated: bool,
    pub(crate) attrs: Vec<(String, AttrValue)>,
}

impl DatasetBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            datatype: None,
            shape: None,
            data: None,
            unallocated: false,
            attrs: Vec::new(),
        }
    }

    fn set_data(&mut self, datatype: Datatype, raw: Vec<u8>, len: usize) -> &mut Self {
        self.datatype = Some(datatype);
        self.data = Some(raw);
        self.unallocated = false;
        if self.shape.is_none() {
            self.shape = Some(vec![len as u64]);
        }
        self
    }

    pub fn with_f64_data(&mut self, data: &[f64]) -> &mut Self {
        self.set_data(Datatype::f64(), le_bytes(data, |v| v.to_le_bytes()), data.len())
    }

    pub fn with_f32_data(&mut self, data: &[f32]) -> &mut Self {
        self.set_data(Datatype::f32(), le_bytes(data, |v| v.to_le_bytes()), data.len())
    }

    pub fn with_i64_data(&mut self, data: &[i64]) -> &mut Self {
        self.set_data(Datatype::integer(8, true), le_bytes(data, |v| v.to_le_bytes()), data.len())
    }

    pub fn with_u64_data(&mut self, data: &[u64]) -> &mut Self {
        self.set_data(Datatype::integer(8, false), le_bytes(data, |v| v.to_le_bytes()), data.len())
    }

    /// Declare a dataset whose storage is never written.
    ///
    /// The layout records an undefined address, so readers see the
    /// default fill value (zero) for every element.
    pub fn with_unallocated(&mut self, datatype: Datatype, shape: &[u64]) -> &mut Self {
        self.datatype = Some(datatype);
        self.shape = Some(shape.to_vec());
        self.data = None;
        self.unallocated = true;
        self
    }

    /// Set the shape. Element count must match the data at finish time.
    pub fn with_shape(&mut self, shape: &[u64]) -> &mut Self {
        self.shape = Some(shape.to_vec());
        self
    }

    /// Set an attribute, replacing an earlier value of the same name.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) -> &mut Self {
        upsert_attr(&mut self.attrs, name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> Option<&[u64]> {
        self.shape.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// A child of a group.
#[derive(Debug, Clone)]
pub enum Node {
    Group(GroupBuilder),
    Dataset(DatasetBuilder),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Group(g) => &g.name,
            Node::Dataset(d) => &d.name,
        }
    }
}

/// Builder for a group and everything below it.
#[derive(Debug, Clone, Default)]
pub struct GroupBuilder {
    pub(crate) name: String,
    pub(crate) attrs: Vec<(String, AttrValue)>,
    pub(crate) children: Vec<Node>,
}

impl GroupBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set an attribute, replacing an earlier value of the same name.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) -> &mut Self {
        upsert_attr(&mut self.attrs, name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Child group `name`, created if absent.
    ///
    /// Fails with `DuplicateLink` when a dataset already uses the name.
    pub fn create_group(&mut self, name: &str) -> Result<&mut GroupBuilder, FormatError> {
        validate_link_name(name)?;
        let idx = match self.children.iter().position(|c| c.name() == name) {
            Some(idx) => idx,
            None => {
                self.children.push(Node::Group(GroupBuilder::new(name)));
                self.children.len() - 1
            }
        };
        match &mut self.children[idx] {
            Node::Group(g) => Ok(g),
            Node::Dataset(_) => Err(FormatError::DuplicateLink(name.into())),
        }
    }

    /// Walk a `/`-separated path below this group, creating missing groups.
    pub fn require_group(&mut self, path: &str) -> Result<&mut GroupBuilder, FormatError> {
        let mut current = self;
        for component in path.split('/').filter(|c| !c.is_empty()) {
            current = current.create_group(component)?;
        }
        Ok(current)
    }

    /// Add a dataset. Fails with `DuplicateLink` if the name is taken.
    pub fn create_dataset(&mut self, name: &str) -> Result<&mut DatasetBuilder, FormatError> {
        validate_link_name(name)?;
        if self.contains(name) {
            return Err(FormatError::DuplicateLink(name.into()));
        }
        self.children.push(Node::Dataset(DatasetBuilder::new(name)));
        match self.children.last_mut() {
            Some(Node::Dataset(d)) => Ok(d),
            _ => Err(FormatError::DuplicateLink(name.into())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name() == name)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Existing group at a `/`-separated path below this one.
    pub fn group(&self, path: &str) -> Option<&GroupBuilder> {
        let mut current = self;
        for component in path.split('/').filter(|c| !c.is_empty()) {
            current = current.children.iter().find_map(|c| match c {
                Node::Group(g) if g.name == component => Some(g),
                _ => None,
            })?;
        }
        Some(current)
    }

    /// Existing dataset at a `/`-separated path below this group.
    pub fn dataset(&self, path: &str) -> Option<&DatasetBuilder> {
        let (parent, name) = match path.trim_end_matches('/').rsplit_once('/') {
            Some((parent, name)) => (self.group(parent)?, name),
            None => (self, path),
        };
        parent.children.iter().find_map(|c| match c {
            Node::Dataset(d) if d.name == name => Some(d),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::StringPadding;

    #[test]
    fn scalar_and_vector_attrs() {
        let a = build_attr_message("unitSI", &AttrValue::F64(1e-9));
        assert_eq!(a.datatype, Datatype::f64());
        assert_eq!(a.dataspace.element_count(), 1);
        assert_eq!(a.raw_data, 1e-9f64.to_le_bytes().to_vec());

        let a = build_attr_message("gridSpacing", &[1.0, 1.0].into());
        assert_eq!(a.dataspace.dimensions, vec![2]);
        assert_eq!(a.read_as_f64().unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn string_attr_charset() {
        let a = build_attr_message("geometry", &"cartesian".into());
        match a.datatype {
            Datatype::String {
                size: 9,
                padding: StringPadding::NullPad,
                charset: CharacterSet::Ascii,
            } => {}
            other => panic!("unexpected {other:?}"),
        }
        let a = build_attr_message("comment", &"µ".into());
        assert!(matches!(a.datatype, Datatype::String { charset: CharacterSet::Utf8, .. }));
    }

    #[test]
    fn empty_string_still_has_a_byte() {
        let a = build_attr_message("softwareVersion", &"".into());
        assert_eq!(a.datatype.type_size(), 1);
        assert_eq!(a.read_as_strings().unwrap(), vec![String::new()]);
    }

    #[test]
    fn string_array_pads_to_longest() {
        let a = build_attr_message(
            "names",
            &AttrValue::StringArray(vec!["x".into(), "xyz".into()]),
        );
        assert_eq!(a.raw_data, b"x\0\0xyz".to_vec());
        assert_eq!(a.read_as_strings().unwrap(), vec!["x".to_string(), "xyz".to_string()]);
    }

    #[test]
    fn require_group_reuses_existing() {
        let mut root = GroupBuilder::default();
        root.require_group("data/0/fields").unwrap().set_attr("a", 1.0.into());
        root.require_group("/data/0/fields/").unwrap().set_attr("b", 2.0.into());
        let fields = root.group("data/0/fields").unwrap();
        assert_eq!(fields.attr("a"), Some(&AttrValue::F64(1.0)));
        assert_eq!(fields.attr("b"), Some(&AttrValue::F64(2.0)));
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn names_are_unique_per_group() {
        let mut g = GroupBuilder::default();
        g.create_dataset("rho").unwrap().with_f32_data(&[1.0]);
        assert_eq!(
            g.create_dataset("rho").unwrap_err(),
            FormatError::DuplicateLink("rho".into())
        );
        assert_eq!(
            g.create_group("rho").unwrap_err(),
            FormatError::DuplicateLink("rho".into())
        );
        assert_eq!(
            g.create_group("a/b").unwrap_err(),
            FormatError::InvalidLinkName("a/b".into())
        );
        assert!(g.dataset("rho").is_some());
    }

    #[test]
    fn set_attr_replaces() {
        let mut g = GroupBuilder::default();
        g.set_attr("time", 0.0.into());
        g.set_attr("time", 5.0.into());
        assert_eq!(g.attrs.len(), 1);
        assert_eq!(g.attr("time"), Some(&AttrValue::F64(5.0)));
    }

    #[test]
    fn unallocated_dataset() {
        let mut g = GroupBuilder::default();
        let d = g.create_dataset("weighting").unwrap();
        d.with_unallocated(Datatype::f32(), &[128]);
        assert_eq!(d.shape(), Some(&[128u64][..]));
        assert!(d.data.is_none());
        assert!(d.unallocated);
    }
}
