//! Group traversal: link listing and path resolution over compact link storage.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::error::FormatError;
use crate::link_message::{link_info_is_dense, LinkMessage};
use crate::message_type::MessageType;
use crate::object_header::ObjectHeader;
use crate::superblock::Superblock;

/// Kind of object an object header describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Group,
    Dataset,
    Other,
}

/// Classify an object header by the messages it carries.
pub fn object_kind(header: &ObjectHeader) -> ObjectKind {
    if header.find(MessageType::LinkInfo).is_some() {
        ObjectKind::Group
    } else if header.find(MessageType::DataLayout).is_some() {
        ObjectKind::Dataset
    } else {
        ObjectKind::Other
    }
}

/// Links stored in a group header, in header order.
pub fn group_links(header: &ObjectHeader, offset_size: u8) -> Result<Vec<LinkMessage>, FormatError> {
    if let Some(info) = header.find(MessageType::LinkInfo) {
        if link_info_is_dense(&info.data, offset_size)? {
            return Err(FormatError::UnsupportedMessage(MessageType::LinkInfo.to_u16()));
        }
    }
    header
        .find_all(MessageType::Link)
        .map(|m| LinkMessage::parse(&m.data, offset_size))
        .collect()
}

fn parse_header(data: &[u8], sb: &Superblock, addr: u64) -> Result<ObjectHeader, FormatError> {
    ObjectHeader::parse(data, addr as usize)
}

/// Resolve an absolute or root-relative path to an object header address.
///
/// Empty components and `.` are skipped, so `"/"`, `""` and `"/data//0/"`
/// are all accepted.
pub fn resolve_path(data: &[u8], sb: &Superblock, path: &str) -> Result<u64, FormatError> {
    let mut current = sb.root_group_address;
    let mut walked = String::new();

    for component in path.split('/').filter(|c| !c.is_empty() && *c != ".") {
        let header = parse_header(data, sb, current)?;
        if object_kind(&header) != ObjectKind::Group {
            if walked.is_empty() {
                walked.push('/');
            }
            return Err(FormatError::NotAGroup(walked));
        }
        walked.push('/');
        walked.push_str(component);

        current = group_links(&header, sb.offset_size)?
            .into_iter()
            .find(|l| l.name == component)
            .map(|l| l.object_header_address)
            .ok_or_else(|| FormatError::PathNotFound(walked.clone()))?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::find_signature;
    use crate::file_writer::FileWriter;
    use crate::type_builders::AttrValue;

    fn sample() -> Vec<u8> {
        let mut w = FileWriter::new();
        let root = w.root_mut();
        let fields = root.require_group("data/0/fields").unwrap();
        fields.set_attr("fieldSolver", AttrValue::String("Yee".into()));
        fields
            .create_dataset("rho")
            .unwrap()
            .with_f32_data(&[0.0; 4])
            .with_shape(&[2, 2]);
        root.require_group("data/0/particles").unwrap();
        w.finish().unwrap()
    }

    fn superblock(bytes: &[u8]) -> Superblock {
        Superblock::parse(bytes, find_signature(bytes).unwrap()).unwrap()
    }

    #[test]
    fn resolves_nested_paths() {
        let bytes = sample();
        let sb = superblock(&bytes);
        let rho = resolve_path(&bytes, &sb, "/data/0/fields/rho").unwrap();
        let hdr = ObjectHeader::parse(&bytes, rho as usize).unwrap();
        assert_eq!(object_kind(&hdr), ObjectKind::Dataset);

        let same = resolve_path(&bytes, &sb, "data//0/./fields/rho").unwrap();
        assert_eq!(same, rho);
        assert_eq!(resolve_path(&bytes, &sb, "/").unwrap(), sb.root_group_address);
    }

    #[test]
    fn lists_links_in_insertion_order() {
        let bytes = sample();
        let sb = superblock(&bytes);
        let step = resolve_path(&bytes, &sb, "/data/0").unwrap();
        let hdr = ObjectHeader::parse(&bytes, step as usize).unwrap();
        let names: Vec<String> = group_links(&hdr, 8).unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["fields", "particles"]);
    }

    #[test]
    fn missing_and_non_group_components() {
        let bytes = sample();
        let sb = superblock(&bytes);
        assert_eq!(
            resolve_path(&bytes, &sb, "/data/1"),
            Err(FormatError::PathNotFound("/data/1".into()))
        );
        assert_eq!(
            resolve_path(&bytes, &sb, "/data/0/fields/rho/x"),
            Err(FormatError::NotAGroup("/data/0/fields/rho".into()))
        );
    }
}
