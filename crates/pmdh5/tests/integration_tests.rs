//! End-to-end tests for pmdh5: write to disk, reopen, and inspect deep
//! group hierarchies, attributes of every type, and unallocated storage.

use pmdh5::{AttrValue, DType, Datatype, File, FileBuilder};

// ---------------------------------------------------------------------------
// 1. Full write pipeline through the filesystem
// ---------------------------------------------------------------------------

#[test]
fn full_write_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("write_test.h5");

    let mut b = FileBuilder::new();
    b.set_attr("software", AttrValue::String("pmdh5".into()));
    b.create_dataset("experiment/results")
        .unwrap()
        .with_f64_data(&[1.0, 2.0, 3.0, 4.0])
        .with_shape(&[2, 2])
        .set_attr("unitSI", AttrValue::F64(1.0));
    b.write(&path).unwrap();

    let file = File::open(&path).unwrap();
    let ds = file.dataset("experiment/results").unwrap();
    assert_eq!(ds.shape().unwrap(), vec![2, 2]);
    assert_eq!(ds.read_f64().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(ds.attrs().unwrap().get("unitSI"), Some(&AttrValue::F64(1.0)));
}

#[test]
fn write_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overwrite.h5");
    std::fs::write(&path, vec![0xAB; 10_000]).unwrap();

    let mut b = FileBuilder::new();
    b.create_dataset("x").unwrap().with_f32_data(&[5.0]);
    b.write(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let file = File::from_bytes(bytes.clone()).unwrap();
    assert_eq!(file.superblock().eof_address, bytes.len() as u64);
    assert_eq!(file.dataset("x").unwrap().read_f32().unwrap(), vec![5.0]);
}

// ---------------------------------------------------------------------------
// 2. Deep hierarchies
// ---------------------------------------------------------------------------

#[test]
fn deep_group_hierarchy() {
    let mut b = FileBuilder::new();
    let path = "a/b/c/d/e/f/g/h";
    b.create_dataset(&format!("{path}/leaf"))
        .unwrap()
        .with_i64_data(&[42]);
    b.create_group("a/b/c").unwrap().set_attr("depth", AttrValue::I64(3));

    let file = File::from_bytes(b.finish().unwrap()).unwrap();
    assert_eq!(
        file.dataset(&format!("/{path}/leaf")).unwrap().read_i64().unwrap(),
        vec![42]
    );
    assert_eq!(
        file.group("a/b/c").unwrap().attrs().unwrap().get("depth"),
        Some(&AttrValue::I64(3))
    );
    assert_eq!(file.group("a/b").unwrap().groups().unwrap(), vec!["c"]);
}

#[test]
fn attribute_only_groups_have_no_members() {
    let mut b = FileBuilder::new();
    b.create_group("species/charge")
        .unwrap()
        .set_attr("value", AttrValue::F64(-1.0));
    let file = File::from_bytes(b.finish().unwrap()).unwrap();
    let charge = file.group("species/charge").unwrap();
    assert!(charge.member_names().unwrap().is_empty());
    assert_eq!(charge.attrs().unwrap().get("value"), Some(&AttrValue::F64(-1.0)));
}

// ---------------------------------------------------------------------------
// 3. Attribute types
// ---------------------------------------------------------------------------

#[test]
fn attributes_of_every_type() {
    let mut b = FileBuilder::new();
    let g = b.create_group("g").unwrap();
    g.set_attr("f", AttrValue::F64(1.60217657e-19));
    g.set_attr("fa", AttrValue::F64Array(vec![-3.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0]));
    g.set_attr("i", AttrValue::I64(-7));
    g.set_attr("ia", AttrValue::I64Array(vec![1, 2, 3]));
    g.set_attr("u", AttrValue::U64(u64::MAX));
    g.set_attr("s", AttrValue::String("m=1; imag=+".into()));
    g.set_attr(
        "sa",
        AttrValue::StringArray(vec!["x".into(), "y".into(), "z".into()]),
    );

    let file = File::from_bytes(b.finish().unwrap()).unwrap();
    let attrs = file.group("g").unwrap().attrs().unwrap();
    assert_eq!(attrs.len(), 7);
    assert_eq!(attrs["f"], AttrValue::F64(1.60217657e-19));
    assert_eq!(
        attrs["fa"],
        AttrValue::F64Array(vec![-3.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0])
    );
    assert_eq!(attrs["i"], AttrValue::I64(-7));
    assert_eq!(attrs["ia"], AttrValue::I64Array(vec![1, 2, 3]));
    assert_eq!(attrs["u"], AttrValue::U64(u64::MAX));
    assert_eq!(attrs["s"], AttrValue::String("m=1; imag=+".into()));
    assert_eq!(
        attrs["sa"],
        AttrValue::StringArray(vec!["x".into(), "y".into(), "z".into()])
    );
}

#[test]
fn float_attributes_are_bit_identical() {
    let values = [1e-9, 0.1 + 0.2, f64::MIN_POSITIVE, -0.0, 9.10938291e-31];
    let mut b = FileBuilder::new();
    for (i, v) in values.iter().enumerate() {
        b.set_attr(&format!("v{i}"), AttrValue::F64(*v));
    }
    let file = File::from_bytes(b.finish().unwrap()).unwrap();
    let attrs = file.root().attrs().unwrap();
    for (i, v) in values.iter().enumerate() {
        match &attrs[&format!("v{i}")] {
            AttrValue::F64(read) => assert_eq!(read.to_bits(), v.to_bits()),
            other => panic!("unexpected {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Data types and storage
// ---------------------------------------------------------------------------

#[test]
fn f32_and_f64_datasets() {
    let mut b = FileBuilder::new();
    b.create_dataset("single")
        .unwrap()
        .with_f32_data(&[0.25, -1.5, 3.0e10]);
    b.create_dataset("double").unwrap().with_f64_data(&[0.1]);
    let file = File::from_bytes(b.finish().unwrap()).unwrap();

    let single = file.dataset("single").unwrap();
    assert_eq!(single.dtype().unwrap(), DType::F32);
    assert_eq!(single.read_f32().unwrap(), vec![0.25, -1.5, 3.0e10]);
    assert_eq!(single.read_f64().unwrap(), vec![0.25, -1.5, 3.0e10f32 as f64]);

    let double = file.dataset("double").unwrap();
    assert_eq!(double.dtype().unwrap(), DType::F64);
    assert!(double.read_i64().is_err());
}

#[test]
fn unallocated_dataset_reads_zeros() {
    let mut b = FileBuilder::new();
    b.create_dataset("weighting")
        .unwrap()
        .with_unallocated(Datatype::f32(), &[128]);
    let file = File::from_bytes(b.finish().unwrap()).unwrap();
    let ds = file.dataset("weighting").unwrap();
    assert!(!ds.is_allocated().unwrap());
    assert_eq!(ds.shape().unwrap(), vec![128]);
    assert_eq!(ds.read_f32().unwrap(), vec![0.0; 128]);
}

#[test]
fn three_dimensional_shape() {
    let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
    let mut b = FileBuilder::new();
    b.create_dataset("cube")
        .unwrap()
        .with_f32_data(&data)
        .with_shape(&[3, 2, 4]);
    let file = File::from_bytes(b.finish().unwrap()).unwrap();
    let ds = file.dataset("cube").unwrap();
    assert_eq!(ds.shape().unwrap(), vec![3, 2, 4]);
    assert_eq!(ds.read_f32().unwrap(), data);
}

// ---------------------------------------------------------------------------
// 5. Error paths
// ---------------------------------------------------------------------------

#[test]
fn duplicate_names_rejected() {
    let mut b = FileBuilder::new();
    b.create_dataset("g/x").unwrap().with_f32_data(&[1.0]);
    assert!(b.create_dataset("g/x").is_err());
    assert!(b.create_group("g/x").is_err());
    assert!(b.create_dataset("g/x/y").is_err());
}

#[test]
fn shape_data_disagreement_fails_at_finish() {
    let mut b = FileBuilder::new();
    b.create_dataset("bad")
        .unwrap()
        .with_f32_data(&[1.0, 2.0, 3.0])
        .with_shape(&[2, 2]);
    assert!(matches!(b.finish(), Err(pmdh5::Error::Format(_))));
}

#[test]
fn corrupt_file_is_detected() {
    let mut b = FileBuilder::new();
    b.set_attr("comment", AttrValue::String("payload".into()));
    let mut bytes = b.finish().unwrap();

    let mut bad_sb = bytes.clone();
    bad_sb[20] ^= 0xFF;
    assert!(File::from_bytes(bad_sb).is_err());

    let root = File::from_bytes(bytes.clone())
        .unwrap()
        .superblock()
        .root_group_address as usize;
    bytes[root + 20] ^= 0x01;
    let file = File::from_bytes(bytes).unwrap();
    assert!(file.root().attrs().is_err());
}

#[test]
fn truncated_file_is_rejected() {
    let mut b = FileBuilder::new();
    b.create_dataset("x").unwrap().with_f64_data(&[1.0; 16]);
    let bytes = b.finish().unwrap();
    let file = File::from_bytes(bytes[..bytes.len() - 8].to_vec()).unwrap();
    assert!(file.dataset("x").unwrap().read_f64().is_err());
}
