//! Pure-Rust HDF5 binary format encoding and decoding.
//!
//! This crate produces HDF5 files with a v3 superblock, v2 object headers,
//! compact link and attribute storage and contiguous datasets, arranged in
//! an arbitrarily nested group tree. It also parses the same structures back
//! so written files can be inspected without the HDF5 C library.
//!
//! It supports `no_std` environments with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod bytes;

pub mod attribute;
pub mod checksum;
pub mod data_layout;
pub mod data_read;
pub mod dataspace;
pub mod datatype;
pub mod error;
pub mod file_writer;
pub mod group;
pub mod link_message;
pub mod message_type;
pub mod object_header;
pub mod object_header_writer;
pub mod signature;
pub mod superblock;
pub mod type_builders;
