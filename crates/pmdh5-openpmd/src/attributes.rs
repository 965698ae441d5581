//! Common attribute plumbing for groups and datasets.

use pmdh5::{AttrValue, DatasetBuilder, GroupBuilder};

/// Anything openPMD attributes can be stamped onto.
///
/// Records are groups for multi-component quantities and datasets for
/// scalar ones, and the same attribute sets apply to both.
pub trait AttributeTarget {
    fn put_attr(&mut self, name: &str, value: AttrValue);

    /// Set a string attribute.
    fn put_str(&mut self, name: &str, value: &str) {
        self.put_attr(name, AttrValue::String(value.into()));
    }

    /// Set a string attribute when `value` is present.
    fn put_opt_str(&mut self, name: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.put_str(name, v);
        }
    }
}

impl AttributeTarget for GroupBuilder {
    fn put_attr(&mut self, name: &str, value: AttrValue) {
        self.set_attr(name, value);
    }
}

impl AttributeTarget for DatasetBuilder {
    fn put_attr(&mut self, name: &str, value: AttrValue) {
        self.set_attr(name, value);
    }
}
