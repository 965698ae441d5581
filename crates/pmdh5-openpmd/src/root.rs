//! Root-group metadata: standard version, path conventions, provenance.

use pmdh5::{AttrValue, FileBuilder};
use time::macros::format_description;
use time::OffsetDateTime;

use crate::config::OpenPmdConfig;
use crate::error::Result;
use crate::path::{PathContext, ITERATION_FORMAT};

/// openPMD standard version written to `version`.
pub const OPENPMD_VERSION: &str = "1.0.0";

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS +hhmm`.
pub fn format_date(at: OffsetDateTime) -> Result<String> {
    let fmt = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute]"
    );
    Ok(at.format(&fmt)?)
}

/// Current time in the local offset, or UTC when the offset is unknown.
fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| {
        tracing::debug!("local UTC offset unavailable, stamping date in UTC");
        OffsetDateTime::now_utc()
    })
}

/// Write the root attributes and return the paths every record writer uses.
pub fn write_root_attributes(builder: &mut FileBuilder, cfg: &OpenPmdConfig) -> Result<PathContext> {
    let ctx = PathContext::new(cfg.iteration);
    let root = &cfg.root;
    let text = |s: &str| AttrValue::String(s.into());

    builder.set_attr("version", text(OPENPMD_VERSION));
    builder.set_attr("basePath", text(ctx.base_path()));
    builder.set_attr("fieldsPath", text(ctx.meshes_path()));
    builder.set_attr("particlesPath", text(ctx.particles_path()));
    builder.set_attr("iterationEncoding", text("fileBased"));
    builder.set_attr("iterationFormat", text(ITERATION_FORMAT));

    builder.set_attr("author", text(&root.author));
    builder.set_attr("software", text(&root.software));
    if let Some(version) = &root.software_version {
        builder.set_attr("softwareVersion", text(version));
    }
    let date = match &root.date {
        Some(fixed) => fixed.clone(),
        None => format_date(local_now())?,
    };
    builder.set_attr("date", AttrValue::String(date));
    builder.set_attr("comment", text(&root.comment));

    tracing::debug!(base_path = ctx.base_path(), "root attributes written");
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn date_format_with_offset() {
        assert_eq!(
            format_date(datetime!(2015-06-30 14:05:09 +02:00)).unwrap(),
            "2015-06-30 14:05:09 +0200"
        );
        assert_eq!(
            format_date(datetime!(2015-01-02 03:04:05 -05:30)).unwrap(),
            "2015-01-02 03:04:05 -0530"
        );
        assert_eq!(
            format_date(datetime!(2020-12-31 23:59:59 UTC)).unwrap(),
            "2020-12-31 23:59:59 +0000"
        );
    }

    #[test]
    fn root_attributes() {
        let mut builder = FileBuilder::new();
        let cfg = OpenPmdConfig {
            iteration: 3,
            ..OpenPmdConfig::default()
        };
        let ctx = write_root_attributes(&mut builder, &cfg).unwrap();
        assert_eq!(ctx.base_path(), "/data/3/");

        let root = builder.root();
        assert_eq!(root.attr("basePath"), Some(&AttrValue::String("/data/3/".into())));
        assert_eq!(root.attr("version"), Some(&AttrValue::String("1.0.0".into())));
        assert_eq!(
            root.attr("iterationFormat"),
            Some(&AttrValue::String("/data/%T/".into()))
        );
        assert!(root.attr("softwareVersion").is_none());
        match root.attr("date") {
            Some(AttrValue::String(d)) => assert_eq!(d.len(), "2015-06-30 14:05:09 +0200".len()),
            other => panic!("unexpected date {other:?}"),
        }
    }

    #[test]
    fn fixed_date_and_software_version() {
        let mut builder = FileBuilder::new();
        let mut cfg = OpenPmdConfig::default();
        cfg.root.date = Some("2015-06-30 14:05:09 +0200".into());
        cfg.root.software_version = Some("1.0.0".into());
        write_root_attributes(&mut builder, &cfg).unwrap();
        let root = builder.root();
        assert_eq!(
            root.attr("date"),
            Some(&AttrValue::String("2015-06-30 14:05:09 +0200".into()))
        );
        assert_eq!(
            root.attr("softwareVersion"),
            Some(&AttrValue::String("1.0.0".into()))
        );
    }
}
