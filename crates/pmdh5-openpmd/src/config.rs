//! Writer configuration.
//!
//! Every value the generator stamps into the file is a field here. The
//! `Default` impls reproduce the reference sample file, and any subset can
//! be overridden from JSON:
//!
//! ```json
//! { "iteration": 100, "species": { "name": "ions", "particleCount": 1024 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration for one openPMD series file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenPmdConfig {
    /// Iteration index substituted into `basePath`.
    pub iteration: u64,
    pub root: RootConfig,
    pub grid: GridConfig,
    pub time: TimeConfig,
    /// `unitSI` of the `rho` mesh.
    #[serde(rename = "rhoUnitSI")]
    pub rho_unit_si: f64,
    /// `unitSI` of each `E` component.
    #[serde(rename = "eUnitSI")]
    pub e_unit_si: f64,
    pub field_solver: FieldSolverConfig,
    pub species: SpeciesConfig,
    /// Grid extent of the random sample fields written by `create-examples`.
    pub sample_shape: [usize; 2],
}

impl Default for OpenPmdConfig {
    fn default() -> Self {
        Self {
            iteration: 0,
            root: RootConfig::default(),
            grid: GridConfig::default(),
            time: TimeConfig::default(),
            rho_unit_si: 1.0,
            e_unit_si: 1.0,
            field_solver: FieldSolverConfig::default(),
            species: SpeciesConfig::default(),
            sample_shape: [32, 64],
        }
    }
}

/// Provenance attributes on the root group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RootConfig {
    pub author: String,
    pub software: String,
    pub software_version: Option<String>,
    pub comment: String,
    /// Fixed `date` string; the current local time when unset.
    pub date: Option<String>,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            author: "Axel Huebl <a.huebl@hzdr.de>".into(),
            software: "OpenPMD Example Script".into(),
            software_version: None,
            comment: "This is a dummy file for test purposes.".into(),
            date: None,
        }
    }
}

/// Mesh grid description shared by all field records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub spacing: [f64; 2],
    pub global_offset: [f64; 2],
    #[serde(rename = "unitSI")]
    pub unit_si: f64,
    /// `"C"` (row-major) or `"F"` (column-major).
    pub data_order: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: [1.0, 1.0],
            global_offset: [0.0, 0.0],
            unit_si: 1.0,
            data_order: "C".into(),
        }
    }
}

/// Simulation time of the iteration. The default time unit is nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeConfig {
    pub time: f64,
    #[serde(rename = "unitSI")]
    pub unit_si: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time: 0.0,
            unit_si: 1e-9,
        }
    }
}

/// ED-PIC attributes of mesh records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSolverConfig {
    pub field_solver: String,
    pub field_solver_order: f64,
    pub field_solver_parameters: Option<String>,
    pub field_smoothing: String,
    pub field_smoothing_parameters: Option<String>,
    pub current_smoothing: String,
    pub current_smoothing_parameters: Option<String>,
    pub charge_correction: String,
    pub charge_correction_parameters: Option<String>,
}

impl Default for FieldSolverConfig {
    fn default() -> Self {
        Self {
            field_solver: "Yee".into(),
            field_solver_order: 2.0,
            field_solver_parameters: None,
            field_smoothing: "none".into(),
            field_smoothing_parameters: None,
            current_smoothing: "none".into(),
            current_smoothing_parameters: None,
            charge_correction: "none".into(),
            charge_correction_parameters: None,
        }
    }
}

/// ED-PIC attributes of a particle species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeciesPicConfig {
    pub particle_shape: f64,
    pub current_deposition: String,
    pub current_deposition_parameters: Option<String>,
    pub particle_push: String,
    pub particle_interpolation: String,
    pub particle_smoothing: String,
    pub particle_smoothing_parameters: Option<String>,
}

impl Default for SpeciesPicConfig {
    fn default() -> Self {
        Self {
            particle_shape: 3.0,
            current_deposition: "Esirkepov".into(),
            current_deposition_parameters: None,
            particle_push: "Boris".into(),
            particle_interpolation: "Trilinear".into(),
            particle_smoothing: "none".into(),
            particle_smoothing_parameters: None,
        }
    }
}

/// A per-species constant stored as `value` times `unitSI`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantRecord {
    pub value: f64,
    #[serde(rename = "unitSI")]
    pub unit_si: f64,
}

/// One particle species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeciesConfig {
    pub name: String,
    pub long_name: Option<String>,
    pub particle_count: usize,
    pub pic: SpeciesPicConfig,
    pub charge: ConstantRecord,
    pub mass: ConstantRecord,
    #[serde(rename = "weightingUnitSI")]
    pub weighting_unit_si: f64,
    #[serde(rename = "positionUnitSI")]
    pub position_unit_si: f64,
    #[serde(rename = "momentumUnitSI")]
    pub momentum_unit_si: f64,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            name: "electrons".into(),
            long_name: Some("My first electron species".into()),
            particle_count: 128,
            pic: SpeciesPicConfig::default(),
            charge: ConstantRecord {
                value: -1.0,
                unit_si: 1.60217657e-19,
            },
            mass: ConstantRecord {
                value: 1.0,
                unit_si: 9.10938291e-31,
            },
            weighting_unit_si: 1.0,
            position_unit_si: 1e-9,
            momentum_unit_si: 1.60217657e-19,
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be a positive finite scale, got {value}"
        )))
    }
}

impl OpenPmdConfig {
    /// Parse JSON and validate. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Reject values that would produce a malformed or unreadable file.
    pub fn validate(&self) -> Result<()> {
        let name = &self.species.name;
        if name.is_empty() || name.contains('/') || name == "." {
            return Err(Error::InvalidConfig(format!(
                "species name {name:?} is not a valid group name"
            )));
        }
        if self.species.particle_count == 0 {
            return Err(Error::InvalidConfig("particleCount must be at least 1".into()));
        }
        if !matches!(self.grid.data_order.as_str(), "C" | "F") {
            return Err(Error::InvalidConfig(format!(
                "dataOrder must be \"C\" or \"F\", got {:?}",
                self.grid.data_order
            )));
        }
        for (label, value) in [
            ("grid.unitSI", self.grid.unit_si),
            ("time.unitSI", self.time.unit_si),
            ("rhoUnitSI", self.rho_unit_si),
            ("eUnitSI", self.e_unit_si),
            ("species.charge.unitSI", self.species.charge.unit_si),
            ("species.mass.unitSI", self.species.mass.unit_si),
            ("species.weightingUnitSI", self.species.weighting_unit_si),
            ("species.positionUnitSI", self.species.position_unit_si),
            ("species.momentumUnitSI", self.species.momentum_unit_si),
        ] {
            check_unit(label, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = OpenPmdConfig::default();
        config.validate().unwrap();
        assert_eq!(config.species.particle_count, 128);
        assert_eq!(config.field_solver.field_solver, "Yee");
        assert_eq!(config.time.unit_si, 1e-9);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = OpenPmdConfig::from_json_str(
            r#"{ "iteration": 7, "species": { "name": "ions", "particleCount": 16 } }"#,
        )
        .unwrap();
        assert_eq!(config.iteration, 7);
        assert_eq!(config.species.name, "ions");
        assert_eq!(config.species.particle_count, 16);
        assert_eq!(config.species.position_unit_si, 1e-9);
        assert_eq!(config.grid, GridConfig::default());
    }

    #[test]
    fn camel_case_keys() {
        let json = serde_json::to_value(OpenPmdConfig::default()).unwrap();
        assert!(json["fieldSolver"]["fieldSolverOrder"].is_number());
        assert!(json["species"]["pic"]["currentDeposition"].is_string());
        assert_eq!(json["sampleShape"], serde_json::json!([32, 64]));
    }

    #[test]
    fn rejects_bad_values() {
        for json in [
            r#"{ "species": { "particleCount": 0 } }"#,
            r#"{ "species": { "name": "a/b" } }"#,
            r#"{ "species": { "name": "" } }"#,
            r#"{ "grid": { "dataOrder": "X" } }"#,
            r#"{ "time": { "unitSI": 0.0 } }"#,
            r#"{ "species": { "mass": { "value": 1.0, "unitSI": -1.0 } } }"#,
        ] {
            assert!(
                matches!(OpenPmdConfig::from_json_str(json), Err(Error::InvalidConfig(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            OpenPmdConfig::from_json_str("{ iteration: }"),
            Err(Error::Json(_))
        ));
    }
}
