//! ED-PIC extension attributes.

use pmdh5::AttrValue;

use crate::attributes::AttributeTarget;
use crate::config::{FieldSolverConfig, SpeciesPicConfig};

/// Stamp the field solver and smoothing attributes onto a mesh record.
///
/// `*Parameters` attributes are written only when configured.
pub fn write_field_pic_attributes<T: AttributeTarget + ?Sized>(target: &mut T, cfg: &FieldSolverConfig) {
    target.put_str("fieldSolver", &cfg.field_solver);
    target.put_attr("fieldSolverOrder", AttrValue::F64(cfg.field_solver_order));
    target.put_opt_str("fieldSolverParameters", cfg.field_solver_parameters.as_deref());
    target.put_str("fieldSmoothing", &cfg.field_smoothing);
    target.put_opt_str("fieldSmoothingParameters", cfg.field_smoothing_parameters.as_deref());
    target.put_str("currentSmoothing", &cfg.current_smoothing);
    target.put_opt_str(
        "currentSmoothingParameters",
        cfg.current_smoothing_parameters.as_deref(),
    );
    target.put_str("chargeCorrection", &cfg.charge_correction);
    target.put_opt_str(
        "chargeCorrectionParameters",
        cfg.charge_correction_parameters.as_deref(),
    );
}

/// Stamp particle shape, deposition, push and smoothing attributes onto a
/// species group.
pub fn write_species_pic_attributes<T: AttributeTarget + ?Sized>(target: &mut T, cfg: &SpeciesPicConfig) {
    target.put_attr("particleShape", AttrValue::F64(cfg.particle_shape));
    target.put_str("currentDeposition", &cfg.current_deposition);
    target.put_opt_str(
        "currentDepositionParameters",
        cfg.current_deposition_parameters.as_deref(),
    );
    target.put_str("particlePush", &cfg.particle_push);
    target.put_str("particleInterpolation", &cfg.particle_interpolation);
    target.put_str("particleSmoothing", &cfg.particle_smoothing);
    target.put_opt_str(
        "particleSmoothingParameters",
        cfg.particle_smoothing_parameters.as_deref(),
    );
}
