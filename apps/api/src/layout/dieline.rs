//! Flat-pattern (die-line) derivation for the two structured products the
//! estimators support: paper bags and straight tuck-end boxes.
//!
//! The derived footprint is what gets imposed on the stock sheet by
//! `sheet::plan_sheet`. Formulas are the flattened wrap of the product body;
//! creep and score allowances ride in the glue/fold parameters.

use serde::{Deserialize, Serialize};

use crate::layout::sheet::Footprint;

/// Finished paper-bag dimensions, in millimeters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BagSpec {
    /// Front/back panel width.
    pub width_mm: f64,
    /// Standing height.
    pub height_mm: f64,
    /// Side gusset depth.
    pub gusset_mm: f64,
    /// Vertical glue seam overlap.
    pub glue_flap_mm: f64,
    /// Folded-over top hem.
    pub top_fold_mm: f64,
}

/// Finished straight tuck-end box dimensions, in millimeters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoxSpec {
    pub length_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub glue_flap_mm: f64,
    /// Tuck flap beyond each closure panel.
    pub tuck_flap_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DielineError {
    pub field: &'static str,
    pub message: String,
}

fn require_positive(field: &'static str, value: f64) -> Result<(), DielineError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(DielineError {
            field,
            message: format!("{field} must be positive, got {value}"),
        })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), DielineError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(DielineError {
            field,
            message: format!("{field} must not be negative, got {value}"),
        })
    }
}

/// Unfolds a bag into its flat pattern:
/// width = 2·(panel + gusset) + glue flap, height = height + gusset + top fold.
pub fn bag_footprint(spec: &BagSpec) -> Result<Footprint, DielineError> {
    require_positive("width_mm", spec.width_mm)?;
    require_positive("height_mm", spec.height_mm)?;
    require_positive("gusset_mm", spec.gusset_mm)?;
    require_non_negative("glue_flap_mm", spec.glue_flap_mm)?;
    require_non_negative("top_fold_mm", spec.top_fold_mm)?;

    Ok(Footprint::new(
        2.0 * (spec.width_mm + spec.gusset_mm) + spec.glue_flap_mm,
        spec.height_mm + spec.gusset_mm + spec.top_fold_mm,
    ))
}

/// Unfolds a straight tuck-end box:
/// width = 2·(length + width) + glue flap, height = height + width + 2·tuck flap.
/// The top and bottom closure panels together contribute one `width`.
pub fn box_footprint(spec: &BoxSpec) -> Result<Footprint, DielineError> {
    require_positive("length_mm", spec.length_mm)?;
    require_positive("width_mm", spec.width_mm)?;
    require_positive("height_mm", spec.height_mm)?;
    require_non_negative("glue_flap_mm", spec.glue_flap_mm)?;
    require_non_negative("tuck_flap_mm", spec.tuck_flap_mm)?;

    Ok(Footprint::new(
        2.0 * (spec.length_mm + spec.width_mm) + spec.glue_flap_mm,
        spec.height_mm + spec.width_mm + 2.0 * spec.tuck_flap_mm,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shopper_bag() -> BagSpec {
        // A common 250×330×100 shopper.
        BagSpec {
            width_mm: 250.0,
            height_mm: 330.0,
            gusset_mm: 100.0,
            glue_flap_mm: 20.0,
            top_fold_mm: 40.0,
        }
    }

    #[test]
    fn test_bag_flat_pattern() {
        let fp = bag_footprint(&shopper_bag()).unwrap();
        // 2·(250+100)+20 = 720 wide, 330+100+40 = 470 tall.
        assert!((fp.width_mm - 720.0).abs() < 1e-9);
        assert!((fp.height_mm - 470.0).abs() < 1e-9);
    }

    #[test]
    fn test_bag_zero_gusset_rejected() {
        let mut spec = shopper_bag();
        spec.gusset_mm = 0.0;
        let err = bag_footprint(&spec).unwrap_err();
        assert_eq!(err.field, "gusset_mm");
    }

    #[test]
    fn test_bag_negative_flap_rejected() {
        let mut spec = shopper_bag();
        spec.glue_flap_mm = -1.0;
        assert!(bag_footprint(&spec).is_err());
    }

    #[test]
    fn test_bag_zero_allowances_allowed() {
        let mut spec = shopper_bag();
        spec.glue_flap_mm = 0.0;
        spec.top_fold_mm = 0.0;
        let fp = bag_footprint(&spec).unwrap();
        assert!((fp.width_mm - 700.0).abs() < 1e-9);
        assert!((fp.height_mm - 430.0).abs() < 1e-9);
    }

    #[test]
    fn test_box_flat_pattern() {
        let fp = box_footprint(&BoxSpec {
            length_mm: 80.0,
            width_mm: 60.0,
            height_mm: 120.0,
            glue_flap_mm: 15.0,
            tuck_flap_mm: 18.0,
        })
        .unwrap();
        // 2·(80+60)+15 = 295 wide, 120+60+36 = 216 tall.
        assert!((fp.width_mm - 295.0).abs() < 1e-9);
        assert!((fp.height_mm - 216.0).abs() < 1e-9);
    }

    #[test]
    fn test_box_negative_dimension_rejected() {
        let err = box_footprint(&BoxSpec {
            length_mm: 80.0,
            width_mm: -60.0,
            height_mm: 120.0,
            glue_flap_mm: 15.0,
            tuck_flap_mm: 18.0,
        })
        .unwrap_err();
        assert_eq!(err.field, "width_mm");
    }
}
