//! Sheet-layout optimizer — how many flat item footprints fit on a stock sheet.
//!
//! This is a two-orientation comparison, not a packing search: items are placed
//! in a regular grid either as-is or rotated 90°, and the denser grid wins.
//! That matches how a guillotine-cut print run is actually imposed for a single
//! rectangular die. Irregular shapes and mixed orientations are out of scope.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Flat (die-cut / trim) size of a single item, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Footprint {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    pub fn area_mm2(&self) -> f64 {
        if self.width_mm <= 0.0 || self.height_mm <= 0.0 {
            return 0.0;
        }
        self.width_mm * self.height_mm
    }

    /// The same footprint rotated 90°.
    pub fn rotated(&self) -> Self {
        Self {
            width_mm: self.height_mm,
            height_mm: self.width_mm,
        }
    }
}

/// Stock sheet size, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Sheet {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }
}

/// Imposition parameters.
///
/// `margin_mm` is the non-printable border on each sheet edge (gripper and
/// trim); `gutter_mm` is the spacing between adjacent placements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub margin_mm: f64,
    pub gutter_mm: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            margin_mm: 10.0,
            gutter_mm: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Item placed as given.
    Normal,
    /// Item rotated 90°.
    Rotated,
}

/// Grid fit for one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationFit {
    pub orientation: Orientation,
    /// Columns across the sheet width.
    pub across: u32,
    /// Rows down the sheet height.
    pub down: u32,
    pub count: u32,
}

/// Result of planning one footprint against one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub best: OrientationFit,
    pub alternative: OrientationFit,
    /// Items per sheet in the winning orientation. 0 when nothing fits.
    pub per_sheet: u32,
    /// Placed item area / usable sheet area, in [0, 1].
    pub utilization: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Core arithmetic
// ────────────────────────────────────────────────────────────────────────────

/// How many items of size `item` fit along `space` with `gutter` between them.
///
/// The first item needs no gutter, so n items need `n·item + (n−1)·gutter`,
/// which rearranges to `floor((space + gutter) / (item + gutter))`.
pub fn fits_along(space_mm: f64, item_mm: f64, gutter_mm: f64) -> u32 {
    if item_mm <= 0.0 || space_mm <= 0.0 || item_mm > space_mm {
        return 0;
    }
    let gutter = gutter_mm.max(0.0);
    ((space_mm + gutter) / (item_mm + gutter)).floor() as u32
}

fn fit_grid(footprint: Footprint, usable_w: f64, usable_h: f64, gutter: f64) -> (u32, u32) {
    let across = fits_along(usable_w, footprint.width_mm, gutter);
    let down = fits_along(usable_h, footprint.height_mm, gutter);
    (across, down)
}

/// Plans one footprint against one sheet: computes the normal and 90°-rotated
/// grids over the usable area and picks the denser one. Normal wins ties.
pub fn plan_sheet(footprint: Footprint, sheet: Sheet, options: LayoutOptions) -> LayoutPlan {
    let margin = options.margin_mm.max(0.0);
    let usable_w = sheet.width_mm - 2.0 * margin;
    let usable_h = sheet.height_mm - 2.0 * margin;

    let (na, nd) = fit_grid(footprint, usable_w, usable_h, options.gutter_mm);
    let normal = OrientationFit {
        orientation: Orientation::Normal,
        across: na,
        down: nd,
        count: na * nd,
    };

    let (ra, rd) = fit_grid(footprint.rotated(), usable_w, usable_h, options.gutter_mm);
    let rotated = OrientationFit {
        orientation: Orientation::Rotated,
        across: ra,
        down: rd,
        count: ra * rd,
    };

    let (best, alternative) = if rotated.count > normal.count {
        (rotated, normal)
    } else {
        (normal, rotated)
    };

    let usable_area = usable_w.max(0.0) * usable_h.max(0.0);
    let utilization = if usable_area > 0.0 {
        (best.count as f64 * footprint.area_mm2() / usable_area).clamp(0.0, 1.0)
    } else {
        0.0
    };

    LayoutPlan {
        best,
        alternative,
        per_sheet: best.count,
        utilization,
    }
}

/// Sheets required to produce `quantity` items at `per_sheet` per sheet.
/// `None` when nothing fits on a sheet at all.
pub fn sheets_needed(per_sheet: u32, quantity: u32) -> Option<u32> {
    if per_sheet == 0 {
        return None;
    }
    Some(quantity.div_ceil(per_sheet))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn no_waste_options() -> LayoutOptions {
        LayoutOptions {
            margin_mm: 0.0,
            gutter_mm: 0.0,
        }
    }

    // ── fits_along ──────────────────────────────────────────────────────────

    #[test]
    fn test_fits_along_exact_division() {
        assert_eq!(fits_along(1000.0, 100.0, 0.0), 10);
    }

    #[test]
    fn test_fits_along_with_gutter() {
        // 3 items of 100 + 2 gutters of 50 = 400; a 4th would need 550.
        assert_eq!(fits_along(400.0, 100.0, 50.0), 3);
        assert_eq!(fits_along(449.0, 100.0, 50.0), 3);
        assert_eq!(fits_along(550.0, 100.0, 50.0), 4);
    }

    #[test]
    fn test_fits_along_item_larger_than_space() {
        assert_eq!(fits_along(100.0, 101.0, 0.0), 0);
    }

    #[test]
    fn test_fits_along_degenerate_inputs() {
        assert_eq!(fits_along(100.0, 0.0, 0.0), 0);
        assert_eq!(fits_along(100.0, -5.0, 0.0), 0);
        assert_eq!(fits_along(0.0, 10.0, 0.0), 0);
        assert_eq!(fits_along(-100.0, 10.0, 0.0), 0);
    }

    #[test]
    fn test_fits_along_negative_gutter_treated_as_zero() {
        assert_eq!(fits_along(1000.0, 100.0, -3.0), 10);
    }

    // ── plan_sheet ──────────────────────────────────────────────────────────

    #[test]
    fn test_plan_rotation_wins_when_denser() {
        // 200×300 item on a 700×1000 sheet, no margins:
        // normal: 3 across × 3 down = 9; rotated (300×200): 2 × 5 = 10.
        let plan = plan_sheet(
            Footprint::new(200.0, 300.0),
            Sheet::new(700.0, 1000.0),
            no_waste_options(),
        );
        assert_eq!(plan.best.orientation, Orientation::Rotated);
        assert_eq!(plan.per_sheet, 10);
        assert_eq!(plan.alternative.count, 9);
    }

    #[test]
    fn test_plan_normal_wins_ties() {
        // Square item: both orientations give the same count — Normal reported.
        let plan = plan_sheet(
            Footprint::new(100.0, 100.0),
            Sheet::new(500.0, 400.0),
            no_waste_options(),
        );
        assert_eq!(plan.best.orientation, Orientation::Normal);
        assert_eq!(plan.per_sheet, 20);
        assert_eq!(plan.alternative.count, 20);
    }

    #[test]
    fn test_plan_margin_shrinks_usable_area() {
        // 100×100 on 500×400 with 10mm margin → usable 480×380 → 4 × 3 = 12.
        let plan = plan_sheet(
            Footprint::new(100.0, 100.0),
            Sheet::new(500.0, 400.0),
            LayoutOptions {
                margin_mm: 10.0,
                gutter_mm: 0.0,
            },
        );
        assert_eq!(plan.best.across, 4);
        assert_eq!(plan.best.down, 3);
        assert_eq!(plan.per_sheet, 12);
    }

    #[test]
    fn test_plan_nothing_fits() {
        let plan = plan_sheet(
            Footprint::new(800.0, 900.0),
            Sheet::new(700.0, 1000.0),
            no_waste_options(),
        );
        assert_eq!(plan.per_sheet, 0);
        assert_eq!(plan.utilization, 0.0);
    }

    #[test]
    fn test_plan_degenerate_sheet_is_zero_not_panic() {
        let plan = plan_sheet(
            Footprint::new(100.0, 100.0),
            Sheet::new(0.0, -50.0),
            no_waste_options(),
        );
        assert_eq!(plan.per_sheet, 0);
        assert_eq!(plan.utilization, 0.0);
    }

    #[test]
    fn test_plan_margin_larger_than_sheet() {
        let plan = plan_sheet(
            Footprint::new(10.0, 10.0),
            Sheet::new(100.0, 100.0),
            LayoutOptions {
                margin_mm: 60.0,
                gutter_mm: 0.0,
            },
        );
        assert_eq!(plan.per_sheet, 0);
    }

    #[test]
    fn test_plan_utilization_bounds() {
        // Perfect tiling → utilization exactly 1.0.
        let plan = plan_sheet(
            Footprint::new(100.0, 100.0),
            Sheet::new(400.0, 300.0),
            no_waste_options(),
        );
        assert_eq!(plan.per_sheet, 12);
        assert!((plan.utilization - 1.0).abs() < 1e-9);

        // Loose fit stays within (0, 1).
        let plan = plan_sheet(
            Footprint::new(210.0, 297.0),
            Sheet::new(700.0, 1000.0),
            LayoutOptions::default(),
        );
        assert!(plan.per_sheet > 0);
        assert!(plan.utilization > 0.0 && plan.utilization < 1.0);
    }

    // ── sheets_needed ───────────────────────────────────────────────────────

    #[test]
    fn test_sheets_needed_rounds_up() {
        assert_eq!(sheets_needed(10, 95), Some(10));
        assert_eq!(sheets_needed(10, 100), Some(10));
        assert_eq!(sheets_needed(10, 101), Some(11));
    }

    #[test]
    fn test_sheets_needed_zero_quantity() {
        assert_eq!(sheets_needed(10, 0), Some(0));
    }

    #[test]
    fn test_sheets_needed_nothing_fits() {
        assert_eq!(sheets_needed(0, 100), None);
    }

    #[test]
    fn test_a5_flyers_on_sra3_realistic() {
        // A5 (148×210) on SRA3 (320×450), default 10mm margin / 3mm gutter:
        // usable 300×430; normal: 2×2=4, rotated (210×148): 1×2=2.
        let plan = plan_sheet(
            Footprint::new(148.0, 210.0),
            Sheet::new(320.0, 450.0),
            LayoutOptions::default(),
        );
        assert_eq!(plan.best.orientation, Orientation::Normal);
        assert_eq!(plan.per_sheet, 4);
        assert_eq!(sheets_needed(plan.per_sheet, 1000), Some(250));
    }
}
