//! Cost roll-up for a layout estimate. All money is in integer minor currency
//! units; the only rounding point is the margin multiplication (half-up).

use serde::{Deserialize, Serialize};

/// Inputs to a single-line cost roll-up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostInputs {
    pub sheets: u32,
    /// Minor units per sheet.
    pub cost_per_sheet: i64,
    pub labor_hours: f64,
    /// Minor units per hour.
    pub hourly_rate: i64,
    /// Minor units, one-off.
    pub setup_fee: i64,
    /// Percent, e.g. 25.0 for +25%.
    pub margin_percent: f64,
}

/// Every component of the computed price, so a quotation can itemize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material: i64,
    pub labor: i64,
    pub setup_fee: i64,
    pub subtotal: i64,
    pub margin: i64,
    pub total: i64,
}

/// Rounds half-up, negative-safe (margins are never negative in practice, but
/// the arithmetic must not surprise if one is).
pub(crate) fn round_half_up(value: f64) -> i64 {
    if value >= 0.0 {
        (value + 0.5).floor() as i64
    } else {
        (value - 0.5).ceil() as i64
    }
}

pub fn roll_up(inputs: &CostInputs) -> CostBreakdown {
    let material = inputs.sheets as i64 * inputs.cost_per_sheet;
    let labor = round_half_up(inputs.labor_hours * inputs.hourly_rate as f64);
    let subtotal = material + labor + inputs.setup_fee;
    let margin = round_half_up(subtotal as f64 * inputs.margin_percent / 100.0);

    CostBreakdown {
        material,
        labor,
        setup_fee: inputs.setup_fee,
        subtotal,
        margin,
        total: subtotal + margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> CostInputs {
        CostInputs {
            sheets: 250,
            cost_per_sheet: 120,   // 1.20 per sheet
            labor_hours: 2.5,
            hourly_rate: 15_000,   // 150.00/h
            setup_fee: 5_000,      // 50.00
            margin_percent: 20.0,
        }
    }

    #[test]
    fn test_roll_up_components() {
        let b = roll_up(&inputs());
        assert_eq!(b.material, 30_000);
        assert_eq!(b.labor, 37_500);
        assert_eq!(b.setup_fee, 5_000);
        assert_eq!(b.subtotal, 72_500);
        assert_eq!(b.margin, 14_500);
        assert_eq!(b.total, 87_000);
    }

    #[test]
    fn test_zero_margin() {
        let mut i = inputs();
        i.margin_percent = 0.0;
        let b = roll_up(&i);
        assert_eq!(b.margin, 0);
        assert_eq!(b.total, b.subtotal);
    }

    #[test]
    fn test_margin_rounds_half_up() {
        // subtotal 1001 at 0.05% → 0.5005 → rounds to 1.
        let b = roll_up(&CostInputs {
            sheets: 0,
            cost_per_sheet: 0,
            labor_hours: 0.0,
            hourly_rate: 0,
            setup_fee: 1001,
            margin_percent: 0.05,
        });
        assert_eq!(b.margin, 1);
    }

    #[test]
    fn test_fractional_labor_hours_round() {
        // 1/3 hour at 100/h = 33.33… → 33.
        let b = roll_up(&CostInputs {
            sheets: 0,
            cost_per_sheet: 0,
            labor_hours: 1.0 / 3.0,
            hourly_rate: 100,
            setup_fee: 0,
            margin_percent: 0.0,
        });
        assert_eq!(b.labor, 33);
    }

    #[test]
    fn test_all_zero_inputs() {
        let b = roll_up(&CostInputs {
            sheets: 0,
            cost_per_sheet: 0,
            labor_hours: 0.0,
            hourly_rate: 0,
            setup_fee: 0,
            margin_percent: 25.0,
        });
        assert_eq!(b.total, 0);
    }
}
