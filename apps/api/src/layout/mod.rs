// Sheet-layout estimators: two-orientation imposition arithmetic, die-line
// derivation for bags/boxes, and the cost roll-up. All CPU-trivial pure math —
// no blocking offload needed.

pub mod cost;
pub mod dieline;
pub mod handlers;
pub mod sheet;

// Re-export the public API consumed by other modules (quotation, handlers).
pub use sheet::{plan_sheet, sheets_needed, Footprint, LayoutOptions, Sheet};
