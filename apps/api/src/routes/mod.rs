pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::allocation::handlers as employees;
use crate::costing::handlers as costing;
use crate::customers::handlers as customers;
use crate::designs::handlers as designs;
use crate::layout::handlers as layout;
use crate::leads::handlers as leads;
use crate::orders::handlers as orders;
use crate::quotation::handlers as quotations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Leads API
        .route(
            "/api/v1/leads",
            post(leads::handle_create_lead).get(leads::handle_list_leads),
        )
        .route("/api/v1/leads/funnel", get(leads::handle_funnel_report))
        .route("/api/v1/leads/:id", get(leads::handle_get_lead))
        .route(
            "/api/v1/leads/:id/status",
            patch(leads::handle_change_lead_status),
        )
        .route("/api/v1/leads/:id/assign", post(leads::handle_assign_lead))
        .route(
            "/api/v1/leads/:id/convert",
            post(leads::handle_convert_lead),
        )
        // Customers API
        .route(
            "/api/v1/customers",
            post(customers::handle_create_customer).get(customers::handle_list_customers),
        )
        .route("/api/v1/customers/:id", get(customers::handle_get_customer))
        .route(
            "/api/v1/customers/:id/orders",
            get(customers::handle_customer_orders),
        )
        // Orders API
        .route(
            "/api/v1/orders",
            post(orders::handle_create_order).get(orders::handle_list_orders),
        )
        .route("/api/v1/orders/:id", get(orders::handle_get_order))
        .route(
            "/api/v1/orders/:id/status",
            patch(orders::handle_change_status),
        )
        .route(
            "/api/v1/orders/:id/payments",
            post(orders::handle_record_payment).get(orders::handle_list_payments),
        )
        // Design-asset library
        .route(
            "/api/v1/orders/:id/designs",
            post(designs::handle_attach_design).get(designs::handle_list_designs),
        )
        .route(
            "/api/v1/designs/:id",
            patch(designs::handle_recategorize_design).delete(designs::handle_detach_design),
        )
        // Layout estimates
        .route("/api/v1/layout/estimate", post(layout::handle_estimate))
        .route("/api/v1/layout/bag", post(layout::handle_bag_estimate))
        .route("/api/v1/layout/box", post(layout::handle_box_estimate))
        // Costing tables
        .route(
            "/api/v1/materials",
            post(costing::handle_create_material).get(costing::handle_list_materials),
        )
        .route(
            "/api/v1/materials/:id",
            get(costing::handle_get_material).patch(costing::handle_update_material),
        )
        .route(
            "/api/v1/labor-rates",
            post(costing::handle_create_labor_rate).get(costing::handle_list_labor_rates),
        )
        .route(
            "/api/v1/products",
            post(costing::handle_create_product).get(costing::handle_list_products),
        )
        .route("/api/v1/products/:id", get(costing::handle_get_product))
        // Employees & allocation
        .route(
            "/api/v1/employees",
            post(employees::handle_create_employee).get(employees::handle_list_employees),
        )
        .route(
            "/api/v1/employees/workload",
            get(employees::handle_workload_report),
        )
        // Quotations
        .route(
            "/api/v1/orders/:id/quotations",
            post(quotations::handle_issue_quotation).get(quotations::handle_quotation_history),
        )
        .route(
            "/api/v1/orders/:id/quotations/snapshots",
            get(quotations::handle_snapshot_history),
        )
        .route(
            "/api/v1/quotations/:id",
            get(quotations::handle_get_quotation),
        )
        .with_state(state)
}
