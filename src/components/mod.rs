//! UI Components
//!
//! Shell widgets and one component per page.

mod common;
mod delete_confirm_button;
mod sidebar;
mod login;
mod route_map;
mod dashboard;
mod incidents_page;
mod routes_page;
mod route_detail;
mod my_routes;
mod tasks_page;
mod notifications_page;
mod reports_page;

pub use common::use_cancel_token;
pub use sidebar::{Sidebar, TopBar};
pub use login::Login;
pub use dashboard::Dashboard;
pub use incidents_page::IncidentsPage;
pub use routes_page::RoutesPage;
pub use route_detail::RouteDetailPage;
pub use my_routes::MyRoutesPage;
pub use tasks_page::TasksPage;
pub use notifications_page::NotificationsPage;
pub use reports_page::ReportsPage;
