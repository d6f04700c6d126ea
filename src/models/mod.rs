//! Frontend Models
//!
//! Records matching the backend's JSON. Field names stay in the backend's
//! Spanish and closed enumerations tolerate unknown values.

mod common;
mod user;
mod incident;
mod route;
mod planner;
mod task;
mod notification;
mod report;

pub use common::{GeoLine, GeoPoint, LatLng, Listing, PersonRef, StatusPatch};
pub use user::{AuthResponse, OtpPurpose, OtpRequested, RegisterForm, Session, TokenPair, User};
pub use incident::{Incident, IncidentFilter, IncidentStatus, IncidentType, NewIncident, Priority};
pub use route::{NewRoute, Route, RouteStatus, RouteType, Vehicle, Zone};
pub use planner::{
    Assignment, AssignmentResult, CurrentRoute, DriverRoute, DriverRoutes, GeneratedRoute,
    RouteDetail, RouteIncident, Waypoint, ZoneRoutes,
};
pub use task::{NewTask, RouteRef, Task, TaskStatus, TaskType};
pub use notification::{MarkedAsRead, Notification, NotificationKind, UnreadCount};
pub use report::{DateRange, ExportFormat, ExportedReport, Statistics};
