//! Shell State Store
//!
//! Uses Leptos reactive_stores for the navigation state shared by the
//! sidebar, the top bar and the pages.

use leptos::prelude::*;
use reactive_stores::Store;

/// Which page the shell is showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Dashboard,
    MyRoutes,
    Routes,
    RouteDetail(i64),
    Incidents,
    Tasks,
    Notifications,
    Reports,
}

/// Sidebar entries, in display order
pub const NAV_ITEMS: &[(Screen, &str, &str)] = &[
    (Screen::Dashboard, "Dashboard", "📊"),
    (Screen::MyRoutes, "Mis Rutas", "🚛"),
    (Screen::Routes, "Generación de Rutas", "🗺️"),
    (Screen::Incidents, "Incidencias", "⚠️"),
    (Screen::Tasks, "Tareas", "✅"),
    (Screen::Notifications, "Notificaciones", "🔔"),
    (Screen::Reports, "Reportes", "📈"),
];

impl Screen {
    /// Location hash path, e.g. `/rutas/12`
    pub fn path(&self) -> String {
        match self {
            Screen::Dashboard => "/dashboard".to_string(),
            Screen::MyRoutes => "/rutas".to_string(),
            Screen::Routes => "/routes".to_string(),
            Screen::RouteDetail(id) => format!("/rutas/{}", id),
            Screen::Incidents => "/incidents".to_string(),
            Screen::Tasks => "/tasks".to_string(),
            Screen::Notifications => "/notifications".to_string(),
            Screen::Reports => "/reports".to_string(),
        }
    }

    /// Unknown paths land on the dashboard
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_start_matches('#').trim_end_matches('/');
        match path {
            "/rutas" => Screen::MyRoutes,
            "/routes" => Screen::Routes,
            "/incidents" => Screen::Incidents,
            "/tasks" => Screen::Tasks,
            "/notifications" => Screen::Notifications,
            "/reports" => Screen::Reports,
            other => other
                .strip_prefix("/rutas/")
                .and_then(|id| id.parse().ok())
                .map(Screen::RouteDetail)
                .unwrap_or(Screen::Dashboard),
        }
    }

    /// Sidebar entry highlighted for this screen
    pub fn nav_parent(&self) -> Screen {
        match self {
            Screen::RouteDetail(_) => Screen::Routes,
            other => *other,
        }
    }
}

/// Shell state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct ShellState {
    pub screen: Screen,
    /// Badge count, refreshed by the notifications page and the shell
    pub unread_notifications: u64,
    /// Mobile drawer
    pub sidebar_open: bool,
}

impl ShellState {
    pub fn starting_at(screen: Screen) -> Self {
        Self { screen, ..Default::default() }
    }
}

pub type ShellStore = Store<ShellState>;

pub fn use_shell_store() -> ShellStore {
    expect_context::<ShellStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Switch page and mirror it into the location hash
pub fn store_navigate(store: &ShellStore, screen: Screen) {
    store.screen().set(screen);
    store.sidebar_open().set(false);
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_hash(&screen.path());
    }
}

pub fn store_set_unread(store: &ShellStore, count: u64) {
    store.unread_notifications().set(count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip_for_every_nav_item() {
        for (screen, _, _) in NAV_ITEMS {
            assert_eq!(Screen::from_path(&screen.path()), *screen);
        }
        assert_eq!(Screen::from_path("#/rutas/12"), Screen::RouteDetail(12));
    }

    #[test]
    fn test_unknown_paths_fall_back() {
        assert_eq!(Screen::from_path(""), Screen::Dashboard);
        assert_eq!(Screen::from_path("/rutas/abc"), Screen::Dashboard);
        assert_eq!(Screen::from_path("/admin"), Screen::Dashboard);
    }

    #[test]
    fn test_detail_highlights_route_generation() {
        assert_eq!(Screen::RouteDetail(3).nav_parent(), Screen::Routes);
        assert_eq!(Screen::Tasks.nav_parent(), Screen::Tasks);
    }
}
