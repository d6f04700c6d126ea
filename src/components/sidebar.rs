//! Navigation Shell
//!
//! Sidebar with the page list and the top bar with the user and logout.

use leptos::prelude::*;

use crate::context::use_session;
use crate::store::{store_navigate, use_shell_store, Screen, ShellStateStoreFields, NAV_ITEMS};

#[component]
pub fn Sidebar() -> impl IntoView {
    let store = use_shell_store();

    let sidebar_class = move || {
        if store.sidebar_open().get() {
            "sidebar open"
        } else {
            "sidebar"
        }
    };

    view! {
        <nav class=sidebar_class>
            <div class="sidebar-brand">"🗑️ EPAGAL"</div>
            <ul class="nav-list">
                {NAV_ITEMS.iter().map(|(screen, label, icon)| {
                    let screen = *screen;
                    let is_active = move || store.screen().get().nav_parent() == screen;
                    view! {
                        <li>
                            <button
                                class=move || if is_active() { "nav-item active" } else { "nav-item" }
                                on:click=move |_| store_navigate(&store, screen)
                            >
                                <span class="nav-icon">{*icon}</span>
                                <span class="nav-label">{*label}</span>
                                <Show when=move || (screen == Screen::Notifications && store.unread_notifications().get() > 0)>
                                    <span class="badge">{move || store.unread_notifications().get()}</span>
                                </Show>
                            </button>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </nav>
    }
}

#[component]
pub fn TopBar() -> impl IntoView {
    let ctx = use_session();
    let store = use_shell_store();

    let user_name = move || ctx.user().map(|u| u.name()).unwrap_or_default();
    let user_role = move || ctx.user().map(|u| u.role).unwrap_or_default();

    view! {
        <header class="top-bar">
            <button
                class="menu-toggle"
                title="Menú"
                on:click=move |_| store.sidebar_open().update(|open| *open = !*open)
            >
                "☰"
            </button>
            <span class="top-bar-title">"Gestión de Residuos Latacunga"</span>
            <div class="top-bar-user">
                <button class="icon-btn" title="Notificaciones" on:click=move |_| store_navigate(&store, Screen::Notifications)>
                    "🔔"
                    <Show when=move || (store.unread_notifications().get() > 0)>
                        <span class="badge">{move || store.unread_notifications().get()}</span>
                    </Show>
                </button>
                <span class="user-name">{user_name}</span>
                <span class="user-role">{user_role}</span>
                <button class="btn btn-outlined" on:click=move |_| ctx.logout()>"Cerrar sesión"</button>
            </div>
        </header>
    }
}
