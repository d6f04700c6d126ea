//! EPAGAL Frontend App
//!
//! Session gate, navigation shell and page switch.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::{notifications, ApiClient};
use crate::components::{
    Dashboard, IncidentsPage, Login, MyRoutesPage, NotificationsPage, ReportsPage, RouteDetailPage,
    RoutesPage, Sidebar, TasksPage, TopBar,
};
use crate::config::AppConfig;
use crate::context::SessionContext;
use crate::session::SessionStore;
use crate::store::{store_set_unread, use_shell_store, Screen, ShellState, ShellStateStoreFields, ShellStore};

fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::default();
    let storage = SessionStore::browser();
    let (session, set_session) = signal(storage.restore());

    // Any unrecoverable 401/403 lands back on the login screen
    let client = ApiClient::browser(&config, storage).on_unauthorized(move || {
        set_session.try_set(None);
    });
    let ctx = SessionContext::new(client, (session, set_session));

    provide_context(ctx);
    provide_context(config);
    provide_context::<ShellStore>(Store::new(ShellState::starting_at(Screen::from_path(&current_hash()))));

    #[cfg(feature = "dev-autologin")]
    dev_autologin(ctx);

    view! {
        <Show when=move || ctx.is_signed_in() fallback=|| view! { <Login /> }>
            <Layout />
        </Show>
    }
}

#[component]
fn Layout() -> impl IntoView {
    let store = use_shell_store();
    let ctx = crate::context::use_session();

    // Back/forward buttons
    let hash_listener = window_event_listener(leptos::ev::hashchange, move |_| {
        let screen = Screen::from_path(&current_hash());
        if store.screen().get_untracked() != screen {
            store.screen().set(screen);
        }
    });
    on_cleanup(move || hash_listener.remove());

    // Badge count on sign-in; the notifications page keeps it fresh afterwards
    let cancel = crate::components::use_cancel_token().get_value();
    let client = ctx.client();
    spawn_local(async move {
        if let Ok(count) = notifications::unread_count(&client, &cancel).await {
            store_set_unread(&store, count);
        }
    });

    view! {
        <div class="app-layout">
            <Sidebar />
            <div class="main-column">
                <TopBar />
                <main class="main-content">
                    {move || match store.screen().get() {
                        Screen::Dashboard => view! { <Dashboard /> }.into_any(),
                        Screen::MyRoutes => view! { <MyRoutesPage /> }.into_any(),
                        Screen::Routes => view! { <RoutesPage /> }.into_any(),
                        Screen::RouteDetail(id) => view! { <RouteDetailPage route_id=id /> }.into_any(),
                        Screen::Incidents => view! { <IncidentsPage /> }.into_any(),
                        Screen::Tasks => view! { <TasksPage /> }.into_any(),
                        Screen::Notifications => view! { <NotificationsPage /> }.into_any(),
                        Screen::Reports => view! { <ReportsPage /> }.into_any(),
                    }}
                </main>
            </div>
        </div>
    }
}

/// Development convenience: sign in with build-time credentials when
/// served from localhost with no stored token.
#[cfg(feature = "dev-autologin")]
fn dev_autologin(ctx: SessionContext) {
    use crate::api::{auth, CancelToken};

    let host = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();
    let client = ctx.client();
    if !matches!(host.as_str(), "localhost" | "127.0.0.1") || client.session().access_token().is_some() {
        return;
    }

    let user = option_env!("EPAGAL_DEV_USER").unwrap_or("admin@latacunga.gob.ec");
    let password = option_env!("EPAGAL_DEV_PASSWORD").unwrap_or("admin123");
    tracing::warn!(user, "dev auto-login");
    spawn_local(async move {
        match auth::login(&client, user, password, &CancelToken::new()).await {
            Ok(session) => ctx.signed_in(session),
            Err(e) => tracing::warn!(error = %e, "dev auto-login failed"),
        }
    });
}
