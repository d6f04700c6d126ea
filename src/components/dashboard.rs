//! Dashboard
//!
//! Welcome panel, thirty-day counters, shortcuts to the main pages and the
//! tail of the in-memory log.

use chrono::Utc;
use leptos::prelude::*;

use crate::api::reports;
use crate::components::common::{dismiss, error_of, load_into, use_cancel_token, ErrorBanner, PageHeader};
use crate::context::use_session;
use crate::models::{DateRange, Statistics};
use crate::page_state::PageState;
use crate::store::{store_navigate, use_shell_store, Screen, NAV_ITEMS};

const LOG_TAIL: usize = 8;

#[component]
pub fn Dashboard() -> impl IntoView {
    let ctx = use_session();
    let store = use_shell_store();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<Statistics>::new());

    let reload = move || {
        load_into(state, "Error al cargar estadísticas", move || {
            let client = ctx.client();
            let token = cancel.get_value();
            let range = DateRange::last_30_days(Utc::now().date_naive());
            async move { reports::statistics(&client, &range, &token).await }
        })
    };
    reload();

    let log_lines = RwSignal::new(Vec::<String>::new());
    let refresh_log = move || {
        let lines = rolling_logger::recent_lines();
        let skip = lines.len().saturating_sub(LOG_TAIL);
        log_lines.set(lines.into_iter().skip(skip).collect());
    };
    refresh_log();

    let counter = move |label: &'static str, value: fn(&Statistics) -> String| {
        view! {
            <div class="stat-card">
                <div class="stat-value">
                    {move || state.with(|s| s.data().map(value).unwrap_or_else(|| "—".to_string()))}
                </div>
                <div class="stat-label">{label}</div>
            </div>
        }
    };

    view! {
        <section class="page">
            <PageHeader title="Dashboard" icon="📊" on_refresh=move |_| { reload(); refresh_log(); } />

            <div class="welcome">
                <h2>{move || format!("Bienvenido, {}", ctx.user().map(|u| u.name()).unwrap_or_default())}</h2>
                <p class="muted">"Sistema de gestión de residuos sólidos de Latacunga. Resumen de los últimos 30 días."</p>
            </div>

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />

            <div class="stat-grid">
                {counter("Incidencias", |s| s.total_incidencias.to_string())}
                {counter("Rutas activas", |s| format!("{} / {}", s.rutas_activas, s.total_rutas))}
                {counter("Tareas pendientes", |s| s.tareas_pendientes.to_string())}
                {counter("Tareas completadas", |s| format!("{}%", s.task_completion_percent()))}
            </div>

            <h3>"Accesos rápidos"</h3>
            <div class="quick-nav">
                {NAV_ITEMS
                    .iter()
                    .filter(|(screen, _, _)| *screen != Screen::Dashboard)
                    .map(|&(screen, label, icon)| view! {
                        <button class="btn btn-outlined" on:click=move |_| store_navigate(&store, screen)>
                            <span class="nav-icon">{icon}</span>{label}
                        </button>
                    })
                    .collect_view()}
            </div>

            <h3>"Actividad reciente"</h3>
            <pre class="log-tail">
                {move || {
                    let lines = log_lines.get();
                    if lines.is_empty() { "Sin actividad registrada".to_string() } else { lines.join("\n") }
                }}
            </pre>
        </section>
    }
}
