//! Driver Routes
//!
//! The signed-in driver's assignments with per-state counters, the route
//! in progress, and start/finish actions.

use leptos::prelude::*;

use crate::api::planner;
use crate::components::common::{
    dismiss, error_of, load_into, mutate_into, mutate_into_then, use_cancel_token, EmptyState, ErrorBanner,
    PageHeader, Spinner, SuccessBanner,
};
use crate::context::use_session;
use crate::labels::long_date;
use crate::models::{CurrentRoute, DriverRoute, DriverRoutes};
use crate::page_state::PageState;
use crate::store::{store_navigate, use_shell_store, Screen};

/// Assignment states the backend counts, in filter order
const STATES: [(&str, &str); 3] = [("asignado", "Asignadas"), ("iniciado", "Iniciadas"), ("completado", "Completadas")];

type DriverView = (DriverRoutes, CurrentRoute);

fn state_key(route: &DriverRoute) -> String {
    route.estado.to_lowercase()
}

#[component]
pub fn MyRoutesPage() -> impl IntoView {
    let ctx = use_session();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<DriverView>::new());
    let filter = RwSignal::new(String::new());
    let notice = RwSignal::new(None::<String>);

    let fetch = move || {
        let client = ctx.client();
        let token = cancel.get_value();
        let estado = filter.get_untracked();
        async move {
            let estado = Some(estado.as_str()).filter(|e| !e.is_empty());
            futures::future::try_join(
                planner::my_routes(&client, estado, &token),
                planner::current_route(&client, &token),
            )
            .await
        }
    };
    let reload = move || load_into(state, "Error al cargar mis rutas", fetch);

    Effect::new(move |_| {
        filter.track();
        reload();
    });

    let start = move |ruta_id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into_then(
            state,
            "Error al iniciar la ruta",
            async move { planner::start_route(&client, ruta_id, &token).await },
            fetch,
            move || notice.set(Some(format!("Ruta #{} iniciada", ruta_id))),
        );
    };

    let finish = Callback::new(move |(ruta_id, notas): (i64, String)| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(
            state,
            "Error al finalizar la ruta",
            async move { planner::finish_route(&client, ruta_id, Some(notas.as_str()), &token).await },
            fetch,
        );
        notice.set(None);
    });

    let counter = move |label: &'static str, value: fn(&DriverRoutes) -> u32| {
        view! {
            <div class="stat-card">
                <div class="stat-value">{move || state.with(|s| s.data().map(|(r, _)| value(r)).unwrap_or(0))}</div>
                <div class="stat-label">{label}</div>
            </div>
        }
    };

    view! {
        <section class="page">
            <PageHeader title="Mis Rutas" icon="🚛" on_refresh=move |_| reload() />

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />
            <SuccessBanner message=notice />

            <div class="stat-grid">
                {counter("Total", |r| r.total)}
                {counter("Asignadas", |r| r.asignado)}
                {counter("Iniciadas", |r| r.iniciado)}
                {counter("Completadas", |r| r.completado)}
            </div>

            {move || state.with(|s| s.data().and_then(|(_, c)| c.ruta_actual.clone())).map(|current| view! {
                <div class="panel highlight">
                    <h3>"Ruta en curso"</h3>
                    <DriverRouteCard route=current on_start=start on_finish=finish />
                </div>
            })}

            <div class="filters">
                <select on:change=move |ev| filter.set(event_target_value(&ev))>
                    <option value="">"Todas"</option>
                    {STATES.iter().map(|(value, label)| view! { <option value=*value>{*label}</option> }).collect_view()}
                </select>
            </div>

            <Show when=move || state.with(|s| s.is_loading() && s.data().is_none())>
                <Spinner />
            </Show>
            <Show when=move || state.with(|s| s.data().is_some_and(|(r, _)| r.rutas.is_empty()))>
                <EmptyState message="No tienes rutas asignadas" />
            </Show>

            <div class="card-grid">
                <For
                    each=move || state.with(|s| s.data().map(|(r, _)| r.rutas.clone()).unwrap_or_default())
                    key=|r| (r.ruta_id, r.estado.clone())
                    children=move |route| view! { <DriverRouteCard route=route on_start=start on_finish=finish /> }
                />
            </div>
        </section>
    }
}

#[component]
fn DriverRouteCard(
    route: DriverRoute,
    #[prop(into)] on_start: Callback<i64>,
    on_finish: Callback<(i64, String)>,
) -> impl IntoView {
    let store = use_shell_store();
    let id = route.ruta_id;
    let key = state_key(&route);
    let notas = RwSignal::new(String::new());
    let finishing = RwSignal::new(false);

    view! {
        <article class="card">
            <div class="card-head">
                <strong>{format!("Ruta #{}", id)}</strong>
                <span class="chip">{route.estado.clone()}</span>
            </div>
            <p class="muted">{route.zona.clone().map(|z| format!("Zona {}", z))}</p>
            <p class="muted">{route.fecha_asignacion.as_deref().map(|d| format!("Asignada: {}", long_date(d)))}</p>
            <p class="muted">{route.fecha_inicio.as_deref().map(|d| format!("Iniciada: {}", long_date(d)))}</p>
            <p class="muted">{route.fecha_finalizacion.as_deref().map(|d| format!("Finalizada: {}", long_date(d)))}</p>
            <p>{route.notas.clone()}</p>
            <div class="card-actions">
                <button class="btn btn-text" on:click=move |_| store_navigate(&store, Screen::RouteDetail(id))>"Ver detalle"</button>
                {(key == "asignado").then(|| view! {
                    <button class="btn btn-primary" on:click=move |_| on_start.run(id)>"Iniciar"</button>
                })}
                {(key == "iniciado").then(|| view! {
                    <Show
                        when=move || finishing.get()
                        fallback=move || view! {
                            <button class="btn btn-primary" on:click=move |_| finishing.set(true)>"Finalizar"</button>
                        }
                    >
                        <textarea
                            rows="2"
                            placeholder="Notas (opcional)"
                            on:input=move |ev| notas.set(event_target_value(&ev))
                        ></textarea>
                        <button class="btn btn-primary" on:click=move |_| on_finish.run((id, notas.get_untracked()))>"Confirmar"</button>
                        <button class="btn btn-text" on:click=move |_| finishing.set(false)>"Cancelar"</button>
                    </Show>
                })}
            </div>
        </article>
    }
}
