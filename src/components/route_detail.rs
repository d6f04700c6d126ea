//! Generated Route Detail
//!
//! Summary, incident list, ordered waypoints and the route drawn on the map.

use leptos::prelude::*;

use crate::api::planner;
use crate::components::common::{dismiss, error_of, load_into, use_cancel_token, ErrorBanner, PageHeader, Spinner};
use crate::components::route_map::{MapMarker, RouteMap};
use crate::context::use_session;
use crate::labels::long_date;
use crate::models::{Assignment, RouteDetail, RouteIncident};
use crate::page_state::PageState;
use crate::store::{store_navigate, use_shell_store, Screen};

/// Marker color by incident severity
fn severity_color(incident: &RouteIncident) -> &'static str {
    match incident.gravedad {
        g if g >= 4 => "#d32f2f",
        3 => "#ff9800",
        _ => "#2196f3",
    }
}

#[component]
pub fn RouteDetailPage(route_id: i64) -> impl IntoView {
    let ctx = use_session();
    let store = use_shell_store();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<(RouteDetail, Vec<Assignment>)>::new());

    let reload = move || {
        load_into(state, "Error al cargar el detalle de la ruta", move || {
            let client = ctx.client();
            let token = cancel.get_value();
            async move {
                futures::future::try_join(
                    planner::route_details(&client, route_id, &token),
                    planner::assignments_for_route(&client, route_id, &token),
                )
                .await
            }
        })
    };
    reload();

    let path = Signal::derive(move || state.with(|s| s.data().map(|(d, _)| d.path()).unwrap_or_default()));
    let markers = Signal::derive(move || {
        state.with(|s| {
            s.data()
                .map(|(d, _)| {
                    d.incidencias
                        .iter()
                        .map(|i| MapMarker {
                            at: crate::models::LatLng::new(i.lat, i.lon),
                            color: severity_color(i).to_string(),
                            popup: format!("#{} {} (gravedad {})", i.id, i.tipo, i.gravedad),
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
    });

    view! {
        <section class="page">
            <PageHeader title=format!("Ruta #{}", route_id) icon="🗺️" on_refresh=move |_| reload()>
                <button class="btn btn-text" on:click=move |_| store_navigate(&store, Screen::Routes)>"← Volver"</button>
            </PageHeader>

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />

            <Show when=move || state.with(|s| s.is_loading() && s.data().is_none())>
                <Spinner />
            </Show>

            {move || state.with(|s| s.data().cloned()).map(|(detail, assignments)| {
                let trucks = detail.trucks();
                let unassigned = assignments.is_empty();
                view! {
                    <div class="stat-grid">
                        <div class="stat-card">
                            <div class="stat-value">{detail.ruta.zona.clone()}</div>
                            <div class="stat-label">"Zona"</div>
                        </div>
                        <div class="stat-card">
                            <div class="stat-value">{detail.ruta.estado.clone()}</div>
                            <div class="stat-label">"Estado"</div>
                        </div>
                        <div class="stat-card">
                            <div class="stat-value">{format!("{:.0}", detail.ruta.suma_gravedad)}</div>
                            <div class="stat-label">"Gravedad total"</div>
                        </div>
                        <div class="stat-card">
                            <div class="stat-value">{detail.ruta.camiones_usados}</div>
                            <div class="stat-label">"Camiones"</div>
                        </div>
                        <div class="stat-card">
                            <div class="stat-value">{format!("{:.1} km", detail.ruta.costo_total_metros / 1000.0)}</div>
                            <div class="stat-label">"Distancia"</div>
                        </div>
                        <div class="stat-card">
                            <div class="stat-value">{detail.ruta.duracion_estimada.clone().unwrap_or_else(|| "—".to_string())}</div>
                            <div class="stat-label">"Duración estimada"</div>
                        </div>
                    </div>
                    <p class="muted">
                        {detail.ruta.fecha_generacion.as_deref().map(|d| format!("Generada el {}", long_date(d)))}
                        {(!trucks.is_empty()).then(|| format!(" · Camiones: {}", trucks.join(", ")))}
                    </p>

                    <div class="two-columns">
                        <div class="panel">
                            <h3>{format!("Incidencias ({})", detail.incidencias.len())}</h3>
                            <ul class="plain-list">
                                {detail.incidencias.iter().map(|i| view! {
                                    <li>
                                        <strong>{format!("#{} {}", i.id, i.tipo)}</strong>
                                        <span class="chip" style=format!("background-color: {}", severity_color(i))>
                                            {format!("Gravedad {}", i.gravedad)}
                                        </span>
                                        <div class="muted">{i.descripcion.clone()}</div>
                                    </li>
                                }).collect_view()}
                            </ul>
                        </div>
                        <div class="panel">
                            <h3>{format!("Puntos de ruta ({})", detail.puntos.len())}</h3>
                            <ol class="waypoints">
                                {{
                                    let mut puntos = detail.puntos.clone();
                                    puntos.sort_by_key(|p| p.orden);
                                    puntos.into_iter().map(|p| view! {
                                        <li>
                                            {format!("{} · {} {}", p.tipo_punto, p.camion_tipo, p.camion_id)}
                                            <span class="muted">{format!(" ({:.5}, {:.5})", p.lat, p.lon)}</span>
                                        </li>
                                    }).collect_view()
                                }}
                            </ol>
                        </div>
                    </div>

                    <div class="panel">
                        <h3>"Asignaciones"</h3>
                        {unassigned.then(|| view! { <p class="muted">"Sin conductores asignados"</p> })}
                        <ul class="plain-list">
                            {assignments.into_iter().map(|a| view! {
                                <li>
                                    {format!("Conductor {} · {}", a.conductor_id, a.estado)}
                                    <span class="muted">
                                        {a.fecha_inicio.as_deref().map(|d| format!(" · Inicio: {}", long_date(d)))}
                                        {a.fecha_finalizacion.as_deref().map(|d| format!(" · Fin: {}", long_date(d)))}
                                    </span>
                                </li>
                            }).collect_view()}
                        </ul>
                    </div>
                }
            })}

            <RouteMap markers=markers route=path />
        </section>
    }
}
