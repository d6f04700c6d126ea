//! Routes Page
//!
//! Collection routes with their zones, plus backend route generation per
//! zone. A freshly generated route opens in the detail view.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{planner, routes};
use crate::components::common::{
    choice, dismiss, error_of, load_into, mutate_into, mutate_into_then, use_cancel_token, EmptyState,
    ErrorBanner, PageHeader, Spinner, StatusChip, SuccessBanner,
};
use crate::components::route_map::RouteMap;
use crate::context::use_session;
use crate::labels::{duration_minutes, long_date, Labeled};
use crate::models::{GeneratedRoute, LatLng, NewRoute, Route, RouteStatus, RouteType, Zone, ZoneRoutes};
use crate::page_state::PageState;
use crate::store::{store_navigate, use_shell_store, Screen};

type RoutesAndZones = (Vec<Route>, Vec<Zone>);

#[component]
pub fn RoutesPage() -> impl IntoView {
    let ctx = use_session();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<RoutesAndZones>::new());
    let dialog_open = RwSignal::new(false);
    let selected = RwSignal::new(None::<i64>);
    let notice = RwSignal::new(None::<String>);

    let fetch = move || {
        let client = ctx.client();
        let token = cancel.get_value();
        async move { routes::load_routes_and_zones(&client, &token).await }
    };
    let reload = move || load_into(state, "Error al cargar rutas", fetch);
    reload();

    let change_status = move |id: i64, estado: RouteStatus| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(
            state,
            "Error al actualizar estado",
            async move { routes::update_status(&client, id, estado, &token).await },
            fetch,
        );
    };

    let optimize = move |id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into_then(
            state,
            "Error al optimizar ruta",
            async move { routes::optimize(&client, id, &token).await },
            fetch,
            move || notice.set(Some("Ruta optimizada".to_string())),
        );
    };

    let create = Callback::new(move |form: NewRoute| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into_then(
            state,
            "Error al crear ruta",
            async move { routes::create(&client, &form, &token).await },
            fetch,
            move || dialog_open.set(false),
        );
    });

    let zones = Signal::derive(move || state.with(|s| s.data().map(|(_, z)| z.clone()).unwrap_or_default()));
    let selected_line = Signal::derive(move || {
        let Some(id) = selected.get() else { return Vec::<LatLng>::new() };
        state.with(|s| {
            s.data()
                .and_then(|(routes, _)| routes.iter().find(|r| r.id == id))
                .and_then(|r| r.puntos_ruta.as_ref())
                .map(|line| line.to_lat_lngs())
                .unwrap_or_default()
        })
    });

    view! {
        <section class="page">
            <PageHeader title="Generación de Rutas" icon="🗺️" on_refresh=move |_| reload()>
                <button class="btn btn-primary" on:click=move |_| dialog_open.set(true)>"+ Nueva Ruta"</button>
            </PageHeader>

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />
            <SuccessBanner message=notice />

            <ZoneGenerator zones=zones />

            <RouteMap route=selected_line height=320 />

            <Show when=move || state.with(|s| s.is_loading() && s.data().is_none())>
                <Spinner />
            </Show>
            <Show when=move || state.with(|s| s.data().is_some_and(|(r, _)| r.is_empty()))>
                <EmptyState message="No hay rutas registradas" />
            </Show>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Nombre"</th>
                        <th>"Tipo"</th>
                        <th>"Estado"</th>
                        <th>"Vehículo"</th>
                        <th>"Conductor"</th>
                        <th>"Distancia"</th>
                        <th>"Duración"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || state.with(|s| s.data().map(|(r, _)| r.clone()).unwrap_or_default())
                        key=|r| (r.id, r.estado)
                        children=move |route| {
                            let id = route.id;
                            view! {
                                <tr class:selected=move || selected.get() == Some(id)>
                                    <td>
                                        <a href="#" on:click=move |ev| { ev.prevent_default(); selected.set(Some(id)); }>
                                            {route.nombre.clone()}
                                        </a>
                                    </td>
                                    <td>{route.tipo_ruta.label()}</td>
                                    <td><StatusChip label=route.estado.label() color=route.estado.color() /></td>
                                    <td>{route.vehiculo.as_ref().map(|v| v.placa.clone()).unwrap_or_else(|| "—".to_string())}</td>
                                    <td>{route.conductor.as_ref().map(|c| c.name().to_string()).unwrap_or_else(|| "—".to_string())}</td>
                                    <td>{route.distancia_km.map(|d| format!("{:.1} km", d)).unwrap_or_else(|| "—".to_string())}</td>
                                    <td>{route.duracion_estimada.map(duration_minutes).unwrap_or_else(|| "—".to_string())}</td>
                                    <td class="row-actions">
                                        <select
                                            prop:value=route.estado.as_str()
                                            on:change=move |ev| {
                                                if let Some(estado) = choice(&RouteStatus::ALL, &event_target_value(&ev), RouteStatus::as_str) {
                                                    change_status(id, estado);
                                                }
                                            }
                                        >
                                            {RouteStatus::ALL.iter().map(|s| view! { <option value=s.as_str()>{s.label()}</option> }).collect_view()}
                                        </select>
                                        <button class="btn btn-text" on:click=move |_| optimize(id)>"Optimizar"</button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <Show when=move || dialog_open.get()>
                <RouteDialog zones=zones on_submit=create on_close=move |_| dialog_open.set(false) />
            </Show>
        </section>
    }
}

/// Zone picker that generates a route or lists the zone's generated routes
#[component]
fn ZoneGenerator(zones: Signal<Vec<Zone>>) -> impl IntoView {
    let ctx = use_session();
    let store = use_shell_store();
    let cancel = use_cancel_token();
    let zona = RwSignal::new(String::new());
    let generating = RwSignal::new(false);
    let listing = RwSignal::new(PageState::<ZoneRoutes>::new());

    let generate = move |_: leptos::ev::MouseEvent| {
        let target = zona.get_untracked().trim().to_string();
        if target.is_empty() || generating.get_untracked() {
            return;
        }
        generating.set(true);
        let client = ctx.client();
        let token = cancel.get_value();
        spawn_local(async move {
            let result = planner::generate_route(&client, &target, &token).await;
            generating.try_set(false);
            match result {
                Ok(route) => {
                    tracing::info!(route_id = route.id, zona = %target, "route generated");
                    store_navigate(&store, Screen::RouteDetail(route.id));
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    tracing::error!(error = %e, "route generation failed");
                    listing.try_update(|s| *s = std::mem::take(s).fail(&e, "Error al generar ruta"));
                }
            }
        });
    };

    let show_zone = move |_: leptos::ev::MouseEvent| {
        let target = zona.get_untracked().trim().to_string();
        if target.is_empty() {
            return;
        }
        load_into(listing, "Error al cargar rutas de la zona", move || {
            let client = ctx.client();
            let token = cancel.get_value();
            async move { planner::routes_by_zone(&client, &target, &token).await }
        });
    };

    view! {
        <div class="panel">
            <h3>"Generar ruta por zona"</h3>
            <div class="form-row">
                <input
                    type="text"
                    list="zone-names"
                    placeholder="Zona (p. ej. centro)"
                    prop:value=zona
                    on:input=move |ev| zona.set(event_target_value(&ev))
                />
                <datalist id="zone-names">
                    {move || zones.get().into_iter().map(|z| view! { <option value=z.nombre.clone()></option> }).collect_view()}
                </datalist>
                <button class="btn btn-primary" disabled=move || generating.get() on:click=generate>
                    {move || if generating.get() { "Generando..." } else { "Generar" }}
                </button>
                <button class="btn btn-outlined" on:click=show_zone>"Ver rutas de la zona"</button>
            </div>

            <ErrorBanner message=error_of(listing) on_dismiss=move |_| dismiss(listing) />

            {move || listing.with(|s| s.data().cloned()).map(|zone| view! {
                <p class="muted">{format!("{} rutas generadas", zone.total)}</p>
                <ul class="plain-list">
                    {zone.rutas.into_iter().map(|r| view! { <GeneratedRouteRow route=r /> }).collect_view()}
                </ul>
            })}
        </div>
    }
}

#[component]
fn GeneratedRouteRow(route: GeneratedRoute) -> impl IntoView {
    let store = use_shell_store();
    let id = route.id;
    view! {
        <li>
            <a href="#" on:click=move |ev| { ev.prevent_default(); store_navigate(&store, Screen::RouteDetail(id)); }>
                {format!("Ruta #{} ({})", route.id, route.estado)}
            </a>
            <span class="muted">
                {route.fecha_generacion.as_deref().map(long_date).unwrap_or_default()}
            </span>
        </li>
    }
}

#[component]
fn RouteDialog(
    zones: Signal<Vec<Zone>>,
    on_submit: Callback<NewRoute>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let form = RwSignal::new(NewRoute::default());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(form.get());
    };

    view! {
        <div class="modal-backdrop">
            <form class="modal" on:submit=submit>
                <h2>"Nueva Ruta"</h2>
                <label>"Nombre"
                    <input type="text" required on:input=move |ev| form.update(|f| f.nombre = event_target_value(&ev)) />
                </label>
                <label>"Descripción"
                    <textarea rows="2" on:input=move |ev| form.update(|f| f.descripcion = event_target_value(&ev))></textarea>
                </label>
                <label>"Tipo de ruta"
                    <select on:change=move |ev| {
                        if let Some(t) = choice(&RouteType::ALL, &event_target_value(&ev), RouteType::as_str) {
                            form.update(|f| f.tipo_ruta = t);
                        }
                    }>
                        {RouteType::ALL.iter().map(|t| view! { <option value=t.as_str()>{t.label()}</option> }).collect_view()}
                    </select>
                </label>
                <label>"Zona"
                    <select on:change=move |ev| {
                        let zona_id = event_target_value(&ev).parse::<i64>().ok();
                        form.update(|f| f.zona_id = zona_id);
                    }>
                        <option value="">"Sin zona"</option>
                        {move || zones.get().into_iter().map(|z| view! { <option value=z.id.to_string()>{z.nombre}</option> }).collect_view()}
                    </select>
                </label>
                <div class="modal-actions">
                    <button type="button" class="btn btn-text" on:click=move |_| on_close.run(())>"Cancelar"</button>
                    <button type="submit" class="btn btn-primary">"Crear"</button>
                </div>
            </form>
        </div>
    }
}
