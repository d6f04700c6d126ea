//! Incidents Page
//!
//! Map of reported incidents, filterable cards, status changes, deletion
//! and the report dialog.

use leptos::prelude::*;

use crate::api::incidents;
use crate::components::common::{
    choice, dismiss, error_of, load_into, mutate_into, mutate_into_then, use_cancel_token, EmptyState,
    ErrorBanner, PageHeader, Spinner, StatusChip,
};
use crate::components::delete_confirm_button::DeleteConfirmButton;
use crate::components::route_map::{MapMarker, RouteMap};
use crate::context::use_session;
use crate::labels::{long_date, Labeled};
use crate::models::{GeoPoint, Incident, IncidentFilter, IncidentStatus, IncidentType, NewIncident, Priority};
use crate::page_state::PageState;

const LOAD_ERROR: &str = "Error al cargar incidencias";

#[component]
pub fn IncidentsPage() -> impl IntoView {
    let ctx = use_session();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<Vec<Incident>>::new());
    let filter = RwSignal::new(IncidentFilter::default());
    let dialog_open = RwSignal::new(false);

    let fetch = move || {
        let client = ctx.client();
        let token = cancel.get_value();
        let filter = filter.get_untracked();
        async move { incidents::list(&client, &filter, &token).await }
    };
    let reload = move || load_into(state, LOAD_ERROR, fetch);

    // Initial load and on every filter change
    Effect::new(move |_| {
        filter.track();
        reload();
    });

    let change_status = move |id: i64, estado: IncidentStatus| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(
            state,
            "Error al actualizar estado",
            async move { incidents::update_status(&client, id, estado, &token).await },
            fetch,
        );
    };

    let delete = move |id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(
            state,
            "Error al eliminar incidencia",
            async move { incidents::delete(&client, id, &token).await },
            fetch,
        );
    };

    let create = Callback::new(move |form: NewIncident| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into_then(
            state,
            "Error al crear incidencia",
            async move { incidents::create(&client, &form, &token).await },
            fetch,
            move || dialog_open.set(false),
        );
    });

    let markers = Signal::derive(move || {
        state.with(|s| {
            s.items()
                .iter()
                .filter_map(|i| {
                    i.ubicacion.as_ref().map(|p| MapMarker {
                        at: p.to_lat_lng(),
                        color: i.prioridad.color().to_string(),
                        popup: format!("{} ({}): {}", i.tipo.label(), i.estado.label(), i.descripcion),
                    })
                })
                .collect()
        })
    });

    view! {
        <section class="page">
            <PageHeader title="Gestión de Incidencias" icon="⚠️" on_refresh=move |_| reload()>
                <button class="btn btn-primary" on:click=move |_| dialog_open.set(true)>"+ Reportar Incidencia"</button>
            </PageHeader>

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />

            <div class="filters">
                <select on:change=move |ev| {
                    let estado = choice(&IncidentStatus::ALL, &event_target_value(&ev), IncidentStatus::as_str);
                    filter.update(|f| f.estado = estado);
                }>
                    <option value="">"Todos los estados"</option>
                    {IncidentStatus::ALL.iter().map(|s| view! { <option value=s.as_str()>{s.label()}</option> }).collect_view()}
                </select>
                <select on:change=move |ev| {
                    let tipo = choice(&IncidentType::ALL, &event_target_value(&ev), IncidentType::as_str);
                    filter.update(|f| f.tipo = tipo);
                }>
                    <option value="">"Todos los tipos"</option>
                    {IncidentType::ALL.iter().map(|t| view! { <option value=t.as_str()>{t.label()}</option> }).collect_view()}
                </select>
                <span class="count">{move || format!("{} incidencias", state.with(PageState::count))}</span>
            </div>

            <RouteMap markers=markers />

            <Show when=move || state.with(|s| s.is_loading() && s.data().is_none())>
                <Spinner />
            </Show>
            <Show when=move || state.with(|s| !s.is_loading() && s.count() == 0 && s.error().is_none())>
                <EmptyState message="No hay incidencias reportadas" />
            </Show>

            <div class="card-grid">
                <For
                    each=move || state.with(|s| s.items().to_vec())
                    key=|i| (i.id, i.estado)
                    children=move |incident| {
                        let id = incident.id;
                        view! {
                            <article class="card">
                                <div class="card-head">
                                    <strong>{incident.tipo.label()}</strong>
                                    <StatusChip label=incident.prioridad.label() color=incident.prioridad.color() />
                                </div>
                                <p class="card-body">{incident.descripcion.clone()}</p>
                                <p class="muted">"📍 " {if incident.direccion.is_empty() { "Sin dirección".to_string() } else { incident.direccion.clone() }}</p>
                                <p class="muted">
                                    {incident.reportado_por.as_ref().map(|p| format!("Reportado por {}", p.name()))}
                                </p>
                                <p class="muted">{incident.created_at.as_deref().map(long_date)}</p>
                                <div class="card-actions">
                                    <StatusChip label=incident.estado.label() color=incident.estado.color() />
                                    <select
                                        prop:value=incident.estado.as_str()
                                        on:change=move |ev| {
                                            if let Some(estado) = choice(&IncidentStatus::ALL, &event_target_value(&ev), IncidentStatus::as_str) {
                                                change_status(id, estado);
                                            }
                                        }
                                    >
                                        {IncidentStatus::ALL.iter().map(|s| view! { <option value=s.as_str()>{s.label()}</option> }).collect_view()}
                                    </select>
                                    <DeleteConfirmButton on_confirm=move |_| delete(id) />
                                </div>
                            </article>
                        }
                    }
                />
            </div>

            <Show when=move || dialog_open.get()>
                <IncidentDialog on_submit=create on_close=move |_| dialog_open.set(false) />
            </Show>
        </section>
    }
}

#[component]
fn IncidentDialog(on_submit: Callback<NewIncident>, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let form = RwSignal::new(NewIncident::default());
    let (lat, set_lat) = signal(form.with_untracked(|f| f.ubicacion.lat().to_string()));
    let (lon, set_lon) = signal(form.with_untracked(|f| f.ubicacion.lon().to_string()));
    let (invalid, set_invalid) = signal(None::<String>);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (Ok(lat), Ok(lon)) = (lat.get().trim().parse::<f64>(), lon.get().trim().parse::<f64>()) else {
            set_invalid.set(Some("Coordenadas inválidas".to_string()));
            return;
        };
        let mut incident = form.get();
        incident.ubicacion = GeoPoint::new(lon, lat);
        on_submit.run(incident);
    };

    view! {
        <div class="modal-backdrop">
            <form class="modal" on:submit=submit>
                <h2>"Reportar Nueva Incidencia"</h2>
                <Show when=move || invalid.with(Option::is_some)>
                    <div class="error-banner">{move || invalid.get().unwrap_or_default()}</div>
                </Show>
                <label>"Tipo de Incidencia"
                    <select on:change=move |ev| {
                        if let Some(tipo) = choice(&IncidentType::ALL, &event_target_value(&ev), IncidentType::as_str) {
                            form.update(|f| f.tipo = tipo);
                        }
                    }>
                        {IncidentType::ALL.iter().map(|t| view! {
                            <option value=t.as_str() selected=*t == IncidentType::Acumulacion>{t.label()}</option>
                        }).collect_view()}
                    </select>
                </label>
                <label>"Descripción"
                    <textarea required rows="3"
                        on:input=move |ev| form.update(|f| f.descripcion = event_target_value(&ev))
                    ></textarea>
                </label>
                <label>"Prioridad"
                    <select on:change=move |ev| {
                        if let Some(p) = choice(&Priority::ALL, &event_target_value(&ev), Priority::as_str) {
                            form.update(|f| f.prioridad = p);
                        }
                    }>
                        {Priority::ALL.iter().map(|p| view! {
                            <option value=p.as_str() selected=*p == Priority::Media>{p.label()}</option>
                        }).collect_view()}
                    </select>
                </label>
                <label>"Dirección"
                    <input type="text" on:input=move |ev| form.update(|f| f.direccion = event_target_value(&ev)) />
                </label>
                <div class="form-row">
                    <label>"Latitud"
                        <input type="number" step="any" prop:value=lat on:input=move |ev| set_lat.set(event_target_value(&ev)) />
                    </label>
                    <label>"Longitud"
                        <input type="number" step="any" prop:value=lon on:input=move |ev| set_lon.set(event_target_value(&ev)) />
                    </label>
                </div>
                <div class="modal-actions">
                    <button type="button" class="btn btn-text" on:click=move |_| on_close.run(())>"Cancelar"</button>
                    <button type="submit" class="btn btn-primary">"Reportar"</button>
                </div>
            </form>
        </div>
    }
}
