//! Reports Page
//!
//! Statistics over a date range drawn as bar charts, and report export
//! handed to the browser as a file download.

use chrono::{NaiveDate, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::{JsCast, JsValue};

use crate::api::reports;
use crate::components::common::{
    dismiss, error_of, load_into, use_cancel_token, ErrorBanner, PageHeader, Spinner, SuccessBanner,
};
use crate::context::use_session;
use crate::error::ApiError;
use crate::labels::{bars, breakdown_label};
use crate::models::{DateRange, ExportFormat, ExportedReport, Statistics};
use crate::page_state::PageState;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate the two date inputs
fn parse_range(start: &str, end: &str) -> Result<DateRange, &'static str> {
    let start = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT).map_err(|_| "Fecha de inicio inválida")?;
    let end = NaiveDate::parse_from_str(end.trim(), DATE_FORMAT).map_err(|_| "Fecha de fin inválida")?;
    if start > end {
        return Err("La fecha de inicio debe ser anterior a la fecha de fin");
    }
    Ok(DateRange { start, end })
}

/// Offer the bytes as a download through a temporary object URL
fn save_file(report: &ExportedReport) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(report.bytes.as_slice()));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(report.mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&report.file_name);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)
}

#[component]
pub fn ReportsPage() -> impl IntoView {
    let ctx = use_session();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<Statistics>::new());
    let initial = DateRange::last_30_days(Utc::now().date_naive());
    let start = RwSignal::new(initial.start.format(DATE_FORMAT).to_string());
    let end = RwSignal::new(initial.end.format(DATE_FORMAT).to_string());
    let range = RwSignal::new(initial);
    let exporting = RwSignal::new(None::<ExportFormat>);
    let notice = RwSignal::new(None::<String>);

    let reload = move || {
        load_into(state, "Error al cargar estadísticas", move || {
            let client = ctx.client();
            let token = cancel.get_value();
            let range = range.get_untracked();
            async move { reports::statistics(&client, &range, &token).await }
        })
    };
    reload();

    let apply = move |_: leptos::ev::MouseEvent| match parse_range(&start.get_untracked(), &end.get_untracked()) {
        Ok(parsed) => {
            range.set(parsed);
            reload();
        }
        Err(message) => {
            let invalid = ApiError::Validation(message.to_string());
            state.update(|s| *s = std::mem::take(s).fail(&invalid, message));
        }
    };

    let export = move |format: ExportFormat| {
        if exporting.get_untracked().is_some() {
            return;
        }
        exporting.set(Some(format));
        notice.set(None);
        let client = ctx.client();
        let token = cancel.get_value();
        let range = range.get_untracked();
        spawn_local(async move {
            let result = reports::export(&client, &range, format, &token).await;
            exporting.try_set(None);
            match result {
                Ok(report) => match save_file(&report) {
                    Ok(()) => {
                        tracing::info!(file = %report.file_name, bytes = report.bytes.len(), "report exported");
                        notice.try_set(Some(format!("Reporte descargado: {}", report.file_name)));
                    }
                    Err(e) => tracing::error!(error = ?e, "report download failed"),
                },
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    tracing::error!(error = %e, "report export failed");
                    state.try_update(|s| *s = std::mem::take(s).fail(&e, "Error al exportar reporte"));
                }
            }
        });
    };

    view! {
        <section class="page">
            <PageHeader title="Reportes y Estadísticas" icon="📈" on_refresh=move |_| reload()>
                <button class="btn btn-outlined" disabled=move || exporting.get().is_some() on:click=move |_| export(ExportFormat::Pdf)>
                    {move || if exporting.get() == Some(ExportFormat::Pdf) { "Exportando..." } else { "Exportar PDF" }}
                </button>
                <button class="btn btn-outlined" disabled=move || exporting.get().is_some() on:click=move |_| export(ExportFormat::Excel)>
                    {move || if exporting.get() == Some(ExportFormat::Excel) { "Exportando..." } else { "Exportar Excel" }}
                </button>
            </PageHeader>

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />
            <SuccessBanner message=notice />

            <div class="filters">
                <label>"Desde"
                    <input type="date" prop:value=start on:input=move |ev| start.set(event_target_value(&ev)) />
                </label>
                <label>"Hasta"
                    <input type="date" prop:value=end on:input=move |ev| end.set(event_target_value(&ev)) />
                </label>
                <button class="btn btn-primary" on:click=apply>"Aplicar"</button>
            </div>

            <Show when=move || state.with(|s| s.is_loading() && s.data().is_none())>
                <Spinner />
            </Show>

            {move || state.with(|s| s.data().cloned()).map(|stats| view! {
                <div class="stat-grid">
                    <div class="stat-card">
                        <div class="stat-value">{stats.total_incidencias}</div>
                        <div class="stat-label">"Total incidencias"</div>
                    </div>
                    <div class="stat-card">
                        <div class="stat-value">{format!("{} / {}", stats.rutas_activas, stats.total_rutas)}</div>
                        <div class="stat-label">"Rutas activas"</div>
                    </div>
                    <div class="stat-card">
                        <div class="stat-value">{stats.total_tareas}</div>
                        <div class="stat-label">"Total tareas"</div>
                    </div>
                    <div class="stat-card">
                        <div class="stat-value">{format!("{}%", stats.task_completion_percent())}</div>
                        <div class="stat-label">{format!("Tareas completadas ({} pendientes)", stats.tareas_pendientes)}</div>
                    </div>
                </div>
                <div class="two-columns">
                    <BarChart title="Incidencias por estado" breakdown=stats.incidencias_por_estado.clone() />
                    <BarChart title="Incidencias por tipo" breakdown=stats.incidencias_por_tipo.clone() />
                </div>
            })}
        </section>
    }
}

#[component]
fn BarChart(title: &'static str, breakdown: std::collections::BTreeMap<String, u64>) -> impl IntoView {
    let rows = bars(&breakdown);
    let empty = rows.is_empty();
    view! {
        <div class="panel">
            <h3>{title}</h3>
            {empty.then(|| view! { <p class="muted">"Sin datos"</p> })}
            {rows.into_iter().map(|bar| view! {
                <div class="bar-row">
                    <span class="bar-label">{breakdown_label(&bar.label)}</span>
                    <div class="bar-track">
                        <div class="bar-fill" style=format!("width: {}%", bar.percent)></div>
                    </div>
                    <span class="bar-value">{format!("{} ({}%)", bar.value, bar.share)}</span>
                </div>
            }).collect_view()}
        </div>
    }
}
