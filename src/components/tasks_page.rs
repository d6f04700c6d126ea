//! Tasks Page

use chrono::Utc;
use leptos::prelude::*;

use crate::api::tasks;
use crate::components::common::{
    choice, dismiss, error_of, load_into, mutate_into, mutate_into_then, use_cancel_token, EmptyState,
    ErrorBanner, PageHeader, Spinner, StatusChip,
};
use crate::components::delete_confirm_button::DeleteConfirmButton;
use crate::context::use_session;
use crate::labels::{is_overdue, long_date, Labeled};
use crate::models::{NewTask, Priority, Task, TaskStatus, TaskType};
use crate::page_state::PageState;

#[component]
pub fn TasksPage() -> impl IntoView {
    let ctx = use_session();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<Vec<Task>>::new());
    let dialog_open = RwSignal::new(false);

    let fetch = move || {
        let client = ctx.client();
        let token = cancel.get_value();
        async move { tasks::list(&client, &token).await }
    };
    let reload = move || load_into(state, "Error al cargar tareas", fetch);
    reload();

    let change_status = move |id: i64, estado: TaskStatus| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(
            state,
            "Error al actualizar estado",
            async move { tasks::update_status(&client, id, estado, &token).await },
            fetch,
        );
    };
    let start = move |id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(state, "Error al iniciar tarea", async move { tasks::start(&client, id, &token).await }, fetch);
    };
    let complete = move |id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(state, "Error al completar tarea", async move { tasks::complete(&client, id, &token).await }, fetch);
    };
    let delete = move |id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(state, "Error al eliminar tarea", async move { tasks::delete(&client, id, &token).await }, fetch);
    };
    let create = Callback::new(move |form: NewTask| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into_then(
            state,
            "Error al crear tarea",
            async move { tasks::create(&client, &form, &token).await },
            fetch,
            move || dialog_open.set(false),
        );
    });

    view! {
        <section class="page">
            <PageHeader title="Gestión de Tareas" icon="✅" on_refresh=move |_| reload()>
                <button class="btn btn-primary" on:click=move |_| dialog_open.set(true)>"+ Nueva Tarea"</button>
            </PageHeader>

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />

            <Show when=move || state.with(|s| s.is_loading() && s.data().is_none())>
                <Spinner />
            </Show>
            <Show when=move || state.with(|s| !s.is_loading() && s.count() == 0 && s.error().is_none())>
                <EmptyState message="No hay tareas registradas" />
            </Show>

            <div class="card-grid">
                <For
                    each=move || state.with(|s| s.items().to_vec())
                    key=|t| (t.id, t.estado, t.progreso)
                    children=move |task| {
                        let id = task.id;
                        let overdue = is_overdue(&task, Utc::now());
                        let progress = task.progress_percent();
                        view! {
                            <article class="card" class:overdue=overdue>
                                <div class="card-head">
                                    <strong>{task.titulo.clone()}</strong>
                                    <StatusChip label=task.prioridad.label() color=task.prioridad.color() />
                                </div>
                                <p class="card-body">{task.descripcion.clone()}</p>
                                <p class="muted">{task.tipo.label()}</p>
                                <p class="muted">{task.asignado_a.as_ref().map(|p| format!("Asignado a: {}", p.name()))}</p>
                                <p class="muted">{task.ruta.as_ref().map(|r| format!("Ruta: {}", r.nombre))}</p>
                                <p class="muted">
                                    {task.fecha_limite.as_deref().map(|d| format!("Fecha límite: {}", long_date(d)))}
                                    {overdue.then(|| view! { <StatusChip label="Vencida" color="#d32f2f" /> })}
                                </p>
                                <div class="progress" title=format!("{}%", progress)>
                                    <div class="progress-fill" style=format!("width: {}%", progress)></div>
                                </div>
                                <div class="card-actions">
                                    <StatusChip label=task.estado.label() color=task.estado.color() />
                                    <select
                                        prop:value=task.estado.as_str()
                                        on:change=move |ev| {
                                            if let Some(estado) = choice(&TaskStatus::ALL, &event_target_value(&ev), TaskStatus::as_str) {
                                                change_status(id, estado);
                                            }
                                        }
                                    >
                                        {TaskStatus::ALL.iter().map(|s| view! { <option value=s.as_str()>{s.label()}</option> }).collect_view()}
                                    </select>
                                    {(task.estado == TaskStatus::Pendiente).then(|| view! {
                                        <button class="btn btn-text" on:click=move |_| start(id)>"Iniciar"</button>
                                    })}
                                    {(task.estado == TaskStatus::EnProgreso).then(|| view! {
                                        <button class="btn btn-text" on:click=move |_| complete(id)>"Completar"</button>
                                    })}
                                    <DeleteConfirmButton on_confirm=move |_| delete(id) />
                                </div>
                            </article>
                        }
                    }
                />
            </div>

            <Show when=move || dialog_open.get()>
                <TaskDialog on_submit=create on_close=move |_| dialog_open.set(false) />
            </Show>
        </section>
    }
}

#[component]
fn TaskDialog(on_submit: Callback<NewTask>, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let form = RwSignal::new(NewTask::default());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(form.get());
    };

    view! {
        <div class="modal-backdrop">
            <form class="modal" on:submit=submit>
                <h2>"Nueva Tarea"</h2>
                <label>"Título"
                    <input type="text" required on:input=move |ev| form.update(|f| f.titulo = event_target_value(&ev)) />
                </label>
                <label>"Descripción"
                    <textarea rows="3" on:input=move |ev| form.update(|f| f.descripcion = event_target_value(&ev))></textarea>
                </label>
                <div class="form-row">
                    <label>"Tipo"
                        <select on:change=move |ev| {
                            if let Some(t) = choice(&TaskType::ALL, &event_target_value(&ev), TaskType::as_str) {
                                form.update(|f| f.tipo = t);
                            }
                        }>
                            {TaskType::ALL.iter().map(|t| view! { <option value=t.as_str()>{t.label()}</option> }).collect_view()}
                        </select>
                    </label>
                    <label>"Prioridad"
                        <select on:change=move |ev| {
                            if let Some(p) = choice(&Priority::TASK_LEVELS, &event_target_value(&ev), Priority::as_str) {
                                form.update(|f| f.prioridad = p);
                            }
                        }>
                            {Priority::TASK_LEVELS.iter().map(|p| view! {
                                <option value=p.as_str() selected=*p == Priority::Media>{p.label()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                </div>
                <label>"Fecha límite"
                    <input type="datetime-local" on:input=move |ev| {
                        let raw = event_target_value(&ev);
                        form.update(|f| f.fecha_limite = Some(raw).filter(|d| !d.is_empty()));
                    } />
                </label>
                <div class="modal-actions">
                    <button type="button" class="btn btn-text" on:click=move |_| on_close.run(())>"Cancelar"</button>
                    <button type="submit" class="btn btn-primary">"Crear"</button>
                </div>
            </form>
        </div>
    }
}
