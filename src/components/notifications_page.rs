//! Notifications Page
//!
//! Re-fetched on a fixed interval while mounted. The unread count also
//! feeds the top bar badge.

use chrono::Utc;
use gloo_timers::callback::Interval;
use leptos::prelude::*;

use crate::api::notifications;
use crate::components::common::{
    dismiss, error_of, load_into, mutate_into, mutate_into_then, use_cancel_token, EmptyState, ErrorBanner,
    PageHeader, Spinner, StatusChip, SuccessBanner,
};
use crate::components::delete_confirm_button::DeleteConfirmButton;
use crate::config::AppConfig;
use crate::context::use_session;
use crate::labels::{relative_time, Labeled};
use crate::models::Notification;
use crate::page_state::PageState;
use crate::store::{store_set_unread, use_shell_store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Filter {
    #[default]
    All,
    Unread,
}

fn unread(items: &[Notification]) -> u64 {
    items.iter().filter(|n| !n.leida).count() as u64
}

fn visible(items: &[Notification], filter: Filter) -> Vec<Notification> {
    items
        .iter()
        .filter(|n| filter == Filter::All || !n.leida)
        .cloned()
        .collect()
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let ctx = use_session();
    let store = use_shell_store();
    let config = use_context::<AppConfig>().unwrap_or_default();
    let cancel = use_cancel_token();
    let state = RwSignal::new(PageState::<Vec<Notification>>::new());
    let filter = RwSignal::new(Filter::All);
    let notice = RwSignal::new(None::<String>);

    let fetch = move || {
        let client = ctx.client();
        let token = cancel.get_value();
        async move { notifications::list(&client, &token).await }
    };
    let reload = move || load_into(state, "Error al cargar notificaciones", fetch);
    reload();

    // Badge follows whatever was last loaded
    Effect::new(move |_| {
        if let Some(items) = state.with(|s| s.data().map(|items| unread(items))) {
            store_set_unread(&store, items);
        }
    });

    let period = u32::try_from(config.poll_interval.as_millis()).unwrap_or(u32::MAX);
    let poller = StoredValue::new_local(Some(Interval::new(period, move || {
        tracing::debug!("notifications poll");
        reload();
    })));
    on_cleanup(move || {
        poller.try_update_value(|p| p.take());
    });

    let mark_read = move |id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(
            state,
            "Error al marcar como leída",
            async move { notifications::mark_as_read(&client, id, &token).await },
            fetch,
        );
    };
    let mark_all = move |_: leptos::ev::MouseEvent| {
        let client = ctx.client();
        let token = cancel.get_value();
        let marked = RwSignal::new(0u64);
        mutate_into_then(
            state,
            "Error al marcar todas como leídas",
            async move {
                let result = notifications::mark_all_as_read(&client, &token).await;
                if let Ok(done) = &result {
                    marked.try_set(done.marked_as_read);
                }
                result
            },
            fetch,
            move || notice.set(Some(format!("{} notificaciones marcadas como leídas", marked.get_untracked()))),
        );
    };
    let delete = move |id: i64| {
        let client = ctx.client();
        let token = cancel.get_value();
        mutate_into(
            state,
            "Error al eliminar notificación",
            async move { notifications::delete(&client, id, &token).await },
            fetch,
        );
    };

    let unread_count = move || state.with(|s| unread(s.items()));

    view! {
        <section class="page">
            <PageHeader title="Notificaciones" icon="🔔" on_refresh=move |_| reload()>
                <button class="btn btn-outlined" disabled=move || unread_count() == 0 on:click=mark_all>
                    "Marcar todas como leídas"
                </button>
            </PageHeader>

            <ErrorBanner message=error_of(state) on_dismiss=move |_| dismiss(state) />
            <SuccessBanner message=notice />

            <div class="filters">
                <button
                    class="btn"
                    class:btn-primary=move || filter.get() == Filter::All
                    on:click=move |_| filter.set(Filter::All)
                >
                    {move || format!("Todas ({})", state.with(PageState::count))}
                </button>
                <button
                    class="btn"
                    class:btn-primary=move || filter.get() == Filter::Unread
                    on:click=move |_| filter.set(Filter::Unread)
                >
                    {move || format!("No leídas ({})", unread_count())}
                </button>
            </div>

            <Show when=move || state.with(|s| s.is_loading() && s.data().is_none())>
                <Spinner />
            </Show>
            <Show when=move || state.with(|s| s.data().is_some()) && state.with(|s| visible(s.items(), filter.get()).is_empty())>
                {move || {
                    let message = match filter.get() {
                        Filter::All => "No hay notificaciones",
                        Filter::Unread => "No hay notificaciones sin leer",
                    };
                    view! { <EmptyState message=message /> }
                }}
            </Show>

            <ul class="notification-list">
                <For
                    each=move || state.with(|s| visible(s.items(), filter.get()))
                    key=|n| (n.id, n.leida)
                    children=move |n| {
                        let id = n.id;
                        let when = n.created_at.as_deref().map(|d| relative_time(d, Utc::now())).unwrap_or_default();
                        view! {
                            <li class="notification" class:unread=!n.leida>
                                <StatusChip label=n.tipo.label() color=n.tipo.color() />
                                <div class="notification-body">
                                    <strong>{n.titulo.clone()}</strong>
                                    <p>{n.mensaje.clone()}</p>
                                    <span class="muted">{when}</span>
                                </div>
                                <div class="row-actions">
                                    {(!n.leida).then(|| view! {
                                        <button class="btn btn-text" on:click=move |_| mark_read(id)>"Marcar leída"</button>
                                    })}
                                    <DeleteConfirmButton button_class="btn btn-text" on_confirm=move |_| delete(id) />
                                </div>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, leida: bool) -> Notification {
        serde_json::from_value(serde_json::json!({
            "id": id, "tipo": "INFO", "titulo": "t", "mensaje": "m", "leida": leida
        }))
        .unwrap()
    }

    #[test]
    fn test_unread_filter_and_count() {
        let items = vec![note(1, false), note(2, true), note(3, false)];
        assert_eq!(unread(&items), 2);
        let ids: Vec<i64> = visible(&items, Filter::Unread).iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(visible(&items, Filter::All).len(), 3);
    }
}
