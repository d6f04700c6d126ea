//! Page Building Blocks
//!
//! Cancellation, load/mutate plumbing and the small widgets every page
//! shares.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::CancelToken;
use crate::error::ApiResult;
use crate::page_state::{mutate_then_reload, PageState};

/// Token cancelled when the calling component unmounts. Stored so that
/// event handlers capturing it stay `Copy`.
pub fn use_cancel_token() -> StoredValue<CancelToken> {
    let token = CancelToken::new();
    let on_unmount = token.clone();
    on_cleanup(move || on_unmount.cancel());
    StoredValue::new(token)
}

/// Enum variant whose wire name is `raw`
pub fn choice<T: Copy>(options: &[T], raw: &str, wire: fn(&T) -> &'static str) -> Option<T> {
    options.iter().copied().find(|o| wire(o) == raw)
}

/// Fetch into `state`, keeping the previous data visible while loading
pub fn load_into<T, Fetch, Fut>(state: RwSignal<PageState<T>>, fallback: &'static str, fetch: Fetch)
where
    T: Send + Sync + 'static,
    Fetch: FnOnce() -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    state.update(|s| *s = std::mem::take(s).begin_reload());
    spawn_local(async move {
        let result = fetch().await;
        match &result {
            Err(e) if e.is_cancelled() => return,
            Err(e) => tracing::error!(error = %e, "{}", fallback),
            Ok(_) => {}
        }
        state.try_update(|s| *s = std::mem::take(s).resolve(result, fallback));
    });
}

/// Run a mutation, then re-fetch the whole page once
pub fn mutate_into<T, M, Mut, Fetch, Fut>(
    state: RwSignal<PageState<T>>,
    fallback: &'static str,
    mutation: Mut,
    fetch: Fetch,
) where
    T: Send + Sync + 'static,
    Mut: Future<Output = ApiResult<M>> + 'static,
    Fetch: FnOnce() -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    mutate_into_then(state, fallback, mutation, fetch, || {});
}

/// `mutate_into`, calling `on_success` once the reload has landed
pub fn mutate_into_then<T, M, Mut, Fetch, Fut, Done>(
    state: RwSignal<PageState<T>>,
    fallback: &'static str,
    mutation: Mut,
    fetch: Fetch,
    on_success: Done,
) where
    T: Send + Sync + 'static,
    Mut: Future<Output = ApiResult<M>> + 'static,
    Fetch: FnOnce() -> Fut + 'static,
    Fut: Future<Output = ApiResult<T>> + 'static,
    Done: FnOnce() + 'static,
{
    spawn_local(async move {
        match mutate_then_reload(mutation, fetch).await {
            Ok(data) => {
                state.try_update(|s| *s = PageState::Ready(data));
                on_success();
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                tracing::error!(error = %e, "{}", fallback);
                state.try_update(|s| *s = std::mem::take(s).fail(&e, fallback));
            }
        }
    });
}

/// Error text of a page state, for `ErrorBanner`
pub fn error_of<T: Send + Sync + 'static>(state: RwSignal<PageState<T>>) -> Signal<Option<String>> {
    Signal::derive(move || state.with(|s| s.error().map(str::to_string)))
}

pub fn dismiss<T: Send + Sync + 'static>(state: RwSignal<PageState<T>>) {
    state.update(|s| *s = std::mem::take(s).dismiss_error());
}

/// Dismissible error line
#[component]
pub fn ErrorBanner(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div class="error-banner" role="alert">
                <span>{move || message.get().unwrap_or_default()}</span>
                <button class="banner-close" on:click=move |_| on_dismiss.run(())>"×"</button>
            </div>
        </Show>
    }
}

#[component]
pub fn SuccessBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div class="success-banner">{move || message.get().unwrap_or_default()}</div>
        </Show>
    }
}

/// Colored label for an enum value
#[component]
pub fn StatusChip(#[prop(into)] label: String, #[prop(into)] color: String) -> impl IntoView {
    view! {
        <span class="chip" style=format!("background-color: {}", color)>{label}</span>
    }
}

/// Title row with a refresh button and optional extra actions
#[component]
pub fn PageHeader(
    #[prop(into)] title: String,
    #[prop(into)] icon: String,
    #[prop(into)] on_refresh: Callback<()>,
    #[prop(optional)] children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="page-header">
            <h1><span class="page-icon">{icon}</span>{title}</h1>
            <div class="page-actions">
                <button class="btn btn-outlined" on:click=move |_| on_refresh.run(())>"↻ Actualizar"</button>
                {children.map(|c| c())}
            </div>
        </div>
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! { <div class="spinner" aria-label="Cargando"></div> }
}

/// Message shown for an empty collection
#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! { <div class="empty-state">{message}</div> }
}
