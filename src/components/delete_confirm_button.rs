//! Delete Confirm Button Component
//!
//! Inline two-step confirmation for destructive actions.

use leptos::prelude::*;

use crate::page_state::ConfirmGate;

/// Shows the delete button first. A click arms the gate and shows
/// "¿Eliminar?" with ✓/✗; only ✓ runs `on_confirm`.
#[component]
pub fn DeleteConfirmButton(
    #[prop(into, default = "btn btn-danger".to_string())] button_class: String,
    #[prop(into, default = "Eliminar".to_string())] label: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let gate = RwSignal::new(ConfirmGate::default());

    view! {
        <Show when=move || !gate.with(ConfirmGate::is_armed)>
            <button
                class=button_class.clone()
                on:click=move |ev| {
                    ev.stop_propagation();
                    gate.update(ConfirmGate::arm);
                }
            >
                {label.clone()}
            </button>
        </Show>
        <Show when=move || gate.with(ConfirmGate::is_armed)>
            <span class="delete-confirm">
                <span class="delete-confirm-text">"¿Eliminar?"</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        let confirmed = gate.try_update(ConfirmGate::confirm).unwrap_or(false);
                        if confirmed {
                            on_confirm.run(());
                        }
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        gate.update(ConfirmGate::disarm);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
