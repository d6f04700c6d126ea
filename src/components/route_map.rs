//! Map Component
//!
//! Leaflet map showing markers and an optional route line. Redrawn
//! whenever either input changes.

use leptos::html::Div;
use leptos::prelude::*;

use crate::map::{draw_route, LeafletCanvas, DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::models::LatLng;

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub at: LatLng,
    pub color: String,
    pub popup: String,
}

#[component]
pub fn RouteMap(
    #[prop(into, optional)] markers: Signal<Vec<MapMarker>>,
    #[prop(into, optional)] route: Signal<Vec<LatLng>>,
    #[prop(default = 420)] height: u32,
) -> impl IntoView {
    let node = NodeRef::<Div>::new();
    let canvas = StoredValue::new_local(None::<LeafletCanvas>);
    let (failure, set_failure) = signal(None::<String>);

    Effect::new(move |_| {
        let markers = markers.get();
        let route = route.get();
        let Some(element) = node.get() else { return };

        canvas.update_value(|slot| {
            if slot.is_none() {
                match LeafletCanvas::mount(&element, DEFAULT_CENTER, DEFAULT_ZOOM) {
                    Ok(mounted) => *slot = Some(mounted),
                    Err(e) => {
                        tracing::warn!(error = %e, "map unavailable");
                        set_failure.set(Some(e));
                        return;
                    }
                }
            }
            if let Some(map) = slot.as_mut() {
                map.clear();
                for marker in &markers {
                    map.add_marker(marker.at, &marker.color, &marker.popup);
                }
                if let Some(line) = draw_route(&*map, &route) {
                    map.keep(line);
                }
            }
        });
    });

    on_cleanup(move || {
        canvas.try_update_value(|slot| {
            if let Some(map) = slot.take() {
                map.destroy();
            }
        });
    });

    view! {
        <div class="map-frame">
            <div node_ref=node class="map" style=format!("height: {}px", height)></div>
            <Show when=move || failure.with(Option::is_some)>
                <div class="map-fallback">{move || failure.get().unwrap_or_default()}</div>
            </Show>
        </div>
    }
}
