//! Route Map Drawing
//!
//! The drawing rules live in `draw_route`, written against the `RouteCanvas`
//! trait. `LeafletCanvas` implements it over the page's `L` global.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::models::LatLng;

/// Latacunga city centre
pub const DEFAULT_CENTER: LatLng = LatLng { lat: -0.9346, lon: -78.6156 };
pub const DEFAULT_ZOOM: u8 = 13;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: u32,
}

pub const ROUTE_LINE: LineStyle = LineStyle { color: "red", weight: 4 };
pub const FIT_PADDING: [u32; 2] = [20, 20];

/// A map surface that can draw a polyline and frame it
pub trait RouteCanvas {
    type Handle;

    fn add_polyline(&self, points: &[LatLng], style: &LineStyle) -> Self::Handle;

    fn fit_bounds(&self, line: &Self::Handle, padding: [u32; 2]);
}

/// Draw `points` as the route line and frame it. Fewer than two points
/// draw nothing and leave the viewport alone.
pub fn draw_route<C: RouteCanvas>(canvas: &C, points: &[LatLng]) -> Option<C::Handle> {
    if points.len() < 2 {
        return None;
    }
    let line = canvas.add_polyline(points, &ROUTE_LINE);
    canvas.fit_bounds(&line, FIT_PADDING);
    Some(line)
}

// ========================
// Leaflet bindings
// ========================

#[wasm_bindgen]
extern "C" {
    pub type LeafletMap;
    pub type LeafletLayer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn leaflet_map(element: &web_sys::HtmlElement) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &JsValue, zoom: u8) -> LeafletMap;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &LeafletMap, bounds: &JsValue, options: &JsValue) -> LeafletMap;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &LeafletMap, layer: &LeafletLayer) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn polyline(latlngs: &JsValue, options: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn circle_marker(latlng: &JsValue, options: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &LeafletLayer, map: &LeafletMap) -> LeafletLayer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &LeafletLayer, content: &str) -> LeafletLayer;

    #[wasm_bindgen(method, js_name = getBounds)]
    fn get_bounds(this: &LeafletLayer) -> JsValue;
}

#[derive(Serialize)]
struct TileOptions {
    attribution: &'static str,
}

#[derive(Serialize)]
struct FitOptions {
    padding: [u32; 2],
}

#[derive(Serialize)]
struct MarkerOptions<'a> {
    radius: u32,
    color: &'a str,
    #[serde(rename = "fillColor")]
    fill_color: &'a str,
    #[serde(rename = "fillOpacity")]
    fill_opacity: f64,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn lat_lng(point: &LatLng) -> JsValue {
    to_js(&[point.lat, point.lon])
}

/// True once the Leaflet script has loaded
pub fn leaflet_available() -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("L")).unwrap_or(false)
}

/// A Leaflet map with OpenStreetMap tiles mounted on an element
pub struct LeafletCanvas {
    map: LeafletMap,
    layers: Vec<LeafletLayer>,
}

impl LeafletCanvas {
    pub fn mount(element: &web_sys::HtmlElement, center: LatLng, zoom: u8) -> Result<Self, String> {
        if !leaflet_available() {
            return Err("Leaflet no está cargado".to_string());
        }
        let map = leaflet_map(element).map_err(|e| format!("{:?}", e))?;
        map.set_view(&lat_lng(&center), zoom);
        tile_layer(TILE_URL, &to_js(&TileOptions { attribution: TILE_ATTRIBUTION })).add_to(&map);
        Ok(Self { map, layers: Vec::new() })
    }

    /// Circle marker with a popup
    pub fn add_marker(&mut self, at: LatLng, color: &str, popup: &str) {
        let options = MarkerOptions { radius: 9, color, fill_color: color, fill_opacity: 0.8 };
        let marker = circle_marker(&lat_lng(&at), &to_js(&options)).add_to(&self.map);
        marker.bind_popup(popup);
        self.layers.push(marker);
    }

    /// Remove everything drawn since mount, keeping the tiles
    pub fn clear(&mut self) {
        for layer in self.layers.drain(..) {
            self.map.remove_layer(&layer);
        }
    }

    pub fn keep(&mut self, layer: LeafletLayer) {
        self.layers.push(layer);
    }

    pub fn destroy(self) {
        self.map.remove();
    }
}

impl RouteCanvas for LeafletCanvas {
    type Handle = LeafletLayer;

    fn add_polyline(&self, points: &[LatLng], style: &LineStyle) -> LeafletLayer {
        let latlngs: Vec<[f64; 2]> = points.iter().map(|p| [p.lat, p.lon]).collect();
        polyline(&to_js(&latlngs), &to_js(style)).add_to(&self.map)
    }

    fn fit_bounds(&self, line: &LeafletLayer, padding: [u32; 2]) {
        self.map.fit_bounds(&line.get_bounds(), &to_js(&FitOptions { padding }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingCanvas {
        lines: RefCell<Vec<(usize, LineStyle)>>,
        fits: RefCell<Vec<[u32; 2]>>,
    }

    impl RouteCanvas for RecordingCanvas {
        type Handle = usize;

        fn add_polyline(&self, points: &[LatLng], style: &LineStyle) -> usize {
            self.lines.borrow_mut().push((points.len(), *style));
            self.lines.borrow().len() - 1
        }

        fn fit_bounds(&self, _line: &usize, padding: [u32; 2]) {
            self.fits.borrow_mut().push(padding);
        }
    }

    #[test]
    fn test_route_line_is_drawn_and_framed() {
        let canvas = RecordingCanvas::default();
        let points = vec![LatLng::new(-0.93, -78.61), LatLng::new(-0.94, -78.62), LatLng::new(-0.95, -78.60)];

        let handle = draw_route(&canvas, &points);

        assert_eq!(handle, Some(0));
        assert_eq!(*canvas.lines.borrow(), vec![(3, LineStyle { color: "red", weight: 4 })]);
        assert_eq!(*canvas.fits.borrow(), vec![[20, 20]]);
    }

    #[test]
    fn test_short_routes_draw_nothing() {
        let canvas = RecordingCanvas::default();

        assert_eq!(draw_route(&canvas, &[]), None);
        assert_eq!(draw_route(&canvas, &[LatLng::new(-0.93, -78.61)]), None);
        assert!(canvas.lines.borrow().is_empty());
        assert!(canvas.fits.borrow().is_empty());
    }
}
