//! Leaflet rendition of the widget for server-rendered pages.
//!
//! The "library" records the calls as JavaScript; the page embeds the
//! script while the widget is live.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use stay_core::LatLng;

use crate::{MapError, MapLibrary, MapSurface, MarkerId};

#[derive(Debug, Default)]
struct Canvas {
    statements: Vec<String>,
    live: bool,
    generation: u64,
}

/// Shared view of what the current Leaflet widget would draw
#[derive(Debug, Clone, Default)]
pub struct LeafletCanvas {
    inner: Arc<Mutex<Canvas>>,
}

impl LeafletCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Self-invoking script that builds the live map, if there is one.
    pub fn script(&self) -> Option<String> {
        let canvas = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !canvas.live {
            return None;
        }
        Some(format!("(function () {{\n{}\n}})();", canvas.statements.join("\n")))
    }

    pub fn is_live(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .live
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeafletLibrary {
    canvas: LeafletCanvas,
}

impl LeafletLibrary {
    pub fn new(canvas: LeafletCanvas) -> Self {
        Self { canvas }
    }
}

#[async_trait]
impl MapLibrary for LeafletLibrary {
    async fn create_map(
        &self,
        container: &str,
        center: LatLng,
        zoom: u8,
    ) -> crate::Result<Box<dyn MapSurface>> {
        if container.trim().is_empty() {
            return Err(MapError::Widget("container id is empty".to_string()));
        }
        let mut canvas = self.canvas.inner.lock().unwrap_or_else(PoisonError::into_inner);
        canvas.generation += 1;
        canvas.live = true;
        canvas.statements = vec![
            format!("var el = document.getElementById({});", js_string(container)),
            "if (!el || typeof L === 'undefined') return;".to_string(),
            "if (el._leaflet_map) el._leaflet_map.remove();".to_string(),
            format!(
                "var map = L.map(el).setView([{}, {}], {});",
                center.lat, center.lng, zoom
            ),
            "el._leaflet_map = map;".to_string(),
        ];

        Ok(Box::new(LeafletMap {
            canvas: self.canvas.clone(),
            generation: canvas.generation,
            markers: 0,
        }))
    }
}

struct LeafletMap {
    canvas: LeafletCanvas,
    generation: u64,
    markers: usize,
}

impl LeafletMap {
    fn emit(&self, statement: String) {
        let mut canvas = self.canvas.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if canvas.generation == self.generation {
            canvas.statements.push(statement);
        }
    }
}

impl MapSurface for LeafletMap {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        self.emit(format!(
            "L.tileLayer({}, {{ attribution: {} }}).addTo(map);",
            js_string(url_template),
            js_string(attribution)
        ));
    }

    fn add_marker(&mut self, at: LatLng) -> MarkerId {
        let id = MarkerId(self.markers);
        self.markers += 1;
        self.emit(format!("var m{} = L.marker([{}, {}]).addTo(map);", id.0, at.lat, at.lng));
        id
    }

    fn bind_popup(&mut self, marker: MarkerId, html: &str, open: bool) {
        let open = if open { ".openPopup()" } else { "" };
        self.emit(format!("m{}.bindPopup({}){};", marker.0, js_string(html), open));
    }

    fn remove(&mut self) {
        let mut canvas = self.canvas.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if canvas.generation == self.generation {
            canvas.statements.clear();
            canvas.live = false;
        }
    }
}

/// JSON string literal, safe inside an inline `<script>` element.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string())
        .to_string()
        .replace("</", "<\\/")
}
