//! The five widget operations the adapter relies on

use async_trait::async_trait;
use stay_core::LatLng;

/// Handle to a marker placed on a [`MapSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub usize);

/// Loads the widget library and constructs a map. Loading may suspend.
#[async_trait]
pub trait MapLibrary: Send + Sync {
    async fn create_map(
        &self,
        container: &str,
        center: LatLng,
        zoom: u8,
    ) -> crate::Result<Box<dyn MapSurface>>;
}

/// A constructed map instance
pub trait MapSurface: Send {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);

    fn add_marker(&mut self, at: LatLng) -> MarkerId;

    fn bind_popup(&mut self, marker: MarkerId, html: &str, open: bool);

    /// Tear down the instance and everything attached to it.
    fn remove(&mut self);
}
