//! Marker placement and popup content

use rand::Rng;
use stay_config::MapConfig;
use stay_core::{format_won, html_escape, ComparableListing, LatLng};

use crate::MapSurface;

/// Widget settings applied on every mount
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub jitter_degrees: f64,
    pub primary_label: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self::from_config(&MapConfig::default())
    }
}

impl MapSettings {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            zoom: config.zoom,
            tile_url: config.tile_url.clone(),
            attribution: config.attribution.clone(),
            jitter_degrees: config.jitter_degrees,
            primary_label: config.primary_label.clone(),
        }
    }
}

/// Uniform offset in `[-width/2, width/2)` on each axis. Decorative only,
/// listings carry no coordinates of their own.
pub fn jitter_around<R: Rng + ?Sized>(rng: &mut R, center: LatLng, width: f64) -> LatLng {
    let dlat = (rng.gen::<f64>() - 0.5) * width;
    let dlng = (rng.gen::<f64>() - 0.5) * width;
    center.offset(dlat, dlng)
}

/// Popup body for a comparable listing
pub fn listing_popup(listing: &ComparableListing) -> String {
    format!(
        "<div><b>{}</b><br>{}<br>⭐ {} · {}km</div>",
        html_escape(&listing.name),
        format_won(listing.price),
        listing.rating,
        listing.distance_km
    )
}

/// Tile layer, the primary marker, then one marker per listing.
/// Returns the number of markers placed.
pub(crate) fn populate(
    map: &mut dyn MapSurface,
    settings: &MapSettings,
    center: LatLng,
    listings: &[ComparableListing],
) -> usize {
    map.add_tile_layer(&settings.tile_url, &settings.attribution);

    let primary = map.add_marker(center);
    map.bind_popup(primary, &settings.primary_label, true);

    let mut rng = rand::thread_rng();
    for listing in listings {
        let marker = map.add_marker(jitter_around(&mut rng, center, settings.jitter_degrees));
        map.bind_popup(marker, &listing_popup(listing), false);
    }

    1 + listings.len()
}
