//! # Stay Map
//!
//! Binds one map widget to a container for as long as its host is mounted.
//!
//! ```text
//!  mount(view) ──▶ Loading ──(library resolves)──▶ Ready { markers }
//!       │              │                              │
//!       │              └──(library fails)──▶ Failed   │
//!       ▼              ▼                              ▼
//!  unmount() ───────── Released: pending loads are abandoned, a load that
//!                      resolves late is removed on arrival, a live widget
//!                      is removed now
//! ```
//!
//! The widget library is an opaque collaborator ([`MapLibrary`], [`MapSurface`])
//! limited to: create map, add tile layer, add marker, bind popup, remove.

pub mod adapter;
pub mod leaflet;
pub mod markers;
pub mod widget;

pub use adapter::{MapAdapter, MapStatus, MapView};
pub use leaflet::{LeafletCanvas, LeafletLibrary};
pub use markers::{jitter_around, listing_popup, MapSettings};
pub use widget::{MapLibrary, MapSurface, MarkerId};

/// Result type for stay-map operations
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors raised by a map library
#[derive(Debug, Clone, thiserror::Error)]
pub enum MapError {
    #[error("Map library unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("Map widget error: {0}")]
    Widget(String),
}
