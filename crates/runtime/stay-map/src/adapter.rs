//! Mount/unmount lifecycle for one map container

use std::sync::{Arc, Mutex, PoisonError};

use stay_core::{ComparableListing, LatLng};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::markers::{populate, MapSettings};
use crate::{MapLibrary, MapSurface};

/// What a mounted map shows
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub container: String,
    pub center: LatLng,
    pub listings: Vec<ComparableListing>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    Unmounted,
    Loading,
    Ready { markers: usize },
    Failed(String),
}

impl MapStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, MapStatus::Loading)
    }
}

enum Slot {
    Initializing,
    Live(Box<dyn MapSurface>),
    Released,
}

struct Mount {
    view: MapView,
    slot: Arc<Mutex<Slot>>,
    status: watch::Receiver<MapStatus>,
    cancel: CancellationToken,
}

/// Holds at most one live widget. Dropping the adapter unmounts it.
pub struct MapAdapter {
    library: Arc<dyn MapLibrary>,
    settings: MapSettings,
    mount: Option<Mount>,
}

impl MapAdapter {
    pub fn new(library: Arc<dyn MapLibrary>, settings: MapSettings) -> Self {
        Self {
            library,
            settings,
            mount: None,
        }
    }

    /// Start showing `view`. Remounting the same view is a no-op; a
    /// different view tears the current widget down first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(&mut self, view: MapView) {
        if self.mount.as_ref().is_some_and(|m| m.view == view) {
            debug!(container = %view.container, "map already mounted");
            return;
        }
        self.unmount();

        let slot = Arc::new(Mutex::new(Slot::Initializing));
        let (tx, rx) = watch::channel(MapStatus::Loading);
        let cancel = CancellationToken::new();

        info!(
            container = %view.container,
            listings = view.listings.len(),
            "mounting map"
        );
        tokio::spawn(initialize(
            self.library.clone(),
            self.settings.clone(),
            view.clone(),
            slot.clone(),
            tx,
            cancel.clone(),
        ));

        self.mount = Some(Mount {
            view,
            slot,
            status: rx,
            cancel,
        });
    }

    /// Release the widget. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        let Some(mount) = self.mount.take() else {
            return;
        };
        mount.cancel.cancel();

        let previous = {
            let mut slot = mount.slot.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, Slot::Released)
        };
        if let Slot::Live(mut map) = previous {
            map.remove();
            info!(container = %mount.view.container, "map removed");
        } else {
            debug!(container = %mount.view.container, "map unmounted before it was ready");
        }
    }

    pub fn status(&self) -> MapStatus {
        match &self.mount {
            Some(mount) => mount.status.borrow().clone(),
            None => MapStatus::Unmounted,
        }
    }

    /// Wait until the current mount leaves [`MapStatus::Loading`].
    pub async fn wait_settled(&self) -> MapStatus {
        let Some(mount) = &self.mount else {
            return MapStatus::Unmounted;
        };
        let mut rx = mount.status.clone();
        let waited = rx.wait_for(MapStatus::is_settled).await.map(|status| status.clone());
        let settled = match waited {
            Ok(status) => status,
            Err(_) => rx.borrow().clone(),
        };
        settled
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn view(&self) -> Option<&MapView> {
        self.mount.as_ref().map(|m| &m.view)
    }
}

impl Drop for MapAdapter {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn initialize(
    library: Arc<dyn MapLibrary>,
    settings: MapSettings,
    view: MapView,
    slot: Arc<Mutex<Slot>>,
    status: watch::Sender<MapStatus>,
    cancel: CancellationToken,
) {
    let created = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(container = %view.container, "map load abandoned");
            return;
        }
        created = library.create_map(&view.container, view.center, settings.zoom) => created,
    };

    let mut map = match created {
        Ok(map) => map,
        Err(e) => {
            warn!(container = %view.container, error = %e, "map library failed to load");
            status.send_replace(MapStatus::Failed(e.to_string()));
            return;
        }
    };

    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if matches!(*slot, Slot::Released) {
        map.remove();
        debug!(container = %view.container, "map arrived after unmount, removed");
        return;
    }

    let markers = populate(map.as_mut(), &settings, view.center, &view.listings);
    *slot = Slot::Live(map);
    drop(slot);

    info!(container = %view.container, markers, "map ready");
    status.send_replace(MapStatus::Ready { markers });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MapError, MarkerId};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct Counters {
        created: AtomicUsize,
        removed: AtomicUsize,
        markers: AtomicUsize,
        opened_popups: AtomicUsize,
    }

    struct TestSurface {
        counters: Arc<Counters>,
        next_marker: usize,
    }

    impl MapSurface for TestSurface {
        fn add_tile_layer(&mut self, _url_template: &str, _attribution: &str) {}

        fn add_marker(&mut self, _at: LatLng) -> MarkerId {
            self.counters.markers.fetch_add(1, Ordering::SeqCst);
            self.next_marker += 1;
            MarkerId(self.next_marker)
        }

        fn bind_popup(&mut self, _marker: MarkerId, _html: &str, open: bool) {
            if open {
                self.counters.opened_popups.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn remove(&mut self) {
            self.counters.removed.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Resolves only after `gate` is notified, when gated.
    struct TestLibrary {
        counters: Arc<Counters>,
        gate: Option<Arc<Notify>>,
        fail: bool,
    }

    #[async_trait]
    impl MapLibrary for TestLibrary {
        async fn create_map(
            &self,
            _container: &str,
            _center: LatLng,
            _zoom: u8,
        ) -> crate::Result<Box<dyn MapSurface>> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(MapError::LibraryUnavailable("script blocked".into()));
            }
            self.counters.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(TestSurface {
                counters: self.counters.clone(),
                next_marker: 0,
            }))
        }
    }

    fn library(gate: Option<Arc<Notify>>, fail: bool) -> (Arc<dyn MapLibrary>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let library = TestLibrary {
            counters: counters.clone(),
            gate,
            fail,
        };
        (Arc::new(library), counters)
    }

    fn listing(id: &str) -> ComparableListing {
        ComparableListing {
            id: id.into(),
            name: format!("숙소 {id}"),
            price: 90_000,
            rating: 4.5,
            distance_km: 0.4,
            bedroom_count: 1,
            bathroom_count: 1,
            max_guests: 2,
            image_ref: String::new(),
        }
    }

    fn view(container: &str) -> MapView {
        MapView {
            container: container.into(),
            center: stay_core::FALLBACK_LOCATION,
            listings: vec![listing("1"), listing("2"), listing("3")],
        }
    }

    #[tokio::test]
    async fn test_mount_places_all_markers() {
        let (library, counters) = library(None, false);
        let mut adapter = MapAdapter::new(library, MapSettings::default());
        assert_eq!(adapter.status(), MapStatus::Unmounted);

        adapter.mount(view("map"));
        assert_eq!(adapter.wait_settled().await, MapStatus::Ready { markers: 4 });
        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
        assert_eq!(counters.markers.load(Ordering::SeqCst), 4);
        assert_eq!(counters.opened_popups.load(Ordering::SeqCst), 1);

        adapter.unmount();
        assert_eq!(counters.removed.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.status(), MapStatus::Unmounted);
    }

    #[tokio::test]
    async fn test_unmount_before_library_resolves() {
        let gate = Arc::new(Notify::new());
        let (library, counters) = library(Some(gate.clone()), false);
        let mut adapter = MapAdapter::new(library, MapSettings::default());

        adapter.mount(view("map"));
        tokio::task::yield_now().await;
        assert_eq!(adapter.status(), MapStatus::Loading);

        adapter.unmount();
        gate.notify_one();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(counters.created.load(Ordering::SeqCst), 0);
        assert_eq!(counters.removed.load(Ordering::SeqCst), 0);
        assert!(!adapter.is_mounted());
    }

    #[tokio::test]
    async fn test_late_map_is_removed_on_arrival() {
        let (library, counters) = library(None, false);
        let slot = Arc::new(Mutex::new(Slot::Released));
        let (tx, rx) = watch::channel(MapStatus::Loading);

        initialize(
            library,
            MapSettings::default(),
            view("map"),
            slot.clone(),
            tx,
            CancellationToken::new(),
        )
        .await;

        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
        assert_eq!(counters.removed.load(Ordering::SeqCst), 1);
        assert_eq!(counters.markers.load(Ordering::SeqCst), 0);
        assert_eq!(*rx.borrow(), MapStatus::Loading);
        assert!(matches!(*slot.lock().unwrap(), Slot::Released));
    }

    #[tokio::test]
    async fn test_library_failure_is_reported() {
        let (library, counters) = library(None, true);
        let mut adapter = MapAdapter::new(library, MapSettings::default());

        adapter.mount(view("map"));
        let status = adapter.wait_settled().await;
        assert!(matches!(status, MapStatus::Failed(ref msg) if msg.contains("script blocked")));

        adapter.unmount();
        assert_eq!(counters.removed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remount_same_view_is_noop() {
        let (library, counters) = library(None, false);
        let mut adapter = MapAdapter::new(library, MapSettings::default());

        adapter.mount(view("map"));
        adapter.wait_settled().await;
        adapter.mount(view("map"));
        adapter.wait_settled().await;

        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
        assert_eq!(counters.removed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_new_view_replaces_widget() {
        let (library, counters) = library(None, false);
        let mut adapter = MapAdapter::new(library, MapSettings::default());

        adapter.mount(view("map"));
        adapter.wait_settled().await;
        adapter.mount(view("map-2"));
        adapter.wait_settled().await;

        assert_eq!(counters.created.load(Ordering::SeqCst), 2);
        assert_eq!(counters.removed.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.view().map(|v| v.container.as_str()), Some("map-2"));
    }

    #[tokio::test]
    async fn test_drop_removes_live_map() {
        let (library, counters) = library(None, false);
        let mut adapter = MapAdapter::new(library, MapSettings::default());
        adapter.mount(view("map"));
        adapter.wait_settled().await;

        drop(adapter);
        assert_eq!(counters.removed.load(Ordering::SeqCst), 1);
    }
}
