//! Result viewer: handoff read, staged loading, then the prediction

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use stay_config::LoadingConfig;
use stay_core::{ComparableListing, PredictionResult, PropertyDraft};
use stay_handoff::HandoffStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{AnalysisStage, Predictor};

/// Timer cadence of the loading sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingTiming {
    pub tick: Duration,
    pub total: Duration,
    pub progress_step: u8,
}

impl Default for LoadingTiming {
    fn default() -> Self {
        Self::from_config(&LoadingConfig::default())
    }
}

impl LoadingTiming {
    pub fn from_config(config: &LoadingConfig) -> Self {
        Self {
            tick: config.tick(),
            total: config.total(),
            progress_step: config.progress_step,
        }
    }
}

/// Everything shown once loading finishes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub draft: PropertyDraft,
    pub prediction: PredictionResult,
    pub comparables: Vec<ComparableListing>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum ViewerPhase {
    /// Nothing was handed off. Stays here for good.
    Pending,
    Loading { stage: AnalysisStage, progress: u8 },
    Ready(Box<Analysis>),
}

impl ViewerPhase {
    pub fn progress(&self) -> u8 {
        match self {
            ViewerPhase::Pending => 0,
            ViewerPhase::Loading { progress, .. } => *progress,
            ViewerPhase::Ready(_) => 100,
        }
    }

    pub fn stage(&self) -> Option<AnalysisStage> {
        match self {
            ViewerPhase::Pending => None,
            ViewerPhase::Loading { stage, .. } => Some(*stage),
            ViewerPhase::Ready(_) => Some(AnalysisStage::Complete),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewerPhase::Ready(_))
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            ViewerPhase::Ready(analysis) => Some(analysis),
            _ => None,
        }
    }
}

/// One result page load. Dropping it cancels the pending timers.
pub struct ResultViewer {
    phase: watch::Receiver<ViewerPhase>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ResultViewer {
    /// Read the slot and start the loading sequence.
    ///
    /// Must be called from within a Tokio runtime. An empty or unreadable
    /// slot leaves the viewer [`ViewerPhase::Pending`] with no timers.
    pub fn open(
        store: &dyn HandoffStore,
        predictor: Arc<dyn Predictor>,
        timing: LoadingTiming,
    ) -> Self {
        let draft = match store.read() {
            Ok(Some(draft)) => Some(draft),
            Ok(None) => {
                info!("no handoff data, result viewer stays pending");
                None
            }
            Err(e) => {
                warn!(error = %e, "unreadable handoff data, result viewer stays pending");
                None
            }
        };

        let cancel = CancellationToken::new();
        let Some(draft) = draft else {
            let (_tx, rx) = watch::channel(ViewerPhase::Pending);
            return Self {
                phase: rx,
                cancel,
                task: None,
            };
        };

        let (tx, rx) = watch::channel(ViewerPhase::Loading {
            stage: AnalysisStage::FIRST,
            progress: 0,
        });
        info!(
            tick_ms = timing.tick.as_millis() as u64,
            total_ms = timing.total.as_millis() as u64,
            "result viewer loading"
        );
        let task = tokio::spawn(run_pipeline(draft, predictor, timing, tx, cancel.clone()));

        Self {
            phase: rx,
            cancel,
            task: Some(task),
        }
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> ViewerPhase {
        self.phase.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewerPhase> {
        self.phase.clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.phase.borrow(), ViewerPhase::Pending)
    }

    /// Wait for the prediction. `None` if pending or closed first.
    pub async fn wait_ready(&self) -> Option<Analysis> {
        let mut rx = self.phase.clone();
        let phase = rx.wait_for(ViewerPhase::is_ready).await.ok()?;
        phase.analysis().cloned()
    }

    /// Stop the timers. The phase keeps whatever it last showed.
    pub fn close(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("result viewer closed");
        }
    }
}

impl Drop for ResultViewer {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_pipeline(
    draft: PropertyDraft,
    predictor: Arc<dyn Predictor>,
    timing: LoadingTiming,
    tx: watch::Sender<ViewerPhase>,
    cancel: CancellationToken,
) {
    let start = Instant::now();
    let mut ticker = tokio::time::interval_at(start + timing.tick, timing.tick);
    let deadline = tokio::time::sleep_until(start + timing.total);
    tokio::pin!(deadline);

    let mut stage = AnalysisStage::FIRST;
    let mut progress: u8 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(stage = ?stage, progress, "result pipeline cancelled");
                return;
            }
            _ = &mut deadline => break,
            _ = ticker.tick() => {
                stage = stage.next().unwrap_or(stage);
                progress = progress.saturating_add(timing.progress_step).min(100);
                debug!(stage = ?stage, progress, "analysis stage");
                tx.send_replace(ViewerPhase::Loading { stage, progress });
            }
        }
    }

    let prediction = predictor.predict(&draft);
    let comparables = predictor.comparables(&draft);
    info!(
        predicted_price = prediction.predicted_price,
        confidence = prediction.confidence,
        comparables = comparables.len(),
        "prediction ready"
    );
    tx.send_replace(ViewerPhase::Ready(Box::new(Analysis {
        draft,
        prediction,
        comparables,
    })));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockPredictor;
    use stay_core::PropertyType;
    use stay_handoff::MemoryHandoff;

    fn submitted_store() -> MemoryHandoff {
        let mut draft = PropertyDraft::new();
        draft.property_type = Some(PropertyType::Apartment);
        draft.address = "서울특별시 강남구 테헤란로".into();
        draft.bedroom_count = Some(2);
        draft.bathroom_count = Some(1);
        draft.max_guests = Some(3);
        let store = MemoryHandoff::new();
        store.write(&draft).unwrap();
        store
    }

    fn predictor() -> Arc<dyn Predictor> {
        Arc::new(MockPredictor::seeded(3))
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_handoff_stays_pending() {
        let viewer = ResultViewer::open(&MemoryHandoff::new(), predictor(), LoadingTiming::default());
        assert!(viewer.is_pending());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(viewer.phase(), ViewerPhase::Pending);
        assert!(viewer.wait_ready().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_garbage_handoff_stays_pending() {
        let store = MemoryHandoff::new();
        store.put_raw("definitely not a draft");
        let viewer = ResultViewer::open(&store, predictor(), LoadingTiming::default());
        assert!(viewer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotonic_and_ends_at_100() {
        let viewer = ResultViewer::open(&submitted_store(), predictor(), LoadingTiming::default());
        let mut rx = viewer.subscribe();

        let mut seen = vec![rx.borrow_and_update().clone()];
        while rx.changed().await.is_ok() {
            let phase = rx.borrow_and_update().clone();
            let done = phase.is_ready();
            seen.push(phase);
            if done {
                break;
            }
        }

        let progress: Vec<u8> = seen.iter().map(ViewerPhase::progress).collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
        assert_eq!(progress.last(), Some(&100));
        assert_eq!(progress.iter().filter(|p| **p > 100).count(), 0);
        assert!(seen.last().map(ViewerPhase::is_ready).unwrap_or(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stages_follow_the_timer() {
        let viewer = ResultViewer::open(&submitted_store(), predictor(), LoadingTiming::default());
        assert_eq!(viewer.phase().stage(), Some(AnalysisStage::PropertyInfo));

        tokio::time::sleep(Duration::from_millis(850)).await;
        assert_eq!(
            viewer.phase(),
            ViewerPhase::Loading { stage: AnalysisStage::MarketData, progress: 20 }
        );

        tokio::time::sleep(Duration::from_millis(2400)).await;
        assert_eq!(
            viewer.phase(),
            ViewerPhase::Loading { stage: AnalysisStage::Complete, progress: 80 }
        );

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(viewer.phase().progress(), 100);
        assert!(!viewer.phase().is_ready());

        tokio::time::sleep(Duration::from_millis(500)).await;
        let analysis = viewer.phase().analysis().cloned().unwrap();
        assert_eq!(analysis.comparables.len(), 3);
        assert_eq!(analysis.draft.bedroom_count, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ready_returns_analysis() {
        let viewer = ResultViewer::open(&submitted_store(), predictor(), LoadingTiming::default());
        let analysis = viewer.wait_ready().await.unwrap();
        assert!(crate::predictor::PRICE_DRAW.contains(&analysis.prediction.predicted_price));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_stops_updates() {
        let mut viewer = ResultViewer::open(&submitted_store(), predictor(), LoadingTiming::default());
        tokio::time::sleep(Duration::from_millis(900)).await;
        let before = viewer.phase();

        viewer.close();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(viewer.phase(), before);
        assert!(viewer.wait_ready().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_serializes_with_tag() {
        let viewer = ResultViewer::open(&MemoryHandoff::new(), predictor(), LoadingTiming::default());
        let json = serde_json::to_string(&viewer.phase()).unwrap();
        assert_eq!(json, r#"{"phase":"pending"}"#);
    }
}
