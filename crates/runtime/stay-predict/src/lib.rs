//! # Stay Predict
//!
//! Everything between "the draft was handed off" and "the result is on screen".
//!
//! - [`Predictor`]: the pricing strategy seam. Only [`MockPredictor`] exists;
//!   it draws random numbers inside fixed bounds and is not a model.
//! - [`ResultViewer`]: reads the handoff slot once, walks five display-only
//!   analysis stages on a timer, then publishes the prediction.
//! - [`download_report`]: the PDF export stub.

pub mod predictor;
pub mod report;
pub mod stage;
pub mod viewer;

pub use predictor::{MockPredictor, Predictor};
pub use report::{download_report, REPORT_NOTICE};
pub use stage::{AnalysisStage, StageMarker};
pub use viewer::{Analysis, LoadingTiming, ResultViewer, ViewerPhase};
