//! # Stay Wizard
//!
//! Linear intake flow collecting a [`stay_core::PropertyDraft`]:
//!
//! ```text
//! ┌────────────┐ advance ┌────────────┐ advance ┌────────────┐ submit
//! │ BasicInfo  │ ──────▶ │ Capacity   │ ──────▶ │ Amenities  │ ──────▶ handoff
//! │ type+addr  │ ◀────── │ bed/bath/  │ ◀────── │ (optional) │
//! └────────────┘ retreat │ guests     │ retreat └────────────┘
//!                        └────────────┘
//! ```
//!
//! Forward moves are gated on every required field up to the current step.
//! Backward moves are unconditional. Field setters never move the step.

pub mod preview;
pub mod step;
pub mod suggest;
pub mod wizard;

pub use preview::DraftPreview;
pub use step::{StepMarker, WizardStep};
pub use suggest::{filter_suggestions, SuggestionList};
pub use wizard::{IntakeWizard, SubmitRejected};

/// Result type for stay-wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

/// Rejected wizard actions. A rejection never changes wizard state.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{step} is incomplete")]
    Incomplete { step: WizardStep },

    #[error("already at the last step")]
    AtLastStep,

    #[error("already at the first step")]
    AtFirstStep,

    #[error("submission is only allowed from the last step, currently at {step}")]
    NotTerminal { step: WizardStep },

    #[error(transparent)]
    Invalid(#[from] stay_core::Error),

    #[error("Handoff error: {0}")]
    Handoff(#[from] stay_handoff::Error),
}
