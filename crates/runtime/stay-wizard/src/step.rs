//! Wizard steps and their transition table

use serde::{Deserialize, Serialize};
use std::fmt;
use stay_core::PropertyDraft;

use crate::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WizardStep {
    BasicInfo,
    Capacity,
    Amenities,
}

/// How a step indicator is drawn relative to the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Done,
    Current,
    Upcoming,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        WizardStep::BasicInfo,
        WizardStep::Capacity,
        WizardStep::Amenities,
    ];

    pub const FIRST: WizardStep = WizardStep::BasicInfo;
    pub const LAST: WizardStep = WizardStep::Amenities;

    /// 1-based position
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::BasicInfo => 1,
            WizardStep::Capacity => 2,
            WizardStep::Amenities => 3,
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::BasicInfo => Some(WizardStep::Capacity),
            WizardStep::Capacity => Some(WizardStep::Amenities),
            WizardStep::Amenities => None,
        }
    }

    pub fn prev(&self) -> Option<WizardStep> {
        match self {
            WizardStep::BasicInfo => None,
            WizardStep::Capacity => Some(WizardStep::BasicInfo),
            WizardStep::Amenities => Some(WizardStep::Capacity),
        }
    }

    pub fn is_last(&self) -> bool {
        *self == Self::LAST
    }

    /// This step's own required fields. Amenities are optional.
    pub fn requirement_met(&self, draft: &PropertyDraft) -> bool {
        match self {
            WizardStep::BasicInfo => draft.has_basic_info(),
            WizardStep::Capacity => draft.has_capacity(),
            WizardStep::Amenities => true,
        }
    }

    /// Required fields of this step and every earlier one.
    pub fn is_complete(&self, draft: &PropertyDraft) -> bool {
        Self::ALL
            .iter()
            .take_while(|s| *s <= self)
            .all(|s| s.requirement_met(draft))
    }

    /// The first step (up to and including this one) missing a required field.
    pub fn first_incomplete(&self, draft: &PropertyDraft) -> Option<WizardStep> {
        Self::ALL
            .into_iter()
            .take_while(|s| s <= self)
            .find(|s| !s.requirement_met(draft))
    }

    /// Forward transition, rejected while anything up to here is incomplete.
    pub fn advance(self, draft: &PropertyDraft) -> Result<WizardStep, WizardError> {
        if let Some(step) = self.first_incomplete(draft) {
            return Err(WizardError::Incomplete { step });
        }
        self.next().ok_or(WizardError::AtLastStep)
    }

    /// Backward transition, always allowed past the first step.
    pub fn retreat(self) -> Result<WizardStep, WizardError> {
        self.prev().ok_or(WizardError::AtFirstStep)
    }

    pub fn marker(&self, current: WizardStep) -> StepMarker {
        match self.cmp(&current) {
            std::cmp::Ordering::Less => StepMarker::Done,
            std::cmp::Ordering::Equal => StepMarker::Current,
            std::cmp::Ordering::Greater => StepMarker::Upcoming,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "숙소 기본 정보",
            WizardStep::Capacity => "숙소 상세 정보",
            WizardStep::Amenities => "편의시설 선택",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "숙소의 유형과 위치를 알려주세요",
            WizardStep::Capacity => "숙소의 규모와 수용 인원을 입력해주세요",
            WizardStep::Amenities => "제공하는 편의시설을 선택해주세요 (선택사항)",
        }
    }

    /// Prompt shown under the preview while on this step
    pub fn hint(&self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "기본 정보를 입력해주세요",
            WizardStep::Capacity => "숙소 상세 정보를 입력해주세요",
            WizardStep::Amenities => "편의시설을 선택해주세요",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::BasicInfo => "basic info",
            WizardStep::Capacity => "capacity",
            WizardStep::Amenities => "amenities",
        };
        write!(f, "step {} ({})", self.number(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stay_core::PropertyType;

    fn basic() -> PropertyDraft {
        let mut draft = PropertyDraft::new();
        draft.property_type = Some(PropertyType::House);
        draft.address = "서울특별시 종로구 명동".into();
        draft
    }

    fn full() -> PropertyDraft {
        let mut draft = basic();
        draft.bedroom_count = Some(3);
        draft.bathroom_count = Some(2);
        draft.max_guests = Some(6);
        draft
    }

    #[test]
    fn test_advance_from_basic_info_requires_type_and_address() {
        let mut draft = PropertyDraft::new();
        assert!(matches!(
            WizardStep::BasicInfo.advance(&draft),
            Err(WizardError::Incomplete { step: WizardStep::BasicInfo })
        ));

        draft.property_type = Some(PropertyType::Studio);
        assert!(WizardStep::BasicInfo.advance(&draft).is_err());

        draft.property_type = None;
        draft.address = "x".into();
        assert!(WizardStep::BasicInfo.advance(&draft).is_err());

        assert_eq!(WizardStep::BasicInfo.advance(&basic()).unwrap(), WizardStep::Capacity);
    }

    #[test]
    fn test_advance_from_capacity_requires_all_counts() {
        let mut draft = basic();
        draft.bedroom_count = Some(1);
        draft.bathroom_count = Some(1);
        assert!(matches!(
            WizardStep::Capacity.advance(&draft),
            Err(WizardError::Incomplete { step: WizardStep::Capacity })
        ));
        assert_eq!(WizardStep::Capacity.advance(&full()).unwrap(), WizardStep::Amenities);
    }

    #[test]
    fn test_advance_rechecks_earlier_steps() {
        let mut draft = full();
        draft.address.clear();
        assert!(matches!(
            WizardStep::Capacity.advance(&draft),
            Err(WizardError::Incomplete { step: WizardStep::BasicInfo })
        ));
    }

    #[test]
    fn test_advance_at_last_step_is_rejected() {
        assert!(matches!(
            WizardStep::Amenities.advance(&full()),
            Err(WizardError::AtLastStep)
        ));
    }

    #[test]
    fn test_retreat() {
        assert!(matches!(WizardStep::BasicInfo.retreat(), Err(WizardError::AtFirstStep)));
        assert_eq!(WizardStep::Capacity.retreat().unwrap(), WizardStep::BasicInfo);
        assert_eq!(WizardStep::Amenities.retreat().unwrap(), WizardStep::Capacity);
    }

    #[test]
    fn test_amenities_step_has_no_requirement() {
        assert!(WizardStep::Amenities.requirement_met(&PropertyDraft::new()));
        assert!(!WizardStep::Amenities.is_complete(&PropertyDraft::new()));
        assert!(WizardStep::Amenities.is_complete(&full()));
    }

    #[test]
    fn test_markers() {
        let current = WizardStep::Capacity;
        assert_eq!(WizardStep::BasicInfo.marker(current), StepMarker::Done);
        assert_eq!(WizardStep::Capacity.marker(current), StepMarker::Current);
        assert_eq!(WizardStep::Amenities.marker(current), StepMarker::Upcoming);
    }
}
