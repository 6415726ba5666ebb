//! The intake wizard: a draft plus the step it is on

use stay_core::{Amenity, LatLng, PropertyDraft, PropertyType};
use stay_handoff::HandoffStore;
use tracing::{debug, info};

use crate::{DraftPreview, Result, SuggestionList, WizardError, WizardStep};

/// A failed submission hands the wizard back untouched.
#[derive(Debug, thiserror::Error)]
#[error("submission rejected: {error}")]
pub struct SubmitRejected {
    pub wizard: Box<IntakeWizard>,
    #[source]
    pub error: WizardError,
}

/// Owns the draft while the host fills it in.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeWizard {
    step: WizardStep,
    draft: PropertyDraft,
    suggestions: SuggestionList,
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self::starting_at(stay_core::FALLBACK_LOCATION)
    }

    /// Fresh wizard whose draft is anchored at `location`.
    pub fn starting_at(location: LatLng) -> Self {
        Self {
            step: WizardStep::FIRST,
            draft: PropertyDraft::at(location),
            suggestions: SuggestionList::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &PropertyDraft {
        &self.draft
    }

    /// 33, 66 or 100
    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.step.number()) * 100 / WizardStep::ALL.len() as u16) as u8
    }

    pub fn can_advance(&self) -> bool {
        !self.step.is_last() && self.step.is_complete(&self.draft)
    }

    pub fn can_retreat(&self) -> bool {
        self.step.prev().is_some()
    }

    pub fn can_submit(&self) -> bool {
        self.step.is_last() && self.step.is_complete(&self.draft)
    }

    pub fn advance(&mut self) -> Result<WizardStep> {
        match self.step.advance(&self.draft) {
            Ok(next) => {
                debug!(from = %self.step, to = %next, "wizard advanced");
                self.step = next;
                Ok(next)
            }
            Err(e) => {
                debug!(step = %self.step, error = %e, "advance rejected");
                Err(e)
            }
        }
    }

    pub fn retreat(&mut self) -> Result<WizardStep> {
        let prev = self.step.retreat()?;
        debug!(from = %self.step, to = %prev, "wizard retreated");
        self.step = prev;
        Ok(prev)
    }

    pub fn set_property_type(&mut self, kind: PropertyType) {
        self.draft.property_type = Some(kind);
    }

    /// Typing into the address field.
    pub fn set_address(&mut self, text: impl Into<String>) {
        self.draft.address = text.into();
        self.suggestions.on_edit(&self.draft.address);
    }

    pub fn focus_address(&mut self) {
        self.suggestions.on_focus(&self.draft.address);
    }

    /// Take a suggestion verbatim and close the list.
    pub fn select_suggestion(&mut self, suggestion: &str) {
        self.draft.address = suggestion.to_string();
        self.suggestions.on_select();
    }

    /// Suggestions to draw right now.
    pub fn suggestions(&self) -> Vec<&'static str> {
        self.suggestions.visible(&self.draft.address)
    }

    pub fn set_bedroom_count(&mut self, count: u32) -> Result<()> {
        self.draft.bedroom_count = Some(positive("bedroomCount", count)?);
        Ok(())
    }

    pub fn set_bathroom_count(&mut self, count: u32) -> Result<()> {
        self.draft.bathroom_count = Some(positive("bathroomCount", count)?);
        Ok(())
    }

    pub fn set_max_guests(&mut self, count: u32) -> Result<()> {
        self.draft.max_guests = Some(positive("maxGuests", count)?);
        Ok(())
    }

    /// Flip membership of `amenity`; returns whether it is now selected.
    pub fn toggle_amenity(&mut self, amenity: Amenity) -> bool {
        let amenities = &mut self.draft.selected_amenities;
        if amenities.remove(&amenity) {
            false
        } else {
            amenities.insert(amenity);
            true
        }
    }

    pub fn preview(&self) -> DraftPreview {
        DraftPreview::build(&self.draft, self.step)
    }

    /// Write the draft into `store` and consume the wizard.
    pub fn submit(
        self,
        store: &dyn HandoffStore,
    ) -> std::result::Result<PropertyDraft, SubmitRejected> {
        if !self.step.is_last() {
            let step = self.step;
            return Err(self.reject(WizardError::NotTerminal { step }));
        }
        if let Some(step) = self.step.first_incomplete(&self.draft) {
            return Err(self.reject(WizardError::Incomplete { step }));
        }
        if let Err(e) = store.write(&self.draft) {
            return Err(self.reject(e.into()));
        }

        info!(
            property_type = ?self.draft.property_type,
            amenities = self.draft.selected_amenities.len(),
            "draft submitted"
        );
        Ok(self.draft)
    }

    fn reject(self, error: WizardError) -> SubmitRejected {
        debug!(step = %self.step, error = %error, "submit rejected");
        SubmitRejected {
            wizard: Box::new(self),
            error,
        }
    }
}

fn positive(field: &'static str, count: u32) -> Result<u32> {
    if count == 0 {
        return Err(stay_core::Error::InvalidValue {
            field,
            value: count.to_string(),
        }
        .into());
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stay_handoff::MemoryHandoff;

    fn ready_wizard() -> IntakeWizard {
        let mut wizard = IntakeWizard::new();
        wizard.set_property_type(PropertyType::Apartment);
        wizard.set_address("서울특별시 마포구 홍대입구역");
        wizard.advance().unwrap();
        wizard.set_bedroom_count(2).unwrap();
        wizard.set_bathroom_count(1).unwrap();
        wizard.set_max_guests(4).unwrap();
        wizard.advance().unwrap();
        wizard
    }

    #[test]
    fn test_new_wizard() {
        let wizard = IntakeWizard::new();
        assert_eq!(wizard.step(), WizardStep::BasicInfo);
        assert_eq!(wizard.progress_percent(), 33);
        assert!(!wizard.can_advance());
        assert!(!wizard.can_retreat());
        assert!(!wizard.can_submit());
    }

    #[test]
    fn test_rejected_advance_leaves_state() {
        let mut wizard = IntakeWizard::new();
        wizard.set_address("서울특별시 종로구 명동");
        let before = wizard.clone();

        assert!(wizard.advance().is_err());
        assert_eq!(wizard, before);
    }

    #[test]
    fn test_setters_do_not_move_step() {
        let mut wizard = IntakeWizard::new();
        wizard.set_property_type(PropertyType::Villa);
        wizard.set_address("a");
        wizard.set_bedroom_count(1).unwrap();
        wizard.toggle_amenity(Amenity::Pool);
        assert_eq!(wizard.step(), WizardStep::BasicInfo);
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut wizard = IntakeWizard::new();
        assert!(matches!(
            wizard.set_max_guests(0),
            Err(WizardError::Invalid(_))
        ));
        assert!(wizard.draft().max_guests.is_none());
    }

    #[test]
    fn test_toggle_pair_restores_amenities() {
        let mut wizard = IntakeWizard::new();
        wizard.toggle_amenity(Amenity::Wifi);
        let before = wizard.draft().selected_amenities.clone();

        assert!(wizard.toggle_amenity(Amenity::Kitchen));
        assert!(!wizard.toggle_amenity(Amenity::Kitchen));
        assert_eq!(wizard.draft().selected_amenities, before);

        assert!(!wizard.toggle_amenity(Amenity::Wifi));
        assert!(wizard.draft().selected_amenities.is_empty());
    }

    #[test]
    fn test_walk_forward_and_back() {
        let mut wizard = ready_wizard();
        assert_eq!(wizard.step(), WizardStep::Amenities);
        assert_eq!(wizard.progress_percent(), 100);
        assert!(wizard.can_submit());
        assert!(matches!(wizard.advance(), Err(WizardError::AtLastStep)));

        assert_eq!(wizard.retreat().unwrap(), WizardStep::Capacity);
        assert_eq!(wizard.progress_percent(), 66);
        assert_eq!(wizard.retreat().unwrap(), WizardStep::BasicInfo);
        assert!(matches!(wizard.retreat(), Err(WizardError::AtFirstStep)));
        assert_eq!(wizard.step(), WizardStep::BasicInfo);
    }

    #[test]
    fn test_suggestion_flow() {
        let mut wizard = IntakeWizard::new();
        wizard.set_address("강남");
        assert_eq!(wizard.suggestions().len(), 2);

        wizard.select_suggestion("서울특별시 서초구 강남역");
        assert_eq!(wizard.draft().address, "서울특별시 서초구 강남역");
        assert!(wizard.suggestions().is_empty());

        wizard.focus_address();
        assert_eq!(wizard.suggestions(), vec!["서울특별시 서초구 강남역"]);

        wizard.set_address("");
        assert!(wizard.suggestions().is_empty());
    }

    #[test]
    fn test_submit_writes_handoff() {
        let store = MemoryHandoff::new();
        let mut wizard = ready_wizard();
        wizard.toggle_amenity(Amenity::Balcony);

        let draft = wizard.submit(&store).unwrap();
        assert_eq!(store.read().unwrap(), Some(draft));
    }

    #[test]
    fn test_submit_before_last_step_returns_wizard() {
        let store = MemoryHandoff::new();
        let mut wizard = IntakeWizard::new();
        wizard.set_property_type(PropertyType::House);

        let rejected = wizard.clone().submit(&store).unwrap_err();
        assert!(matches!(
            rejected.error,
            WizardError::NotTerminal { step: WizardStep::BasicInfo }
        ));
        assert_eq!(*rejected.wizard, wizard);
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_submit_with_cleared_field_is_rejected() {
        let store = MemoryHandoff::new();
        let mut wizard = ready_wizard();
        wizard.set_address("");

        let rejected = wizard.submit(&store).unwrap_err();
        assert!(matches!(
            rejected.error,
            WizardError::Incomplete { step: WizardStep::BasicInfo }
        ));
        assert!(store.read().unwrap().is_none());
    }
}
