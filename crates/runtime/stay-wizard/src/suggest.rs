//! Address suggestions shown while the host types

use stay_core::ADDRESS_SUGGESTIONS;

/// Candidates containing `partial` as a case-insensitive substring, in
/// candidate order. Lowercasing is Unicode-aware.
pub fn filter_suggestions<'a>(candidates: &[&'a str], partial: &str) -> Vec<&'a str> {
    let needle = partial.to_lowercase();
    candidates
        .iter()
        .copied()
        .filter(|c| c.to_lowercase().contains(&needle))
        .collect()
}

/// Open/closed state of the suggestion dropdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionList {
    open: bool,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typing opens the list whenever there is text.
    pub fn on_edit(&mut self, text: &str) {
        self.open = !text.is_empty();
    }

    /// Focusing re-opens the list over existing text.
    pub fn on_focus(&mut self, text: &str) {
        self.open = !text.is_empty();
    }

    /// Choosing a candidate closes the list.
    pub fn on_select(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// What to draw for the current address text. Empty text hides the
    /// list no matter what happened before.
    pub fn visible(&self, text: &str) -> Vec<&'static str> {
        if !self.open || text.is_empty() {
            return Vec::new();
        }
        filter_suggestions(&ADDRESS_SUGGESTIONS, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_district() {
        let matches = filter_suggestions(&ADDRESS_SUGGESTIONS, "강남");
        assert_eq!(
            matches,
            vec!["서울특별시 강남구 테헤란로", "서울특별시 서초구 강남역"]
        );
        assert!(matches.iter().all(|m| m.contains("강남")));
    }

    #[test]
    fn test_filter_is_case_insensitive_beyond_ascii() {
        let candidates = ["Straße Nord", "STRASSE Süd", "Ärzteweg"];
        assert_eq!(filter_suggestions(&candidates, "straße"), vec!["Straße Nord"]);
        assert_eq!(filter_suggestions(&candidates, "äRZTE"), vec!["Ärzteweg"]);
        assert_eq!(filter_suggestions(&candidates, "süd"), vec!["STRASSE Süd"]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_suggestions(&ADDRESS_SUGGESTIONS, "부산").is_empty());
    }

    #[test]
    fn test_visibility_follows_edits_and_selection() {
        let mut list = SuggestionList::new();
        assert!(list.visible("강남").is_empty());

        list.on_edit("강남");
        assert_eq!(list.visible("강남").len(), 2);

        list.on_select();
        assert!(!list.is_open());
        assert!(list.visible("서울특별시 강남구 테헤란로").is_empty());

        list.on_edit("서울특별시 강남구 테헤란");
        assert_eq!(list.visible("서울특별시 강남구 테헤란"), vec!["서울특별시 강남구 테헤란로"]);
    }

    #[test]
    fn test_empty_text_hides_list() {
        let mut list = SuggestionList::new();
        list.on_edit("마포");
        assert!(list.is_open());

        list.on_edit("");
        assert!(!list.is_open());
        assert!(list.visible("").is_empty());

        // even if something left it open, empty text shows nothing
        list.on_edit("마포");
        assert!(list.visible("").is_empty());
    }

    #[test]
    fn test_focus_reopens_only_with_text() {
        let mut list = SuggestionList::new();
        list.on_focus("");
        assert!(!list.is_open());
        list.on_focus("명동");
        assert!(list.is_open());
    }
}
