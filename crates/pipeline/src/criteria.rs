//! Client-held refinement state.

/// Category and status selections from the listing view.
///
/// An empty selection is stored as `None`, so "no filter" has exactly one
/// representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub status: Option<String>,
}

impl FilterCriteria {
    /// Criteria that keep everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.set_category(Some(category.into()));
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.set_status(Some(status.into()));
        self
    }

    /// Replace the category selection; `Some("")` clears it.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    /// Replace the status selection; `Some("")` clears it.
    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status.filter(|s| !s.is_empty());
    }

    /// True when neither criterion is set
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_clears() {
        let mut criteria = FilterCriteria::new().with_category("Fiction").with_status("ACTIVE");
        assert!(!criteria.is_empty());

        criteria.set_category(Some(String::new()));
        criteria.set_status(None);
        assert!(criteria.is_empty());
        assert_eq!(criteria, FilterCriteria::default());
    }
}
