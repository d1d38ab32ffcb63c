//! Prediction result types

/// External user identifier; negative ids are valid and simply unknown to models
pub type UserId = i64;

/// External item identifier, already ranked by the producing model
pub type ItemId = u64;

/// Outcome of a single model query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    /// Ranked items, most relevant first. May be empty.
    Items(Vec<ItemId>),
    /// The model has nothing to say about this user
    NoOpinion,
}

impl Prediction {
    /// Build a prediction from a ranking, keeping at most `k` items
    pub fn ranked(mut items: Vec<ItemId>, k: usize) -> Self {
        items.truncate(k);
        Self::Items(items)
    }

    pub fn is_no_opinion(&self) -> bool {
        matches!(self, Self::NoOpinion)
    }

    /// Non-empty ranking, if any. Both `NoOpinion` and an empty list yield `None`.
    pub fn into_usable(self) -> Option<Vec<ItemId>> {
        match self {
            Self::Items(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_truncates() {
        let prediction = Prediction::ranked(vec![5, 4, 3, 2, 1], 3);
        assert_eq!(prediction, Prediction::Items(vec![5, 4, 3]));
    }

    #[test]
    fn test_ranked_keeps_short_list() {
        let prediction = Prediction::ranked(vec![9, 8], 10);
        assert_eq!(prediction, Prediction::Items(vec![9, 8]));
    }

    #[test]
    fn test_empty_list_is_not_no_opinion() {
        let empty = Prediction::Items(Vec::new());
        assert!(!empty.is_no_opinion());
        assert_eq!(empty.into_usable(), None);
    }

    #[test]
    fn test_into_usable() {
        assert_eq!(Prediction::NoOpinion.into_usable(), None);
        assert_eq!(Prediction::Items(vec![1]).into_usable(), Some(vec![1]));
    }
}
