use serde::{Deserialize, Serialize};
use std::fmt;

/// Momentary mood rating on a 0..=4 scale (0 = very bad, 4 = very good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sentiment(u8);

impl Sentiment {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 4;
    pub const NEUTRAL: Sentiment = Sentiment(2);

    /// Build a sentiment from any integer, clamping into 0..=4.
    pub fn clamped(value: i64) -> Self {
        Sentiment(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Strict constructor, used when reading rows back from the store.
    pub fn try_new(value: i64) -> Option<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Some(Sentiment(value as u8))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Sentiment::clamped(-3).value(), 0);
        assert_eq!(Sentiment::clamped(9).value(), 4);
        assert_eq!(Sentiment::clamped(3).value(), 3);
    }

    #[test]
    fn default_is_neutral_midpoint() {
        assert_eq!(Sentiment::default().value(), 2);
    }

    #[test]
    fn strict_constructor_rejects_out_of_range() {
        assert!(Sentiment::try_new(5).is_none());
        assert!(Sentiment::try_new(-1).is_none());
        assert_eq!(Sentiment::try_new(0), Some(Sentiment::clamped(0)));
    }
}
