use serde::Serialize;

/// Star rating from 1 to 5 derived from a predicted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PerformanceRating(u8);

impl PerformanceRating {
    pub const MIN: PerformanceRating = PerformanceRating(1);
    pub const MAX: PerformanceRating = PerformanceRating(5);

    /// Thresholds are checked top-down; scores outside 0-100 land on 1 or 5.
    pub fn from_score(score: f64) -> Self {
        let stars = if score >= 85.0 {
            5
        } else if score >= 70.0 {
            4
        } else if score >= 55.0 {
            3
        } else if score >= 40.0 {
            2
        } else {
            1
        };
        PerformanceRating(stars)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn stars(self) -> String {
        "★".repeat(usize::from(self.0))
    }
}
