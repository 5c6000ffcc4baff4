//! Best-solution retention across trials.

use crate::solution::Solution;

/// Retains the best tour/cost pair seen over an arbitrary number of trials.
///
/// The contract is pure: a candidate replaces the running best iff its cost
/// is strictly lower. The tracker does not know or care how many trials run
/// or how results are reported.
#[derive(Default)]
pub struct SolutionTracker {
    best: Option<Solution>,
}

impl SolutionTracker {
    pub fn new() -> Self {
        SolutionTracker { best: None }
    }

    /// Offer a candidate; returns true if it became the new best.
    pub fn observe(&mut self, candidate: Solution) -> bool {
        match &self.best {
            Some(best) if candidate.cost >= best.cost => false,
            _ => {
                self.best = Some(candidate);
                true
            }
        }
    }

    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Solution> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(cost: f64) -> Solution {
        Solution {
            tour: vec![0, 1, 2],
            cost,
            algorithm: "test".to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    #[test]
    fn test_strictly_lower_replaces() {
        let mut tracker = SolutionTracker::new();

        assert!(tracker.observe(solution(10.0)));
        assert!(tracker.observe(solution(9.5)));
        assert!(!tracker.observe(solution(9.5))); // equal cost is not strictly lower
        assert!(!tracker.observe(solution(11.0)));

        assert_eq!(tracker.best().map(|s| s.cost), Some(9.5));
    }

    #[test]
    fn test_empty_tracker() {
        let tracker = SolutionTracker::new();
        assert!(tracker.best().is_none());
        assert!(tracker.into_best().is_none());
    }
}
