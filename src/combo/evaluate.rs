use super::{ComboSpec, Condition, Line, Locality, Requirement};

/// Read access to a resolved trial: how many copies of a card ended up in
/// the hand or stayed in the deck
pub trait TrialView {
    fn count_in(&self, locality: Locality, card: &str) -> usize;
}

impl Requirement {
    pub fn is_satisfied<V: TrialView + ?Sized>(&self, trial: &V) -> bool {
        trial.count_in(self.locality, &self.card) >= self.count
    }
}

impl Condition {
    pub fn is_satisfied<V: TrialView + ?Sized>(&self, trial: &V) -> bool {
        self.any_of.iter().any(|req| req.is_satisfied(trial))
    }
}

impl Line {
    pub fn is_satisfied<V: TrialView + ?Sized>(&self, trial: &V) -> bool {
        self.all_of.iter().all(|cond| cond.is_satisfied(trial))
    }
}

impl ComboSpec {
    /// An empty combo is never satisfied
    pub fn is_satisfied<V: TrialView + ?Sized>(&self, trial: &V) -> bool {
        self.lines.iter().any(|line| line.is_satisfied(trial))
    }
}
