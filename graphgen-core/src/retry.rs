//! Guard for the open-ended "sample until accepted" loops.

use std::num::NonZeroUsize;

use tracing::warn;

use crate::{
    Result,
    error::{GraphGenError, RetryStage},
};

/// Counts consecutive rejected attempts against an optional limit.
#[derive(Debug)]
pub(crate) struct RetryBudget {
    stage: RetryStage,
    limit: Option<NonZeroUsize>,
    rejections: usize,
}

impl RetryBudget {
    pub(crate) const fn new(stage: RetryStage, limit: Option<NonZeroUsize>) -> Self {
        Self {
            stage,
            limit,
            rejections: 0,
        }
    }

    /// Records an accepted attempt, resetting the rejection streak.
    pub(crate) const fn accept(&mut self) {
        self.rejections = 0;
    }

    /// Records a rejected attempt, failing once the streak reaches the limit.
    pub(crate) fn reject(&mut self) -> Result<()> {
        self.rejections += 1;
        match self.limit {
            Some(limit) if self.rejections >= limit.get() => {
                warn!(
                    stage = self.stage.as_str(),
                    attempts = self.rejections,
                    "retry limit exhausted"
                );
                Err(GraphGenError::RetryLimitExceeded {
                    stage: self.stage,
                    attempts: self.rejections,
                })
            }
            _ => Ok(()),
        }
    }

    /// Records the outcome of an insertion attempt.
    pub(crate) fn record(&mut self, accepted: bool) -> Result<()> {
        if accepted {
            self.accept();
            Ok(())
        } else {
            self.reject()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_budget_never_fails() {
        let mut budget = RetryBudget::new(RetryStage::Fill, None);
        for _ in 0..10_000 {
            budget.reject().expect("unlimited budget must not fail");
        }
    }

    #[test]
    fn limit_counts_consecutive_rejections() {
        let mut budget = RetryBudget::new(RetryStage::GlobalCorrection, NonZeroUsize::new(3));
        budget.reject().expect("first rejection is tolerated");
        budget.reject().expect("second rejection is tolerated");
        budget.accept();
        budget.reject().expect("streak restarted after acceptance");
        budget.reject().expect("second rejection of new streak");
        let err = budget.reject().expect_err("third consecutive rejection fails");
        assert_eq!(
            err,
            GraphGenError::RetryLimitExceeded {
                stage: RetryStage::GlobalCorrection,
                attempts: 3,
            }
        );
    }

    #[test]
    fn record_dispatches_on_outcome() {
        let mut budget = RetryBudget::new(RetryStage::PatternGrowth, NonZeroUsize::new(1));
        budget.record(true).expect("acceptance never fails");
        assert!(budget.record(false).is_err());
    }
}
