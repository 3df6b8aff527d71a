//! Progress reporting for a snippet run.

use std::sync::Arc;

use super::SnippetResult;

/// Emitted after each transaction completes.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Transactions finished so far in this run.
    pub completed: usize,
    /// Transactions in the run.
    pub total: usize,
    /// Every filled slot so far, in input order. Unfilled slots are omitted.
    pub snapshot: Vec<Arc<SnippetResult>>,
}

impl ProgressUpdate {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_and_done() {
        let p = ProgressUpdate {
            completed: 1,
            total: 4,
            snapshot: Vec::new(),
        };
        assert!((p.fraction() - 0.25).abs() < 1e-9);
        assert!(!p.is_done());
        let empty = ProgressUpdate {
            completed: 0,
            total: 0,
            snapshot: Vec::new(),
        };
        assert!((empty.fraction() - 1.0).abs() < 1e-9);
        assert!(empty.is_done());
    }
}
