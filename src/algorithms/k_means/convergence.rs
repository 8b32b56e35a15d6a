//! Termination of the k-means loop.

use super::StopReason;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum State {
    Running,
    Stopped(StopReason),
}

/// Decides when the assign/update loop has stabilized.
///
/// The loop stops once more than `stable_iter` consecutive iterations left
/// every point in place, or once `max_iter` iterations ran, whichever comes
/// first.  Stopping is final.
#[derive(Debug)]
pub(super) struct ConvergenceMonitor {
    max_iter: usize,
    stable_iter: usize,
    iteration: usize,
    stable_streak: usize,
    state: State,
}

impl ConvergenceMonitor {
    pub fn new(max_iter: usize, stable_iter: usize) -> Self {
        Self {
            max_iter: usize::max(max_iter, 1),
            stable_iter,
            iteration: 0,
            stable_streak: 0,
            state: State::Running,
        }
    }

    /// Record the outcome of an iteration.
    pub fn observe(&mut self, changed: bool) -> State {
        if self.state != State::Running {
            return self.state;
        }

        self.iteration += 1;
        if changed {
            self.stable_streak = 0;
        } else {
            self.stable_streak += 1;
        }

        if self.stable_streak > self.stable_iter {
            self.state = State::Stopped(StopReason::Converged);
        } else if self.iteration >= self.max_iter {
            self.state = State::Stopped(StopReason::MaxIter);
        }
        self.state
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }
}
