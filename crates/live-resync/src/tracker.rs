//! Pause/resume bookkeeping for live-edge resync.
//!
//! The tracker is a two-state machine (`Playing`, `Paused(started_at)`) that
//! measures wall-clock pause length and decides on resume whether the player
//! has drifted far enough behind the live edge to warrant a jump. It performs
//! no host commands itself; [`crate::controller::ResyncController`] acts on
//! the returned [`ResumeDecision`].

use live_resync_types::PauseState;

/// Verdict produced when playback resumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumeDecision {
    /// No viewer pause was recorded (spurious resume, or seek-induced pause).
    NoPauseRecorded,
    /// Source is not live; elapsed time is reported but never acted on.
    NotLive { paused_ms: u64 },
    /// Pause did not exceed the threshold.
    WithinThreshold { paused_ms: u64, threshold_ms: u64 },
    /// Pause exceeded the threshold on a live source.
    Resync { paused_ms: u64 },
}

#[derive(Clone, Debug)]
pub struct PauseResyncTracker {
    state: PauseState,
    threshold_ms: u64,
}

impl PauseResyncTracker {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            state: PauseState::Playing,
            threshold_ms,
        }
    }

    pub fn state(&self) -> PauseState {
        self.state
    }

    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    /// Takes effect on the next resume; a pending pause keeps its timestamp.
    pub fn set_threshold_ms(&mut self, threshold_ms: u64) {
        self.threshold_ms = threshold_ms;
    }

    /// `true` while a pause is recorded and waiting for its resume decision.
    pub fn is_resync_pending(&self) -> bool {
        matches!(self.state, PauseState::Paused { .. })
    }

    /// Record a pause at `now_ms`.
    ///
    /// A pause that coincides with an in-progress seek is a transport
    /// transition, not the viewer walking away, and does not start the timer.
    /// Returns whether a pause timestamp was recorded.
    pub fn notify_pause(&mut self, now_ms: u64, seeking: bool) -> bool {
        if seeking {
            tracing::debug!(now_ms, "seek-induced pause ignored");
            return false;
        }
        self.state = PauseState::Paused {
            started_at_ms: now_ms,
        };
        tracing::info!(now_ms, "pause recorded");
        true
    }

    /// Consume the recorded pause and decide whether to resync.
    pub fn notify_resume(&mut self, now_ms: u64, is_live: bool) -> ResumeDecision {
        let PauseState::Paused { started_at_ms } = std::mem::take(&mut self.state) else {
            return ResumeDecision::NoPauseRecorded;
        };
        let paused_ms = now_ms.saturating_sub(started_at_ms);
        let decision = if !is_live {
            ResumeDecision::NotLive { paused_ms }
        } else if paused_ms > self.threshold_ms {
            ResumeDecision::Resync { paused_ms }
        } else {
            ResumeDecision::WithinThreshold {
                paused_ms,
                threshold_ms: self.threshold_ms,
            }
        };
        tracing::info!(
            paused_ms,
            is_live,
            threshold_ms = self.threshold_ms,
            decision = ?decision,
            "resume evaluated"
        );
        decision
    }

    /// Forget any pending pause (new source loaded, source ended).
    pub fn reset(&mut self) {
        self.state = PauseState::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u64 = 120_000;

    #[test]
    fn resume_without_pause_is_not_evaluated() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        assert_eq!(
            tracker.notify_resume(500_000, true),
            ResumeDecision::NoPauseRecorded
        );
    }

    #[test]
    fn long_pause_on_live_source_requests_resync() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        assert!(tracker.notify_pause(0, false));
        assert!(tracker.is_resync_pending());
        assert_eq!(
            tracker.notify_resume(121_000, true),
            ResumeDecision::Resync { paused_ms: 121_000 }
        );
        assert!(!tracker.is_resync_pending());
    }

    #[test]
    fn pause_at_threshold_is_within_threshold() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        tracker.notify_pause(1_000, false);
        assert_eq!(
            tracker.notify_resume(121_000, true),
            ResumeDecision::WithinThreshold {
                paused_ms: 120_000,
                threshold_ms: THRESHOLD
            }
        );
    }

    #[test]
    fn non_live_source_never_resyncs() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        for paused_ms in [0, 119_000, 121_000, 86_400_000] {
            tracker.notify_pause(0, false);
            assert_eq!(
                tracker.notify_resume(paused_ms, false),
                ResumeDecision::NotLive { paused_ms }
            );
        }
    }

    #[test]
    fn each_cycle_measures_its_own_pause() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        tracker.notify_pause(0, false);
        assert!(matches!(
            tracker.notify_resume(100_000, true),
            ResumeDecision::WithinThreshold { paused_ms: 100_000, .. }
        ));
        tracker.notify_pause(100_500, false);
        assert!(matches!(
            tracker.notify_resume(200_500, true),
            ResumeDecision::WithinThreshold { paused_ms: 100_000, .. }
        ));
        // A second resume consumes nothing.
        assert_eq!(
            tracker.notify_resume(400_000, true),
            ResumeDecision::NoPauseRecorded
        );
    }

    #[test]
    fn seek_induced_pause_does_not_start_timer() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        assert!(!tracker.notify_pause(0, true));
        assert!(!tracker.is_resync_pending());
        assert_eq!(
            tracker.notify_resume(10_000_000, true),
            ResumeDecision::NoPauseRecorded
        );
    }

    #[test]
    fn seek_pause_keeps_existing_viewer_pause() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        tracker.notify_pause(0, false);
        tracker.notify_pause(60_000, true);
        assert_eq!(
            tracker.state(),
            PauseState::Paused { started_at_ms: 0 }
        );
    }

    #[test]
    fn clock_going_backwards_yields_zero_elapsed() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        tracker.notify_pause(50_000, false);
        assert!(matches!(
            tracker.notify_resume(10_000, true),
            ResumeDecision::WithinThreshold { paused_ms: 0, .. }
        ));
    }

    #[test]
    fn reset_drops_pending_pause() {
        let mut tracker = PauseResyncTracker::new(THRESHOLD);
        tracker.notify_pause(0, false);
        tracker.reset();
        assert_eq!(tracker.state(), PauseState::Playing);
        assert_eq!(
            tracker.notify_resume(500_000, true),
            ResumeDecision::NoPauseRecorded
        );
    }
}
