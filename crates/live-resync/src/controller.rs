//! Session-level coordinator for pause resync and segment retention.
//!
//! Receives host lifecycle events (pause, play, time updates) and routes them
//! to the tracker, the segment buffer and the live indicator. When the tracker
//! asks for a resync, the controller issues the seek to the host first and
//! only then discards local history, so a failed seek leaves the buffer as it
//! was.

use live_resync_types::{LiveJump, MediaSource, ResumeOutcome, ResyncStatus};

use crate::clock::Clock;
use crate::config::{ConfigUpdate, ResyncConfig};
use crate::error::{ResyncError, Result};
use crate::events::{SessionEvent, Subscription};
use crate::indicator::{IndicatorTimer, LiveIndicator};
use crate::segment_buffer::RollingSegmentBuffer;
use crate::session::MediaSession;
use crate::tracker::{PauseResyncTracker, ResumeDecision};

/// What a single host event did to the core.
#[derive(Clone, Debug, PartialEq)]
pub enum EventOutcome {
    Paused { recorded: bool },
    Resumed(ResumeOutcome),
    Ticked { evicted: usize },
    Ended,
    Errored,
}

pub struct ResyncController<S, C, P> {
    session: S,
    clock: C,
    config: ResyncConfig,
    tracker: PauseResyncTracker,
    buffer: RollingSegmentBuffer<P>,
    indicator: LiveIndicator,
    source: Option<MediaSource>,
}

impl<S: MediaSession, C: Clock, P> ResyncController<S, C, P> {
    pub fn new(session: S, clock: C, config: ResyncConfig) -> Self {
        Self {
            tracker: PauseResyncTracker::new(config.resync_threshold_ms),
            buffer: RollingSegmentBuffer::new(config.retention_window_ms),
            indicator: LiveIndicator::new(config.live_indicator_duration_ms),
            session,
            clock,
            config,
            source: None,
        }
    }

    pub fn config(&self) -> &ResyncConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn tracker(&self) -> &PauseResyncTracker {
        &self.tracker
    }

    pub fn buffer(&self) -> &RollingSegmentBuffer<P> {
        &self.buffer
    }

    pub fn indicator(&self) -> &LiveIndicator {
        &self.indicator
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    /// Apply a partial configuration update.
    ///
    /// On a validation failure nothing changes and the previous configuration
    /// stays in effect.
    pub fn configure(&mut self, update: &ConfigUpdate) -> Result<()> {
        let next = match self.config.merged(update) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(error = %err, "configuration rejected");
                return Err(err);
            }
        };
        self.tracker.set_threshold_ms(next.resync_threshold_ms);
        self.indicator.set_duration_ms(next.live_indicator_duration_ms);
        if next.retention_window_ms != self.config.retention_window_ms {
            self.buffer.set_retention_window_ms(next.retention_window_ms);
        }
        tracing::info!(
            resync_threshold_ms = next.resync_threshold_ms,
            retention_window_ms = next.retention_window_ms,
            live_indicator_duration_ms = next.live_indicator_duration_ms,
            "resync configuration applied"
        );
        self.config = next;
        Ok(())
    }

    /// Hand a new source to the host and start from a clean slate.
    ///
    /// Pause state, segment history and the indicator timer of the previous
    /// source never carry over.
    pub fn load_source(&mut self, source: MediaSource) -> Result<()> {
        self.session.load_source(&source)?;
        self.tracker.reset();
        self.buffer.flush();
        self.indicator.cancel();
        tracing::info!(url = %source.url, kind = ?source.kind, "source loaded");
        self.source = Some(source);
        Ok(())
    }

    /// Host paused. Returns whether the pause timer was started.
    pub fn notify_pause(&mut self) -> bool {
        let seeking = self.session.is_seeking();
        self.record_pause(seeking)
    }

    fn record_pause(&mut self, seeking: bool) -> bool {
        self.tracker.notify_pause(self.clock.now_ms(), seeking)
    }

    /// Host resumed playback; jump to the live edge if the pause ran too long.
    pub fn notify_resume(&mut self) -> Result<ResumeOutcome> {
        let now_ms = self.clock.now_ms();
        let is_live = self.session.is_live_source();
        match self.tracker.notify_resume(now_ms, is_live) {
            ResumeDecision::NoPauseRecorded => Ok(ResumeOutcome::NoPauseRecorded),
            ResumeDecision::NotLive { paused_ms } => Ok(ResumeOutcome::NotLive { paused_ms }),
            ResumeDecision::WithinThreshold {
                paused_ms,
                threshold_ms,
            } => Ok(ResumeOutcome::WithinThreshold {
                paused_ms,
                threshold_ms,
            }),
            ResumeDecision::Resync { paused_ms } => {
                let live_edge = self.session.live_edge_position().filter(|p| p.is_finite());
                let Some(target) = live_edge else {
                    tracing::info!(paused_ms, "live edge not known yet; resync skipped");
                    return Ok(ResumeOutcome::LiveEdgeUnavailable { paused_ms });
                };
                let jump = self.jump_to(target, now_ms)?;
                Ok(ResumeOutcome::Resynced { paused_ms, jump })
            }
        }
    }

    /// Periodic progress tick carrying the segment consumed at `position`.
    ///
    /// Returns the number of history records evicted.
    pub fn notify_time_update(&mut self, position: f64, payload: P) -> usize {
        let paused = self.session.is_paused();
        self.record_time_update(paused, position, payload)
    }

    fn record_time_update(&mut self, paused: bool, position: f64, payload: P) -> usize {
        self.indicator.poll(self.clock.now_ms());
        self.buffer.record_tick(paused, position, payload)
    }

    /// Source played to the end; a pause recorded around it is not a viewer pause.
    pub fn notify_ended(&mut self) {
        self.tracker.reset();
        tracing::info!("playback ended");
    }

    pub fn notify_error(&mut self, message: &str) {
        tracing::warn!(error = message, "host media error");
    }

    /// Seek to the live edge (or the end of the seekable range when the
    /// streaming library has not reported one), show the indicator, and drop
    /// segment history.
    pub fn jump_to_live(&mut self) -> Result<LiveJump> {
        let target = self
            .session
            .live_edge_position()
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| self.session.duration());
        let now_ms = self.clock.now_ms();
        self.jump_to(target, now_ms)
    }

    fn jump_to(&mut self, target: f64, now_ms: u64) -> Result<LiveJump> {
        if !target.is_finite() {
            tracing::warn!(target, "no finite live edge to seek to; segment history kept");
            return Err(ResyncError::NonFiniteSeekTarget { target });
        }
        if let Err(err) = self.session.seek_to(target) {
            tracing::warn!(target, error = %err, "live edge seek failed; segment history kept");
            return Err(err.into());
        }
        let timer = self.indicator.show(now_ms);
        let flushed_segments = self.buffer.flush();
        tracing::info!(target, flushed_segments, "jumped to live edge");
        Ok(LiveJump {
            target_position: target,
            flushed_segments,
            indicator_hide_at_ms: timer.hide_at_ms,
        })
    }

    /// Route one host event to the matching `notify_*` handling.
    ///
    /// Pause and time-update events are judged by the seeking and paused
    /// flags they carry, not by the host's state when the queue is drained.
    pub fn handle_event(&mut self, event: SessionEvent<P>) -> Result<EventOutcome> {
        match event {
            SessionEvent::Pause { seeking } => Ok(EventOutcome::Paused {
                recorded: self.record_pause(seeking),
            }),
            SessionEvent::Play => self.notify_resume().map(EventOutcome::Resumed),
            SessionEvent::TimeUpdate {
                position,
                payload,
                paused,
            } => Ok(EventOutcome::Ticked {
                evicted: self.record_time_update(paused, position, payload),
            }),
            SessionEvent::Ended => {
                self.notify_ended();
                Ok(EventOutcome::Ended)
            }
            SessionEvent::Error { message } => {
                self.notify_error(&message);
                Ok(EventOutcome::Errored)
            }
        }
    }

    /// Handle every queued event in order.
    ///
    /// Stops at the first failure; events after it stay queued for the next drain.
    pub fn drain(&mut self, subscription: &Subscription<P>) -> Result<Vec<EventOutcome>> {
        let mut outcomes = Vec::new();
        while let Some(event) = subscription.try_next() {
            outcomes.push(self.handle_event(event)?);
        }
        Ok(outcomes)
    }

    pub fn pending_indicator_timer(&self) -> Option<IndicatorTimer> {
        self.indicator.pending_timer()
    }

    /// Host timer callback for the indicator; stale tokens are ignored.
    pub fn on_indicator_timer(&mut self, token: u64) -> bool {
        self.indicator.on_timer(token)
    }

    /// Hide the indicator if its deadline has passed.
    pub fn poll_timers(&mut self) -> bool {
        self.indicator.poll(self.clock.now_ms())
    }

    pub fn is_resync_pending(&self) -> bool {
        self.tracker.is_resync_pending()
    }

    pub fn live_indicator_visible(&self) -> bool {
        self.indicator.is_visible()
    }

    pub fn status(&self) -> ResyncStatus {
        ResyncStatus {
            source: self.source.clone(),
            pause: self.tracker.state(),
            resync_pending: self.tracker.is_resync_pending(),
            buffered_segments: self.buffer.len(),
            oldest_position: self.buffer.oldest_position(),
            newest_position: self.buffer.newest_position(),
            history_ms: self.buffer.history_ms(),
            live_indicator_visible: self.indicator.is_visible(),
            indicator_hide_at_ms: self.indicator.pending_timer().map(|t| t.hide_at_ms),
            resync_threshold_ms: self.config.resync_threshold_ms,
            retention_window_ms: self.config.retention_window_ms,
        }
    }

    /// End the session: cancel the indicator timer, drop local state and
    /// return the host session.
    pub fn teardown(mut self) -> S {
        self.indicator.cancel();
        self.tracker.reset();
        let flushed = self.buffer.flush();
        tracing::info!(flushed, "resync session torn down");
        self.session
    }
}
