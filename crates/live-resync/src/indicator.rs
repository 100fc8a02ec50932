//! Transient "LIVE" indicator shown after a jump to the live edge.
//!
//! The hide timer is a single cancellable slot: showing the indicator again
//! while a timer is pending replaces that timer, so the indicator always hides
//! `duration_ms` after the most recent jump.

/// Handle for the pending hide timer.
///
/// Hosts that schedule real timers pass `token` back through
/// [`LiveIndicator::on_timer`]; a superseded token is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorTimer {
    pub token: u64,
    pub hide_at_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LiveIndicator {
    duration_ms: u64,
    visible: bool,
    pending: Option<IndicatorTimer>,
    next_token: u64,
}

impl LiveIndicator {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            visible: false,
            pending: None,
            next_token: 0,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Applies to the next `show`; a pending timer keeps its deadline.
    pub fn set_duration_ms(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pending_timer(&self) -> Option<IndicatorTimer> {
        self.pending
    }

    /// Show the indicator and (re)arm the hide timer.
    pub fn show(&mut self, now_ms: u64) -> IndicatorTimer {
        self.next_token += 1;
        let timer = IndicatorTimer {
            token: self.next_token,
            hide_at_ms: now_ms.saturating_add(self.duration_ms),
        };
        if let Some(previous) = self.pending.replace(timer) {
            tracing::debug!(
                previous_hide_at_ms = previous.hide_at_ms,
                hide_at_ms = timer.hide_at_ms,
                "live indicator timer reset"
            );
        }
        self.visible = true;
        timer
    }

    /// Timer callback. Hides the indicator if `token` is still current.
    pub fn on_timer(&mut self, token: u64) -> bool {
        match self.pending {
            Some(timer) if timer.token == token => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    /// Hide the indicator if the pending deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.pending {
            Some(timer) if now_ms >= timer.hide_at_ms => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    /// Hide immediately and drop any pending timer.
    pub fn cancel(&mut self) {
        self.hide();
    }

    fn hide(&mut self) {
        self.visible = false;
        self.pending = None;
    }
}
