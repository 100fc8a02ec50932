//! Time-windowed history of recently consumed media segments.
//!
//! The buffer is never read for playback. It bounds how much recent history is
//! still considered available behind the playhead, and is discarded wholesale
//! when the player jumps to the live edge.
//!
//! ## Design
//! - **Age-bounded, not size-bounded**: there is no record cap, only a maximum
//!   age measured in playback time.
//! - **FIFO**: records are appended in capture order while playing forward, so
//!   the oldest record is always at the front and eviction only pops from there.

use std::collections::VecDeque;

/// One consumed segment, tagged with the playback position it was captured at.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentRecord<P> {
    /// Playback position in seconds at capture time.
    pub captured_at: f64,
    /// Opaque reference to the media bytes.
    pub payload: P,
}

#[derive(Clone, Debug)]
pub struct RollingSegmentBuffer<P> {
    records: VecDeque<SegmentRecord<P>>,
    retention_window_ms: u64,
}

impl<P> RollingSegmentBuffer<P> {
    pub fn new(retention_window_ms: u64) -> Self {
        Self {
            records: VecDeque::new(),
            retention_window_ms,
        }
    }

    pub fn retention_window_ms(&self) -> u64 {
        self.retention_window_ms
    }

    /// Change the window and re-apply it against the newest retained record.
    ///
    /// Returns the number of records evicted by the narrower window.
    pub fn set_retention_window_ms(&mut self, retention_window_ms: u64) -> usize {
        self.retention_window_ms = retention_window_ms;
        match self.newest_position() {
            Some(newest) => self.evict_expired(newest),
            None => 0,
        }
    }

    /// Capture a segment on a time-update tick, then evict expired history.
    ///
    /// Ticks received while the session is paused, or carrying a non-finite
    /// position, are ignored. Returns the number of records evicted.
    pub fn record_tick(&mut self, paused: bool, position: f64, payload: P) -> usize {
        if paused {
            return 0;
        }
        if !position.is_finite() {
            tracing::debug!(position, "tick without a finite position ignored");
            return 0;
        }
        self.records.push_back(SegmentRecord {
            captured_at: position,
            payload,
        });
        self.evict_expired(position)
    }

    /// Drop records older than the retention window relative to `position`.
    ///
    /// Idempotent for a given `position`. A non-finite `position` evicts
    /// nothing. Returns the number of records removed.
    pub fn evict_expired(&mut self, position: f64) -> usize {
        if !position.is_finite() {
            return 0;
        }
        let window = self.retention_window_ms as f64;
        let mut evicted = 0;
        while let Some(oldest) = self.records.front() {
            if (position - oldest.captured_at) * 1000.0 <= window {
                break;
            }
            self.records.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            tracing::debug!(
                evicted,
                retained = self.records.len(),
                position,
                "segment history evicted"
            );
        }
        evicted
    }

    /// Discard all history. Returns the number of records dropped.
    pub fn flush(&mut self) -> usize {
        let flushed = self.records.len();
        self.records.clear();
        flushed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn oldest_position(&self) -> Option<f64> {
        self.records.front().map(|r| r.captured_at)
    }

    pub fn newest_position(&self) -> Option<f64> {
        self.records.back().map(|r| r.captured_at)
    }

    /// Span of retained history in milliseconds.
    pub fn history_ms(&self) -> u64 {
        match (self.oldest_position(), self.newest_position()) {
            (Some(oldest), Some(newest)) if newest > oldest => {
                ((newest - oldest) * 1000.0).round() as u64
            }
            _ => 0,
        }
    }

    /// Retained records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentRecord<P>> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(window_ms: u64, positions: impl IntoIterator<Item = u32>) -> RollingSegmentBuffer<u32> {
        let mut buffer = RollingSegmentBuffer::new(window_ms);
        for pos in positions {
            buffer.record_tick(false, pos as f64, pos);
        }
        buffer
    }

    #[test]
    fn paused_ticks_are_ignored() {
        let mut buffer = RollingSegmentBuffer::new(10_000);
        buffer.record_tick(true, 1.0, "a");
        assert!(buffer.is_empty());
        buffer.record_tick(false, 2.0, "b");
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn half_hour_window_keeps_last_thirty_minutes() {
        let mut buffer = RollingSegmentBuffer::new(1_800_000);
        for pos in (0..=3600).step_by(10) {
            buffer.records.push_back(SegmentRecord {
                captured_at: pos as f64,
                payload: pos,
            });
        }

        buffer.evict_expired(3600.0);

        assert_eq!(buffer.oldest_position(), Some(1800.0));
        assert_eq!(buffer.newest_position(), Some(3600.0));
        assert!(buffer.iter().all(|r| r.captured_at >= 1800.0));
        assert_eq!(buffer.len(), 181);
    }

    #[test]
    fn record_tick_maintains_window_invariant() {
        let buffer = filled(30_000, (0..=120).step_by(5));
        let newest = buffer.newest_position().unwrap();
        assert!(buffer
            .iter()
            .all(|r| (newest - r.captured_at) * 1000.0 <= 30_000.0));
        assert_eq!(buffer.oldest_position(), Some(90.0));
    }

    #[test]
    fn evict_expired_is_idempotent() {
        let mut buffer = filled(60_000, (0..100).step_by(10));
        let first = buffer.evict_expired(150.0);
        let len = buffer.len();
        let second = buffer.evict_expired(150.0);
        assert!(first > 0);
        assert_eq!(second, 0);
        assert_eq!(buffer.len(), len);
    }

    #[test]
    fn flush_then_tick_leaves_single_record() {
        let mut buffer = filled(60_000, (0..50).step_by(5));
        assert_eq!(buffer.flush(), 10);
        buffer.record_tick(false, 55.0, 55);
        buffer.evict_expired(55.0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.oldest_position(), Some(55.0));
    }

    #[test]
    fn non_finite_tick_keeps_history() {
        let mut buffer = filled(60_000, 0..30);
        assert_eq!(buffer.record_tick(false, f64::NAN, 99), 0);
        assert_eq!(buffer.record_tick(false, f64::INFINITY, 99), 0);
        assert_eq!(buffer.evict_expired(f64::NAN), 0);
        assert_eq!(buffer.len(), 30);
        assert_eq!(buffer.newest_position(), Some(29.0));
    }

    #[test]
    fn eviction_ignores_record_count() {
        let buffer = filled(1_000_000, 0..10_000);
        assert_eq!(buffer.len(), 1001);
    }

    #[test]
    fn narrowing_window_evicts_against_newest() {
        let mut buffer = filled(600_000, (0..=300).step_by(30));
        assert_eq!(buffer.len(), 11);
        let evicted = buffer.set_retention_window_ms(60_000);
        assert_eq!(evicted, 8);
        assert_eq!(buffer.oldest_position(), Some(240.0));
        assert_eq!(buffer.history_ms(), 60_000);
    }
}
