//! Scripted stand-in for a browser media element.
//!
//! Commands mutate local playback state and publish the events a real media
//! element would fire, so the controller sees them through its subscription.

use live_resync::{HostCommandError, MediaSession, MediaSource, SessionEvent, SessionEvents};

pub struct SimulatedSession {
    events: SessionEvents<String>,
    paused: bool,
    seeking: bool,
    position: f64,
    duration: f64,
    live: bool,
    live_edge: Option<f64>,
    fail_next_seek: bool,
    seeks: Vec<f64>,
}

impl SimulatedSession {
    pub fn new(events: SessionEvents<String>, duration: f64, live_edge: Option<f64>) -> Self {
        Self {
            events,
            paused: true,
            seeking: false,
            position: 0.0,
            duration,
            live: false,
            live_edge,
            fail_next_seek: false,
            seeks: Vec::new(),
        }
    }

    /// Pause fired while a seek is still in progress.
    pub fn seek_pause(&mut self) {
        self.seeking = true;
        self.paused = true;
        self.events.publish(SessionEvent::Pause {
            seeking: self.seeking,
        });
    }

    pub fn finish_seek(&mut self) {
        self.seeking = false;
    }

    pub fn tick(&mut self, position: f64, segment: String) {
        if !self.paused {
            self.position = position;
        }
        self.events.publish(SessionEvent::TimeUpdate {
            position,
            payload: segment,
            paused: self.paused,
        });
    }

    pub fn set_live_edge(&mut self, position: Option<f64>) {
        self.live_edge = position;
    }

    pub fn fail_next_seek(&mut self) {
        self.fail_next_seek = true;
    }

    pub fn end(&mut self) {
        self.paused = true;
        self.events.publish(SessionEvent::Ended);
    }

    pub fn error(&mut self, message: String) {
        self.events.publish(SessionEvent::Error { message });
    }

    /// Seek targets the controller has issued, in order.
    pub fn seeks(&self) -> &[f64] {
        &self.seeks
    }
}

impl MediaSession for SimulatedSession {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_seeking(&self) -> bool {
        self.seeking
    }

    fn current_position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_live_source(&self) -> bool {
        self.live
    }

    fn live_edge_position(&self) -> Option<f64> {
        self.live_edge
    }

    fn seek_to(&mut self, position: f64) -> Result<(), HostCommandError> {
        if std::mem::take(&mut self.fail_next_seek) {
            return Err(HostCommandError::rejected("seek", "scripted seek failure"));
        }
        self.seeks.push(position);
        self.position = position;
        Ok(())
    }

    fn play(&mut self) -> Result<(), HostCommandError> {
        self.paused = false;
        self.events.publish(SessionEvent::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), HostCommandError> {
        self.paused = true;
        self.events.publish(SessionEvent::Pause {
            seeking: self.seeking,
        });
        Ok(())
    }

    fn load_source(&mut self, source: &MediaSource) -> Result<(), HostCommandError> {
        self.live = source.is_live();
        self.position = 0.0;
        self.seeking = false;
        if !self.live {
            self.live_edge = None;
        }
        Ok(())
    }
}
