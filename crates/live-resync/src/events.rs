//! Typed host event subscription.
//!
//! Replaces ad-hoc `onpause`/`onplay` callback slots with a subscription that
//! has an explicit lifetime: subscribe when a session starts, drop the
//! [`Subscription`] when it ends. Events published while a handler runs are
//! queued and picked up by the next drain instead of re-entering the handler.

use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{Receiver, Sender};

/// Raw lifecycle events forwarded from the host media element.
///
/// Host state that a handler depends on is captured when the event fires, so
/// a queued event is judged by the state it was published under.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent<P> {
    /// `seeking` is the host's seeking flag at the moment of the pause.
    Pause { seeking: bool },
    Play,
    /// Periodic playback progress, carrying the segment consumed at `position`.
    TimeUpdate {
        position: f64,
        payload: P,
        paused: bool,
    },
    Ended,
    Error { message: String },
}

struct Registry<P> {
    next_id: u64,
    subscribers: Vec<(u64, Sender<SessionEvent<P>>)>,
}

/// Fan-out point for host events.
pub struct SessionEvents<P> {
    registry: Arc<Mutex<Registry<P>>>,
}

impl<P> Clone for SessionEvents<P> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<P> Default for SessionEvents<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SessionEvents<P> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register a new subscriber. Events published before this call are not delivered.
    pub fn subscribe(&self) -> Subscription<P> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push((id, tx));
        Subscription {
            id,
            rx,
            registry: self.registry.clone(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }
}

impl<P: Clone> SessionEvents<P> {
    /// Deliver `event` to every subscriber; returns how many received it.
    pub fn publish(&self, event: SessionEvent<P>) -> usize {
        let mut registry = lock(&self.registry);
        registry
            .subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
        registry.subscribers.len()
    }
}

/// Receiving end of a [`SessionEvents`] subscription; unsubscribes on drop.
pub struct Subscription<P> {
    id: u64,
    rx: Receiver<SessionEvent<P>>,
    registry: Arc<Mutex<Registry<P>>>,
}

impl<P> Subscription<P> {
    /// Next queued event without blocking.
    pub fn try_next(&self) -> Option<SessionEvent<P>> {
        self.rx.try_recv().ok()
    }

    /// Number of events waiting to be handled.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl<P> Drop for Subscription<P> {
    fn drop(&mut self) {
        let id = self.id;
        lock(&self.registry)
            .subscribers
            .retain(|(sub_id, _)| *sub_id != id);
    }
}

fn lock<P>(registry: &Mutex<Registry<P>>) -> MutexGuard<'_, Registry<P>> {
    registry.lock().unwrap_or_else(|err| err.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reaches_every_subscriber_in_order() {
        let events = SessionEvents::<u32>::new();
        let a = events.subscribe();
        let b = events.subscribe();

        assert_eq!(events.publish(SessionEvent::Pause { seeking: false }), 2);
        assert_eq!(
            events.publish(SessionEvent::TimeUpdate {
                position: 1.5,
                payload: 7,
                paused: false,
            }),
            2
        );

        assert_eq!(a.try_next(), Some(SessionEvent::Pause { seeking: false }));
        assert_eq!(
            a.try_next(),
            Some(SessionEvent::TimeUpdate {
                position: 1.5,
                payload: 7,
                paused: false,
            })
        );
        assert_eq!(a.try_next(), None);
        assert_eq!(b.pending(), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let events = SessionEvents::<()>::new();
        let first = events.subscribe();
        {
            let _second = events.subscribe();
            assert_eq!(events.subscriber_count(), 2);
        }
        assert_eq!(events.subscriber_count(), 1);
        drop(first);
        assert_eq!(events.subscriber_count(), 0);
        assert_eq!(events.publish(SessionEvent::Play), 0);
    }

    #[test]
    fn subscribe_after_publish_misses_earlier_events() {
        let events = SessionEvents::<()>::new();
        events.publish(SessionEvent::Ended);
        let sub = events.subscribe();
        assert_eq!(sub.try_next(), None);
    }
}
