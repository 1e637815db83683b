use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Events emitted by the bridge to the web-layer shell.
///
/// Participants carry a display name only; the bridge keeps no durable
/// participant registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Initialized { status: bool },
    Connected,
    Disconnected { reason: String },
    Failed { reason: String },
    ParticipantJoined { name: String },
    ParticipantLeft { name: String },
}

/// Trait for receiving bridge events.
/// Implementations must be Send + Sync (called from tokio tasks).
pub trait BridgeEventListener: Send + Sync {
    fn on_event(&self, event: BridgeEvent);
}

/// Handle returned by [`EventEmitter::add_listener`]; revokes one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Internal event emitter that dispatches to registered listeners.
///
/// Listeners are non-owning observers: a registration can be revoked at any
/// time and the emitter never outlives-couples to its listeners.
#[derive(Clone)]
pub struct EventEmitter {
    listeners: Arc<std::sync::RwLock<Vec<(ListenerId, Arc<dyn BridgeEventListener>)>>>,
    next_id: Arc<AtomicU64>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(std::sync::RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn BridgeEventListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().unwrap().push((id, listener));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.listeners.write().unwrap().retain(|(lid, _)| *lid != id);
    }

    pub fn emit(&self, event: BridgeEvent) {
        let listeners = self.listeners.read().unwrap();
        for (_, listener) in listeners.iter() {
            listener.on_event(event.clone());
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingListener {
        count: Arc<AtomicUsize>,
    }

    impl BridgeEventListener for CountingListener {
        fn on_event(&self, _event: BridgeEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn emitter_dispatches_to_listener() {
        let emitter = EventEmitter::new();
        let count = Arc::new(AtomicUsize::new(0));
        emitter.add_listener(Arc::new(CountingListener { count: count.clone() }));

        emitter.emit(BridgeEvent::Connected);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn emitter_dispatches_to_multiple_listeners() {
        let emitter = EventEmitter::new();
        let count1 = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::new(AtomicUsize::new(0));

        emitter.add_listener(Arc::new(CountingListener { count: count1.clone() }));
        emitter.add_listener(Arc::new(CountingListener { count: count2.clone() }));

        emitter.emit(BridgeEvent::Connected);

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_listener_no_longer_receives() {
        let emitter = EventEmitter::new();
        let count = Arc::new(AtomicUsize::new(0));
        let id = emitter.add_listener(Arc::new(CountingListener { count: count.clone() }));

        emitter.emit(BridgeEvent::Connected);
        emitter.remove_listener(id);
        emitter.emit(BridgeEvent::Connected);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    struct EventCapture {
        events: Arc<std::sync::Mutex<Vec<BridgeEvent>>>,
    }

    impl BridgeEventListener for EventCapture {
        fn on_event(&self, event: BridgeEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn emitter_delivers_correct_events() {
        let emitter = EventEmitter::new();
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        emitter.add_listener(Arc::new(EventCapture { events: events.clone() }));

        emitter.emit(BridgeEvent::ParticipantLeft { name: "Bob".to_string() });

        let captured = events.lock().unwrap();
        assert_eq!(
            captured.as_slice(),
            &[BridgeEvent::ParticipantLeft { name: "Bob".to_string() }]
        );
    }
}
