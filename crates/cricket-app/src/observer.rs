use cricket_core::game::{GameView, Message};

/// What a session publishes to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Sanitized state after a committed transition.
    State(GameView),
    /// The whole message log after it changed.
    Messages(Vec<Message>),
}

/// Read-only listener for session changes.
pub trait SessionObserver {
    fn notify(&mut self, event: &SessionEvent);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionEvent),
{
    fn notify(&mut self, event: &SessionEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Subscribers in registration order.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Box<dyn SessionObserver>)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn publish(&mut self, event: &SessionEvent) {
        for (_, observer) in &mut self.observers {
            observer.notify(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn closures_receive_events_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(0usize));
        let mut registry = ObserverRegistry::new();
        let counter = Rc::clone(&seen);
        let id = registry.subscribe(Box::new(move |_: &SessionEvent| {
            *counter.borrow_mut() += 1;
        }));

        registry.publish(&SessionEvent::Messages(Vec::new()));
        assert_eq!(*seen.borrow(), 1);

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.publish(&SessionEvent::Messages(Vec::new()));
        assert_eq!(*seen.borrow(), 1);
        assert!(registry.is_empty());
    }
}
