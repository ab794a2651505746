use std::collections::HashMap;

use super::{Event, EventKind};

type Callback = Box<dyn FnMut(&Event)>;

/// Queue-then-flush event bus.
///
/// Events raised during a frame are queued with [`push`](Self::push) and held
/// until [`dispatch`](Self::dispatch) delivers them, in raise order, to every
/// subscriber registered for the matching [`EventKind`]. Events pushed from
/// inside a callback land in the queue for the next dispatch.
#[derive(Default)]
pub struct EventDispatcher {
    queue: Vec<Event>,
    callbacks: HashMap<EventKind, Vec<Callback>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event for the next dispatch.
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Number of queued, not-yet-dispatched events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Registers an additional callback for one event kind.
    ///
    /// Callbacks for a kind run in registration order.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.callbacks
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    /// Replaces all callbacks for one event kind with a single callback.
    pub fn set_callback<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&Event) + 'static,
    {
        let slot = self.callbacks.entry(kind).or_default();
        slot.clear();
        slot.push(Box::new(callback));
    }

    /// Removes every callback registered for one event kind.
    pub fn remove_callbacks(&mut self, kind: EventKind) {
        self.callbacks.remove(&kind);
    }

    /// Removes every callback for every event kind.
    pub fn clear_callbacks(&mut self) {
        self.callbacks.clear();
    }

    /// Delivers all queued events to their subscribers, then clears the queue.
    pub fn dispatch(&mut self) {
        self.dispatch_with(|_| {});
    }

    /// Like [`dispatch`](Self::dispatch), additionally invoking `sink` for
    /// every delivered event after its subscribers have run.
    pub fn dispatch_with<F>(&mut self, mut sink: F)
    where
        F: FnMut(&Event),
    {
        let events = std::mem::take(&mut self.queue);

        for event in &events {
            if let Some(callbacks) = self.callbacks.get_mut(&event.kind()) {
                for callback in callbacks.iter_mut() {
                    callback(event);
                }
            }
            sink(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn resize(width: u32, height: u32) -> Event {
        Event::WindowResize { width, height }
    }

    // ── queue / flush ─────────────────────────────────────────────────────

    #[test]
    fn dispatch_delivers_queued_events_once_then_clears() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(EventKind::WindowResize, move |e| {
            sink.borrow_mut().push(e.clone());
        });

        dispatcher.push(resize(800, 600));
        dispatcher.push(resize(1920, 1080));
        assert_eq!(dispatcher.pending(), 2);

        dispatcher.dispatch();
        assert_eq!(dispatcher.pending(), 0);
        assert_eq!(*seen.borrow(), vec![resize(800, 600), resize(1920, 1080)]);

        // Second dispatch has nothing left to deliver.
        dispatcher.dispatch();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn events_only_reach_matching_kind() {
        let hits = Rc::new(RefCell::new(0));
        let sink = hits.clone();

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(EventKind::WindowClose, move |_| {
            *sink.borrow_mut() += 1;
        });

        dispatcher.push(resize(100, 100));
        dispatcher.push(Event::WindowClose);
        dispatcher.dispatch();

        assert_eq!(*hits.borrow(), 1);
    }

    // ── subscriber management ─────────────────────────────────────────────

    #[test]
    fn set_callback_replaces_existing_subscribers() {
        let hits = Rc::new(RefCell::new(Vec::new()));

        let mut dispatcher = EventDispatcher::new();
        let a = hits.clone();
        dispatcher.subscribe(EventKind::WindowClose, move |_| a.borrow_mut().push("a"));
        let b = hits.clone();
        dispatcher.set_callback(EventKind::WindowClose, move |_| b.borrow_mut().push("b"));

        dispatcher.push(Event::WindowClose);
        dispatcher.dispatch();

        assert_eq!(*hits.borrow(), vec!["b"]);
    }

    #[test]
    fn remove_callbacks_silences_a_kind() {
        let hits = Rc::new(RefCell::new(0));
        let sink = hits.clone();

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(EventKind::MouseEnter, move |_| *sink.borrow_mut() += 1);
        dispatcher.remove_callbacks(EventKind::MouseEnter);

        dispatcher.push(Event::MouseEnter);
        dispatcher.dispatch();

        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn dispatch_with_sink_sees_every_event() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.push(Event::MouseEnter);
        dispatcher.push(Event::MouseLeave);

        let mut kinds = Vec::new();
        dispatcher.dispatch_with(|e| kinds.push(e.kind()));

        assert_eq!(kinds, vec![EventKind::MouseEnter, EventKind::MouseLeave]);
    }
}
