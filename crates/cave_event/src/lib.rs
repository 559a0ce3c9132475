//! # cave_event - Synchronous Event System
//!
//! In-process publish/subscribe used to decouple sound emitters from the
//! listeners that react to them:
//! - Typed events, dispatched to every current subscriber before `publish` returns
//! - Priority-ordered delivery (ties keep subscription order)
//! - Explicit subscription handles, so listeners control their own lifetime
//! - `EventChannel` mailboxes for signals that are drained once per frame

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

/// Event priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Trait for events
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// Dynamic event handler
pub type DynamicHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

struct Subscriber {
    id: SubscriberId,
    priority: Priority,
    handler: DynamicHandler,
}

/// Event bus for publishing and subscribing to events.
///
/// Delivery is synchronous: `publish` runs every matching handler on the
/// caller's thread and returns afterwards. Handlers must not subscribe or
/// unsubscribe from inside a dispatch.
pub struct EventBus {
    /// Typed handlers
    handlers: RwLock<BTreeMap<TypeId, Vec<Subscriber>>>,
    /// Next subscriber ID
    next_subscriber_id: AtomicU64,
    /// Number of events published so far
    published: AtomicU64,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(BTreeMap::new()),
            next_subscriber_id: AtomicU64::new(1),
            published: AtomicU64::new(0),
        }
    }

    /// Publish an event, returning how many handlers received it
    pub fn publish<E: Event>(&self, event: &E) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);

        let handlers = self.handlers.read();
        match handlers.get(&TypeId::of::<E>()) {
            Some(subscribers) => {
                for subscriber in subscribers {
                    (subscriber.handler)(event);
                }
                subscribers.len()
            }
            None => 0,
        }
    }

    /// Subscribe to an event type
    pub fn subscribe<E: Event, F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority::<E, F>(handler, Priority::Normal)
    }

    /// Subscribe with priority
    pub fn subscribe_with_priority<E: Event, F>(&self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id.fetch_add(1, Ordering::Relaxed));

        let wrapped_handler: DynamicHandler = Box::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                handler(event);
            }
        });

        let mut handlers = self.handlers.write();
        let subscribers = handlers.entry(TypeId::of::<E>()).or_default();
        subscribers.push(Subscriber {
            id,
            priority,
            handler: wrapped_handler,
        });

        // Stable sort keeps subscription order among equal priorities
        subscribers.sort_by(|a, b| b.priority.cmp(&a.priority));

        log::trace!("Subscriber {:?} registered for {}", id, std::any::type_name::<E>());
        id
    }

    /// Unsubscribe. Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut handlers = self.handlers.write();
        let mut removed = false;
        for subscribers in handlers.values_mut() {
            let before = subscribers.len();
            subscribers.retain(|s| s.id != id);
            removed |= subscribers.len() != before;
        }
        handlers.retain(|_, subscribers| !subscribers.is_empty());

        if removed {
            log::trace!("Subscriber {:?} removed", id);
        }
        removed
    }

    /// Check whether a subscription is still live
    pub fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.handlers
            .read()
            .values()
            .any(|subscribers| subscribers.iter().any(|s| s.id == id))
    }

    /// Number of handlers listening for `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers
            .read()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Total number of events published on this bus
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        f.debug_struct("EventBus")
            .field("event_types", &handlers.len())
            .field("subscribers", &handlers.values().map(Vec::len).sum::<usize>())
            .field("published", &self.published_count())
            .finish()
    }
}

/// Channel for single-type events
pub struct EventChannel<E: Event> {
    queue: Mutex<VecDeque<E>>,
}

impl<E: Event> EventChannel<E> {
    /// Create a new channel
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Send an event
    pub fn send(&self, event: E) {
        self.queue.lock().push_back(event);
    }

    /// Receive the oldest event
    pub fn receive(&self) -> Option<E> {
        self.queue.lock().pop_front()
    }

    /// Drain all events in send order
    pub fn drain(&self) -> Vec<E> {
        self.queue.lock().drain(..).collect()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Get pending count
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> std::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel").field("pending", &self.len()).finish()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventBus, EventChannel, Priority, SubscriberId};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    struct TestEvent(i32);
    struct OtherEvent;

    #[test]
    fn test_publish_is_synchronous() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        bus.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let reached = bus.publish(&TestEvent(42));

        // Delivered before publish returned, no processing step needed
        assert_eq!(reached, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_events_are_routed_by_type() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        bus.subscribe(move |e: &TestEvent| {
            counter_clone.fetch_add(e.0 as u32, Ordering::SeqCst);
        });

        assert_eq!(bus.publish(&OtherEvent), 0);
        bus.publish(&TestEvent(3));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(bus.published_count(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = bus.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert!(bus.is_subscribed(id));
        assert_eq!(bus.subscriber_count::<TestEvent>(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(!bus.is_subscribed(id));
        assert_eq!(bus.subscriber_count::<TestEvent>(), 0);

        bus.publish(&TestEvent(1));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_priority() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let order1 = order.clone();
        let order2 = order.clone();
        let order3 = order.clone();

        bus.subscribe_with_priority(
            move |e: &TestEvent| {
                order1.lock().push(("low", e.0));
            },
            Priority::Low,
        );

        bus.subscribe_with_priority(
            move |e: &TestEvent| {
                order2.lock().push(("high", e.0));
            },
            Priority::High,
        );

        bus.subscribe(move |e: &TestEvent| {
            order3.lock().push(("normal", e.0));
        });

        bus.publish(&TestEvent(42));

        let received = order.lock();
        assert_eq!(received[0].0, "high");
        assert_eq!(received[1].0, "normal");
        assert_eq!(received[2].0, "low");
    }

    #[test]
    fn test_event_channel() {
        let channel: EventChannel<TestEvent> = EventChannel::new();

        channel.send(TestEvent(1));
        channel.send(TestEvent(2));
        channel.send(TestEvent(3));
        assert_eq!(channel.len(), 3);

        assert_eq!(channel.receive().map(|e| e.0), Some(1));

        let events = channel.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, 2);
        assert_eq!(events[1].0, 3);
        assert!(channel.is_empty());
    }
}
