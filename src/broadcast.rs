use std::cell::Cell;
use std::rc::Rc;

use crate::keyed_set::KeyedSet;
use crate::transaction::Transaction;

/// An observer callback registered on a signal node.
pub type ObserverFn<V> = Rc<dyn Fn(&Transaction<V>)>;

/// A node's observer set plus the lifecycle flags of the deferred-wiring
/// protocol.
///
/// `send` snapshots the callback list before invoking, so observers may
/// register or deregister from inside a callback without corrupting the
/// iteration. While `muted`, sends are dropped; nodes mute themselves while
/// wiring to their parents when the registration primers cascading down the
/// chain would duplicate a primer already delivered from the node's own
/// latest value.
pub struct Broadcast<V> {
    observers: KeyedSet<ObserverFn<V>>,
    muted: Cell<bool>,
    wired: Cell<bool>,
}

impl<V> Broadcast<V> {
    pub fn new() -> Self { Self { observers: KeyedSet::new(), muted: Cell::new(false), wired: Cell::new(false) } }

    pub fn add(&self, observer: ObserverFn<V>) -> u64 { self.observers.add(observer) }

    pub fn remove(&self, key: u64) { self.observers.remove(key); }

    /// Synchronously invoke every currently-registered observer.
    pub fn send(&self, transaction: &Transaction<V>) {
        if self.muted.get() {
            return;
        }
        for observer in self.observers.snapshot() {
            observer(transaction);
        }
    }

    pub fn len(&self) -> usize { self.observers.len() }

    pub fn is_empty(&self) -> bool { self.observers.is_empty() }

    pub(crate) fn is_muted(&self) -> bool { self.muted.get() }

    pub(crate) fn set_muted(&self, muted: bool) { self.muted.set(muted); }

    /// Flip the wired flag, returning true on the first call only.
    pub(crate) fn mark_wired(&self) -> bool { !self.wired.replace(true) }
}

impl<V> Default for Broadcast<V> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_send_reaches_all_observers() {
        let broadcast: Broadcast<i32> = Broadcast::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        broadcast.add(Rc::new(move |t: &Transaction<i32>| {
            if let Transaction::End(v) = t {
                sink.borrow_mut().push(*v + 1);
            }
        }));
        let sink = seen.clone();
        broadcast.add(Rc::new(move |t: &Transaction<i32>| {
            if let Transaction::End(v) = t {
                sink.borrow_mut().push(*v + 10);
            }
        }));

        broadcast.send(&Transaction::End(0));
        assert_eq!(*seen.borrow(), vec![1, 10]);
    }

    #[test]
    fn test_removed_observer_misses_next_send() {
        let broadcast: Broadcast<i32> = Broadcast::new();
        let count = Rc::new(Cell::new(0));

        let counter = count.clone();
        let key = broadcast.add(Rc::new(move |_| counter.set(counter.get() + 1)));

        broadcast.send(&Transaction::Begin);
        broadcast.remove(key);
        broadcast.send(&Transaction::Begin);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_observer_may_register_during_send() {
        let broadcast: Rc<Broadcast<i32>> = Rc::new(Broadcast::new());
        let count = Rc::new(Cell::new(0));

        let inner = broadcast.clone();
        let counter = count.clone();
        broadcast.add(Rc::new(move |_| {
            counter.set(counter.get() + 1);
            // Registering mid-send must not disturb the snapshot in flight.
            let c = counter.clone();
            inner.add(Rc::new(move |_| c.set(c.get() + 100)));
        }));

        broadcast.send(&Transaction::Begin);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_muted_drops_sends() {
        let broadcast: Broadcast<i32> = Broadcast::new();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        broadcast.add(Rc::new(move |_| counter.set(counter.get() + 1)));

        broadcast.set_muted(true);
        broadcast.send(&Transaction::Begin);
        broadcast.set_muted(false);
        broadcast.send(&Transaction::Begin);
        assert_eq!(count.get(), 1);
    }
}
