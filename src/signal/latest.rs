use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};
use crate::transaction::{LatestValue, Transaction};

/// Caches the most recent settled value while forwarding every transaction
/// unchanged. The cache is seeded by pulling the parent at construction, so
/// a wrapped map chain is queryable before anything has flowed.
pub(crate) struct LatestNode<V: Clone + 'static> {
    weak: Weak<LatestNode<V>>,
    parent: Signal<V>,
    cached: RefCell<Option<V>>,
    broadcast: Broadcast<V>,
    upstream: RefCell<Option<Receiver<V>>>,
}

impl<V: Clone + 'static> LatestNode<V> {
    pub(crate) fn new(parent: &Signal<V>) -> Rc<Self> {
        let seed = parent.latest_value().get();
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            cached: RefCell::new(seed),
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }

    fn apply(&self, transaction: &Transaction<V>) {
        if let Transaction::End(value) = transaction {
            *self.cached.borrow_mut() = Some(value.clone());
        }
        self.push_transaction(transaction);
    }
}

impl<V: Clone + 'static> SignalNode<V> for LatestNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<V> {
        match self.cached.borrow().as_ref() {
            Some(value) => LatestValue::Stored(value.clone()),
            None => LatestValue::None,
        }
    }

    fn wire(&self) {
        let weak = self.weak.clone();
        let receiver = Receiver::new(&self.parent, move |transaction| {
            if let Some(node) = weak.upgrade() {
                node.apply(transaction);
            }
        });
        *self.upstream.borrow_mut() = Some(receiver);
    }
}
