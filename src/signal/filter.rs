use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};
use crate::transaction::Transaction;

/// Admits values matching a predicate; rejections cancel the transaction.
///
/// Deliberately does not report a latest value: a filter has no value until
/// it has actually admitted one, so callers wanting a cached value compose
/// with `latest()`.
pub(crate) struct FilterNode<V: Clone + 'static> {
    weak: Weak<FilterNode<V>>,
    parent: Signal<V>,
    predicate: Rc<dyn Fn(&V) -> bool>,
    broadcast: Broadcast<V>,
    upstream: RefCell<Option<Receiver<V>>>,
}

impl<V: Clone + 'static> FilterNode<V> {
    pub(crate) fn new(parent: &Signal<V>, predicate: Rc<dyn Fn(&V) -> bool>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            predicate,
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }

    fn apply(&self, transaction: &Transaction<V>) {
        match transaction {
            Transaction::Begin => self.push_transaction(&Transaction::Begin),
            Transaction::End(value) => {
                if (self.predicate)(value) {
                    self.push_transaction(&Transaction::End(value.clone()));
                } else {
                    self.push_transaction(&Transaction::Cancel);
                }
            }
            Transaction::Cancel => self.push_transaction(&Transaction::Cancel),
        }
    }
}

impl<V: Clone + 'static> SignalNode<V> for FilterNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

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
