use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};
use crate::transaction::{LatestValue, Transaction};

/// Suppresses consecutive duplicate values: a settled value equal to the
/// cached one cancels the transaction instead.
pub(crate) struct OnChangeNode<V: Clone + PartialEq + 'static> {
    weak: Weak<OnChangeNode<V>>,
    parent: Signal<V>,
    cached: RefCell<Option<V>>,
    broadcast: Broadcast<V>,
    upstream: RefCell<Option<Receiver<V>>>,
}

impl<V: Clone + PartialEq + 'static> OnChangeNode<V> {
    pub(crate) fn new(parent: &Signal<V>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            cached: RefCell::new(None),
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }

    fn apply(&self, transaction: &Transaction<V>) {
        match transaction {
            Transaction::Begin => self.push_transaction(&Transaction::Begin),
            Transaction::End(value) => {
                let duplicate = self.cached.borrow().as_ref() == Some(value);
                if duplicate {
                    self.push_transaction(&Transaction::Cancel);
                } else {
                    *self.cached.borrow_mut() = Some(value.clone());
                    self.push_transaction(&Transaction::End(value.clone()));
                }
            }
            Transaction::Cancel => self.push_transaction(&Transaction::Cancel),
        }
    }
}

impl<V: Clone + PartialEq + 'static> SignalNode<V> for OnChangeNode<V> {
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
