use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};

/// Forwards every transaction from every parent, unchanged and uncoalesced:
/// simultaneous events from multiple parents produce multiple downstream
/// transactions in subscription order.
pub(crate) struct UnionNode<V: Clone + 'static> {
    weak: Weak<UnionNode<V>>,
    parents: Vec<Signal<V>>,
    broadcast: Broadcast<V>,
    upstreams: RefCell<Vec<Receiver<V>>>,
}

impl<V: Clone + 'static> UnionNode<V> {
    pub(crate) fn new(parents: Vec<Signal<V>>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parents,
            broadcast: Broadcast::new(),
            upstreams: RefCell::new(Vec::new()),
        })
    }
}

impl<V: Clone + 'static> SignalNode<V> for UnionNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn wire(&self) {
        let mut upstreams = Vec::with_capacity(self.parents.len());
        for parent in &self.parents {
            let weak = self.weak.clone();
            upstreams.push(Receiver::new(parent, move |transaction| {
                if let Some(node) = weak.upgrade() {
                    node.push_transaction(transaction);
                }
            }));
        }
        *self.upstreams.borrow_mut() = upstreams;
    }
}

/// Merge any number of homogeneous signals into one.
pub fn union<V: Clone + 'static>(signals: &[Signal<V>]) -> Signal<V> {
    Signal::from_node(UnionNode::new(signals.to_vec()))
}
