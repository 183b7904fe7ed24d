use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};
use crate::transaction::Transaction;

/// Defers the source's settled value until a boolean guard is true.
///
/// Holds at most one pending value. The pending value survives settles while
/// the guard is closed, but a fresh `Begin` from the source drops it (a
/// newer change supersedes the deferred one). Release happens when a
/// transaction group settles with a pending value and an open guard.
pub(crate) struct GateNode<V: Clone + 'static> {
    weak: Weak<GateNode<V>>,
    source: Signal<V>,
    gate: Signal<bool>,
    deferred: RefCell<Option<V>>,
    count: Cell<u32>,
    broadcast: Broadcast<V>,
    upstreams: RefCell<Option<(Receiver<V>, Receiver<bool>)>>,
}

impl<V: Clone + 'static> GateNode<V> {
    pub(crate) fn new(source: &Signal<V>, gate: &Signal<bool>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            source: source.clone(),
            gate: gate.latest(),
            deferred: RefCell::new(None),
            count: Cell::new(0),
            broadcast: Broadcast::new(),
            upstreams: RefCell::new(None),
        })
    }

    fn open(&self) {
        let count = self.count.get();
        if count == 0 {
            self.push_transaction(&Transaction::Begin);
        }
        self.count.set(count + 1);
    }

    fn close(&self) {
        let count = self.count.get();
        assert!(count > 0, "unbalanced transaction: settle without a matching begin");
        self.count.set(count - 1);
        if count == 1 {
            let open_gate = matches!(self.gate.latest_value().get(), Some(true));
            let released = if open_gate { self.deferred.borrow_mut().take() } else { None };
            match released {
                Some(value) => self.push_transaction(&Transaction::End(value)),
                None => self.push_transaction(&Transaction::Cancel),
            }
        }
    }

    fn apply_source(&self, transaction: &Transaction<V>) {
        match transaction {
            Transaction::Begin => {
                self.open();
                self.deferred.borrow_mut().take();
            }
            Transaction::End(value) => {
                *self.deferred.borrow_mut() = Some(value.clone());
                self.close();
            }
            Transaction::Cancel => self.close(),
        }
    }

    fn apply_gate(&self, transaction: &Transaction<bool>) {
        match transaction {
            Transaction::Begin => self.open(),
            Transaction::End(_) | Transaction::Cancel => self.close(),
        }
    }
}

impl<V: Clone + 'static> SignalNode<V> for GateNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn wire(&self) {
        let weak = self.weak.clone();
        let source = Receiver::new(&self.source, move |transaction| {
            if let Some(node) = weak.upgrade() {
                node.apply_source(transaction);
            }
        });
        let weak = self.weak.clone();
        let gate = Receiver::new(&self.gate, move |transaction| {
            if let Some(node) = weak.upgrade() {
                node.apply_gate(transaction);
            }
        });
        *self.upstreams.borrow_mut() = Some((source, gate));
    }
}

impl Signal<bool> {
    /// Use this boolean signal as a guard deferring `source`'s values.
    ///
    /// Compose the source with `.event()` for the usual hold-then-release
    /// behavior: at most one pending value, released on a rising edge of the
    /// guard (or when source and guard change in the same transaction).
    pub fn gate<V: Clone + 'static>(&self, source: &Signal<V>) -> Signal<V> {
        Signal::from_node(GateNode::new(source, self))
    }
}
