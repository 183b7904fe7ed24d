//! Glitch-free combination of 2..6 signals.
//!
//! A single assignment at the boundary can reach a combining node along
//! several paths of a diamond-shaped graph. Because every upstream node
//! emits `Begin` before `End`, the combiner's transaction count rises above
//! one during the fan-in; it emits one `Begin` when the count leaves zero
//! and one `End`/`Cancel` when it returns, so intermediate fluctuations
//! never leak downstream. The combined value is resampled from each
//! parent's latest value at settle time (the payloads carried by individual
//! `End`s are dropped), which gives the combine function a consistent
//! cross-section of the graph.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};
use crate::transaction::{LatestValue, Transaction};

/// Transaction bookkeeping shared by all combiner arities.
///
/// `ended` records that some parent settled on a value during the group;
/// `cancelled` records that some parent cancelled, which vetoes emission
/// even when a sibling ended.
struct Ledger {
    count: Cell<u32>,
    ended: Cell<bool>,
    cancelled: Cell<bool>,
}

impl Ledger {
    fn new() -> Self { Self { count: Cell::new(0), ended: Cell::new(false), cancelled: Cell::new(false) } }

    /// Account for a parent `Begin`. Returns true when this opens the
    /// downstream transaction.
    fn open(&self) -> bool {
        let count = self.count.get();
        if count == 0 {
            self.ended.set(false);
            self.cancelled.set(false);
        }
        self.count.set(count + 1);
        count == 0
    }

    fn note(&self, ended: bool) {
        if ended {
            self.ended.set(true);
        } else {
            self.cancelled.set(true);
        }
    }

    /// Account for a parent `End`/`Cancel`. Returns `Some(emit_end)` when
    /// the count returns to zero and the downstream transaction must settle.
    fn close(&self) -> Option<bool> {
        let count = self.count.get();
        assert!(count > 0, "unbalanced transaction: settle without a matching begin");
        self.count.set(count - 1);
        if count == 1 {
            let emit_end = self.ended.get() && !self.cancelled.get();
            self.ended.set(false);
            self.cancelled.set(false);
            Some(emit_end)
        } else {
            None
        }
    }
}

macro_rules! combiner {
    ($node:ident, $constructor:ident, $doc:literal, $($T:ident: $p:ident),+) => {
        pub(crate) struct $node<$($T: Clone + 'static,)+ O: Clone + 'static> {
            weak: Weak<$node<$($T,)+ O>>,
            $($p: Signal<$T>,)+
            combine: Rc<dyn Fn($(&$T),+) -> O>,
            ledger: Ledger,
            broadcast: Broadcast<O>,
            upstreams: RefCell<Option<($(Receiver<$T>,)+)>>,
        }

        impl<$($T: Clone + 'static,)+ O: Clone + 'static> $node<$($T,)+ O> {
            fn open(&self) {
                if self.ledger.open() {
                    self.push_transaction(&Transaction::Begin);
                }
            }

            fn settle(&self, ended: bool) {
                self.ledger.note(ended);
                if let Some(emit_end) = self.ledger.close() {
                    if emit_end {
                        if let Some(value) = self.latest_value().get() {
                            self.push_transaction(&Transaction::End(value));
                            return;
                        }
                    }
                    self.push_transaction(&Transaction::Cancel);
                }
            }
        }

        impl<$($T: Clone + 'static,)+ O: Clone + 'static> SignalNode<O> for $node<$($T,)+ O> {
            fn broadcast(&self) -> &Broadcast<O> { &self.broadcast }

            fn latest_value(&self) -> LatestValue<O> {
                $(
                    let $p = match self.$p.latest_value().materialize() {
                        Some(thunk) => thunk,
                        None => return LatestValue::None,
                    };
                )+
                let combine = self.combine.clone();
                LatestValue::Computed(Rc::new(move || combine($(&$p()),+)))
            }

            fn wire(&self) {
                $(
                    let weak = self.weak.clone();
                    let $p = Receiver::new(&self.$p, move |transaction| {
                        if let Some(node) = weak.upgrade() {
                            match transaction {
                                Transaction::Begin => node.open(),
                                Transaction::End(_) => node.settle(true),
                                Transaction::Cancel => node.settle(false),
                            }
                        }
                    });
                )+
                *self.upstreams.borrow_mut() = Some(($($p,)+));
            }
        }

        #[doc = $doc]
        ///
        /// Parents are latest-wrapped on the way in, so the combined value
        /// can always be resampled once every parent has carried a value.
        pub fn $constructor<$($T: Clone + 'static,)+ O: Clone + 'static>(
            $($p: &Signal<$T>,)+
            combine: impl Fn($(&$T),+) -> O + 'static,
        ) -> Signal<O> {
            let node = Rc::new_cyclic(|weak| $node {
                weak: weak.clone(),
                $($p: $p.latest(),)+
                combine: Rc::new(combine),
                ledger: Ledger::new(),
                broadcast: Broadcast::new(),
                upstreams: RefCell::new(None),
            });
            Signal::from_node(node)
        }
    };
}

combiner!(Combine2Node, combine, "Combine two signals with a glitch-suppressing node.", A: a, B: b);
combiner!(Combine3Node, combine3, "Combine three signals with a glitch-suppressing node.", A: a, B: b, C: c);
combiner!(Combine4Node, combine4, "Combine four signals with a glitch-suppressing node.", A: a, B: b, C: c, D: d);
combiner!(Combine5Node, combine5, "Combine five signals with a glitch-suppressing node.", A: a, B: b, C: c, D: d, E: e);
combiner!(Combine6Node, combine6, "Combine six signals with a glitch-suppressing node.", A: a, B: b, C: c, D: d, E: e, F: f);
