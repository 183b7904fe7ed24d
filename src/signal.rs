pub mod combine;
pub mod constant;
pub mod event;
pub mod filter;
pub mod gate;
pub mod input;
pub mod join;
pub mod latest;
pub mod map;
pub mod on_change;
pub mod throttle;
pub mod union;

pub use combine::{combine, combine3, combine4, combine5, combine6};
pub use input::Input;
pub use union::union;

use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::broadcast::{Broadcast, ObserverFn};
use crate::receiver::{Output, WillOutput};
use crate::scheduler::{Clock, Scheduler};
use crate::transaction::{LatestValue, Transaction};

/// The interface every node presents to its children (push) and its parents
/// (pull). Operator nodes implement this plus their own transaction policy.
///
/// `wire` establishes the node's subscriptions on its parents. It is invoked
/// once, when the node receives its first observer; leaves keep the default
/// no-op.
pub trait SignalNode<V: Clone + 'static> {
    fn broadcast(&self) -> &Broadcast<V>;

    fn latest_value(&self) -> LatestValue<V> { LatestValue::None }

    fn wire(&self) {}

    /// Synchronously deliver `transaction` to every registered observer, in
    /// registration order.
    fn push_transaction(&self, transaction: &Transaction<V>) { self.broadcast().send(transaction); }

    /// Shorthand for a complete `Begin` / `End(value)` pair.
    fn push_value(&self, value: V) {
        self.push_transaction(&Transaction::Begin);
        self.push_transaction(&Transaction::End(value));
    }
}

/// A handle to a node in the dataflow graph producing values of type `V`.
///
/// Handles are cheap to clone and compare by node identity. All operator
/// methods hang off this type; leaves are created through [`Input`] or the
/// [`Signal::constant`] / [`Signal::never`] / [`Signal::computed`]
/// constructors.
pub struct Signal<V: Clone + 'static> {
    node: Rc<dyn SignalNode<V>>,
}

impl<V: Clone + 'static> Clone for Signal<V> {
    fn clone(&self) -> Self { Self { node: self.node.clone() } }
}

impl<V: Clone + 'static> Signal<V> {
    pub(crate) fn from_node(node: Rc<dyn SignalNode<V>>) -> Self { Self { node } }

    /// Node identity. Signals compare equal only when they are the same node.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool { Rc::ptr_eq(&a.node, &b.node) }

    /// This node's pull-mode snapshot.
    pub fn latest_value(&self) -> LatestValue<V> { self.node.latest_value() }

    /// Register an observer callback and return its key.
    ///
    /// If the node currently has a value, the observer is first primed with a
    /// synchronous `Begin` / `End(v)` pair so new subscribers see current
    /// state. The first observer also causes the node to wire itself to its
    /// parents; the registration primers cascading down from the parents are
    /// forwarded only when the node could not prime from its own latest value
    /// (otherwise the observer would see the current state twice).
    pub fn add_observer(&self, observer: impl Fn(&Transaction<V>) + 'static) -> u64 {
        self.add_observer_rc(Rc::new(observer))
    }

    pub(crate) fn add_observer_rc(&self, observer: ObserverFn<V>) -> u64 {
        let primed = match self.node.latest_value().materialize() {
            Some(thunk) => {
                observer(&Transaction::Begin);
                observer(&Transaction::End(thunk()));
                true
            }
            None => false,
        };
        let key = self.node.broadcast().add(observer);
        if self.node.broadcast().mark_wired() {
            trace!(primed, "wiring signal node to its parents");
            self.node.broadcast().set_muted(primed);
            self.node.wire();
            self.node.broadcast().set_muted(false);
        }
        key
    }

    /// Deregister an observer. Unknown keys are a no-op.
    pub fn remove_observer(&self, key: u64) { self.node.broadcast().remove(key); }

    /// The erased handle itself; useful in generic code that also accepts
    /// concrete handles like [`Input`].
    pub fn signal(&self) -> Signal<V> { self.clone() }

    /// A signal that never pushes and never has a value.
    pub fn never() -> Signal<V> { Signal::from_node(Rc::new(constant::NeverNode::new())) }

    /// A signal with a fixed stored value. Primes subscribers, never pushes.
    pub fn constant(value: V) -> Signal<V> { Signal::from_node(Rc::new(constant::ConstNode::new(value))) }

    /// A signal whose value is computed on demand. Primes subscribers with
    /// the thunk's current result, never pushes.
    pub fn computed(compute: impl Fn() -> V + 'static) -> Signal<V> {
        Signal::from_node(Rc::new(constant::ComputedNode::new(compute)))
    }

    /// Transform every value with a pure function.
    pub fn map<O: Clone + 'static>(&self, transform: impl Fn(&V) -> O + 'static) -> Signal<O> {
        Signal::from_node(map::MappedNode::new(self, Rc::new(transform)))
    }

    /// Admit only values matching `predicate`; rejected values cancel the
    /// transaction. A filter has no latest value until one wraps it with
    /// [`Signal::latest`].
    pub fn filter(&self, predicate: impl Fn(&V) -> bool + 'static) -> Signal<V> {
        Signal::from_node(filter::FilterNode::new(self, Rc::new(predicate)))
    }

    /// A pure event stream: forwards everything, has no latest value, and
    /// never primes new subscribers.
    pub fn event(&self) -> Signal<V> { Signal::from_node(event::EventNode::new(self)) }

    /// Cache the most recent settled value so downstream pulls always
    /// succeed once a value has flowed. Returns `self` unchanged when the
    /// node already reports a stored value (never double-wraps).
    pub fn latest(&self) -> Signal<V> {
        if matches!(self.latest_value(), LatestValue::Stored(_)) {
            return self.clone();
        }
        Signal::from_node(latest::LatestNode::new(self))
    }

    /// Suppress consecutive duplicate values.
    pub fn on_change(&self) -> Signal<V>
    where V: PartialEq {
        Signal::from_node(on_change::OnChangeNode::new(self))
    }

    /// Push-driven on `self`, pull-sampled on `aux`: every settled value of
    /// `self` is combined with `aux`'s current latest value. If `aux` has no
    /// value yet the transaction cancels.
    pub fn map_with<X: Clone + 'static, O: Clone + 'static>(
        &self,
        aux: &Signal<X>,
        transform: impl Fn(&V, &X) -> O + 'static,
    ) -> Signal<O> {
        Signal::from_node(map::MapWithNode::new(self, aux, Rc::new(transform)))
    }

    /// Two-auxiliary variant of [`Signal::map_with`].
    pub fn map_with2<X: Clone + 'static, Y: Clone + 'static, O: Clone + 'static>(
        &self,
        aux1: &Signal<X>,
        aux2: &Signal<Y>,
        transform: impl Fn(&V, &X, &Y) -> O + 'static,
    ) -> Signal<O> {
        Signal::from_node(map::MapWith2Node::new(self, aux1, aux2, Rc::new(transform)))
    }

    /// Enforce a minimum interval between settled emissions. A value arriving
    /// too early is deferred on `scheduler`'s timer and delivered when the
    /// interval has elapsed; a newer value replaces the deferred one.
    pub fn throttle(&self, min_interval: Duration, clock: Rc<dyn Clock>, scheduler: Rc<dyn Scheduler>) -> Signal<V> {
        Signal::from_node(throttle::ThrottleNode::new(self, min_interval, clock, scheduler))
    }

    /// Invoke `callback` with every settled value. The returned [`Output`]
    /// owns the subscription; dropping it unsubscribes.
    pub fn output(&self, callback: impl Fn(V) + 'static) -> Output<V> { Output::new(self, callback) }

    /// Invoke `callback` when a change begins (before it settles).
    pub fn will_output(&self, callback: impl Fn() + 'static) -> WillOutput<V> { WillOutput::new(self, callback) }
}
