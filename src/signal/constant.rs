use std::rc::Rc;

use crate::broadcast::Broadcast;
use crate::signal::SignalNode;
use crate::transaction::LatestValue;

/// An inert node: never pushes, never has a value.
pub(crate) struct NeverNode<V: Clone + 'static> {
    broadcast: Broadcast<V>,
}

impl<V: Clone + 'static> NeverNode<V> {
    pub(crate) fn new() -> Self { Self { broadcast: Broadcast::new() } }
}

impl<V: Clone + 'static> SignalNode<V> for NeverNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }
}

/// A fixed value: primes each new subscriber once, never pushes.
pub(crate) struct ConstNode<V: Clone + 'static> {
    value: V,
    broadcast: Broadcast<V>,
}

impl<V: Clone + 'static> ConstNode<V> {
    pub(crate) fn new(value: V) -> Self { Self { value, broadcast: Broadcast::new() } }
}

impl<V: Clone + 'static> SignalNode<V> for ConstNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<V> { LatestValue::Stored(self.value.clone()) }
}

/// A thunk-backed value: pulled on demand, never pushes.
pub(crate) struct ComputedNode<V: Clone + 'static> {
    compute: Rc<dyn Fn() -> V>,
    broadcast: Broadcast<V>,
}

impl<V: Clone + 'static> ComputedNode<V> {
    pub(crate) fn new(compute: impl Fn() -> V + 'static) -> Self {
        Self { compute: Rc::new(compute), broadcast: Broadcast::new() }
    }
}

impl<V: Clone + 'static> SignalNode<V> for ComputedNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<V> { LatestValue::Computed(self.compute.clone()) }
}
