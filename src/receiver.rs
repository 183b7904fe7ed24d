use tracing::trace;

use crate::signal::Signal;
use crate::transaction::Transaction;

/// A scoped subscription: owns one observer registration on its source and
/// deregisters on drop.
pub struct Receiver<V: Clone + 'static> {
    source: Signal<V>,
    key: u64,
}

impl<V: Clone + 'static> Receiver<V> {
    pub fn new(source: &Signal<V>, callback: impl Fn(&Transaction<V>) + 'static) -> Self {
        let key = source.add_observer(callback);
        Self { source: source.clone(), key }
    }

    pub fn source(&self) -> &Signal<V> { &self.source }
}

impl<V: Clone + 'static> Drop for Receiver<V> {
    fn drop(&mut self) {
        trace!("receiver dropped, deregistering observer");
        self.source.remove_observer(self.key);
    }
}

/// A receiver that invokes a plain value callback on every settled value.
pub struct Output<V: Clone + 'static> {
    _receiver: Receiver<V>,
}

impl<V: Clone + 'static> Output<V> {
    pub fn new(source: &Signal<V>, callback: impl Fn(V) + 'static) -> Self {
        let receiver = Receiver::new(source, move |transaction| {
            if let Transaction::End(value) = transaction {
                callback(value.clone());
            }
        });
        Self { _receiver: receiver }
    }
}

/// The `Begin`-phase counterpart of [`Output`]: fires when a change starts.
pub struct WillOutput<V: Clone + 'static> {
    _receiver: Receiver<V>,
}

impl<V: Clone + 'static> WillOutput<V> {
    pub fn new(source: &Signal<V>, callback: impl Fn() + 'static) -> Self {
        let receiver = Receiver::new(source, move |transaction| {
            if let Transaction::Begin = transaction {
                callback();
            }
        });
        Self { _receiver: receiver }
    }
}
