use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};
use crate::transaction::{LatestValue, Transaction};

/// Applies a pure transform to every value flowing through.
///
/// The latest value mirrors the parent's through the transform as a composed
/// thunk, so pulls stay glitch-free as long as the transform is total.
pub(crate) struct MappedNode<A: Clone + 'static, B: Clone + 'static> {
    weak: Weak<MappedNode<A, B>>,
    parent: Signal<A>,
    transform: Rc<dyn Fn(&A) -> B>,
    broadcast: Broadcast<B>,
    upstream: RefCell<Option<Receiver<A>>>,
}

impl<A: Clone + 'static, B: Clone + 'static> MappedNode<A, B> {
    pub(crate) fn new(parent: &Signal<A>, transform: Rc<dyn Fn(&A) -> B>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            transform,
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }

    fn apply(&self, transaction: &Transaction<A>) {
        match transaction {
            Transaction::Begin => self.push_transaction(&Transaction::Begin),
            Transaction::End(value) => self.push_transaction(&Transaction::End((self.transform)(value))),
            Transaction::Cancel => self.push_transaction(&Transaction::Cancel),
        }
    }
}

impl<A: Clone + 'static, B: Clone + 'static> SignalNode<B> for MappedNode<A, B> {
    fn broadcast(&self) -> &Broadcast<B> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<B> {
        match self.parent.latest_value().materialize() {
            Some(thunk) => {
                let transform = self.transform.clone();
                LatestValue::Computed(Rc::new(move || transform(&thunk())))
            }
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

/// Push-driven on the parent, pull-sampled on one auxiliary signal.
pub(crate) struct MapWithNode<A: Clone + 'static, X: Clone + 'static, O: Clone + 'static> {
    weak: Weak<MapWithNode<A, X, O>>,
    parent: Signal<A>,
    aux: Signal<X>,
    transform: Rc<dyn Fn(&A, &X) -> O>,
    broadcast: Broadcast<O>,
    upstream: RefCell<Option<Receiver<A>>>,
}

impl<A: Clone + 'static, X: Clone + 'static, O: Clone + 'static> MapWithNode<A, X, O> {
    pub(crate) fn new(parent: &Signal<A>, aux: &Signal<X>, transform: Rc<dyn Fn(&A, &X) -> O>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            aux: aux.clone(),
            transform,
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }

    fn apply(&self, transaction: &Transaction<A>) {
        match transaction {
            Transaction::Begin => self.push_transaction(&Transaction::Begin),
            Transaction::End(value) => match self.aux.latest_value().get() {
                Some(sample) => self.push_transaction(&Transaction::End((self.transform)(value, &sample))),
                None => self.push_transaction(&Transaction::Cancel),
            },
            Transaction::Cancel => self.push_transaction(&Transaction::Cancel),
        }
    }
}

impl<A: Clone + 'static, X: Clone + 'static, O: Clone + 'static> SignalNode<O> for MapWithNode<A, X, O> {
    fn broadcast(&self) -> &Broadcast<O> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<O> {
        let parent = match self.parent.latest_value().materialize() {
            Some(thunk) => thunk,
            None => return LatestValue::None,
        };
        let aux = match self.aux.latest_value().materialize() {
            Some(thunk) => thunk,
            None => return LatestValue::None,
        };
        let transform = self.transform.clone();
        LatestValue::Computed(Rc::new(move || transform(&parent(), &aux())))
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

/// Two-auxiliary variant of [`MapWithNode`].
pub(crate) struct MapWith2Node<A: Clone + 'static, X: Clone + 'static, Y: Clone + 'static, O: Clone + 'static> {
    weak: Weak<MapWith2Node<A, X, Y, O>>,
    parent: Signal<A>,
    aux1: Signal<X>,
    aux2: Signal<Y>,
    transform: Rc<dyn Fn(&A, &X, &Y) -> O>,
    broadcast: Broadcast<O>,
    upstream: RefCell<Option<Receiver<A>>>,
}

impl<A: Clone + 'static, X: Clone + 'static, Y: Clone + 'static, O: Clone + 'static> MapWith2Node<A, X, Y, O> {
    pub(crate) fn new(
        parent: &Signal<A>,
        aux1: &Signal<X>,
        aux2: &Signal<Y>,
        transform: Rc<dyn Fn(&A, &X, &Y) -> O>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            aux1: aux1.clone(),
            aux2: aux2.clone(),
            transform,
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }

    fn apply(&self, transaction: &Transaction<A>) {
        match transaction {
            Transaction::Begin => self.push_transaction(&Transaction::Begin),
            Transaction::End(value) => {
                match (self.aux1.latest_value().get(), self.aux2.latest_value().get()) {
                    (Some(x), Some(y)) => self.push_transaction(&Transaction::End((self.transform)(value, &x, &y))),
                    _ => self.push_transaction(&Transaction::Cancel),
                }
            }
            Transaction::Cancel => self.push_transaction(&Transaction::Cancel),
        }
    }
}

impl<A: Clone + 'static, X: Clone + 'static, Y: Clone + 'static, O: Clone + 'static> SignalNode<O>
    for MapWith2Node<A, X, Y, O>
{
    fn broadcast(&self) -> &Broadcast<O> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<O> {
        let parent = match self.parent.latest_value().materialize() {
            Some(thunk) => thunk,
            None => return LatestValue::None,
        };
        let aux1 = match self.aux1.latest_value().materialize() {
            Some(thunk) => thunk,
            None => return LatestValue::None,
        };
        let aux2 = match self.aux2.latest_value().materialize() {
            Some(thunk) => thunk,
            None => return LatestValue::None,
        };
        let transform = self.transform.clone();
        LatestValue::Computed(Rc::new(move || transform(&parent(), &aux1(), &aux2())))
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
