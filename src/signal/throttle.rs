use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::scheduler::{Clock, Scheduler, TimerHandle};
use crate::signal::{Signal, SignalNode};
use crate::transaction::Transaction;

/// Enforces a minimum interval between settled emissions.
///
/// A value arriving before the interval has elapsed is deferred on the
/// scheduler's timer; the downstream transaction stays open (the count holds
/// one slot for the armed timer) and settles when the timer fires. A newer
/// upstream value cancels the timer, releases the held slot with a `Cancel`,
/// and re-defers with the newer payload, so only the most recent deferred
/// value survives the window. The timer task captures the payload at defer
/// time and re-arms for the remaining interval, not a fresh full one.
pub(crate) struct ThrottleNode<V: Clone + 'static> {
    weak: Weak<ThrottleNode<V>>,
    parent: Signal<V>,
    min_interval: Duration,
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn Scheduler>,
    last_emit: Cell<Option<Instant>>,
    timer: Cell<Option<TimerHandle>>,
    timer_active: Cell<bool>,
    count: Cell<u32>,
    broadcast: Broadcast<V>,
    upstream: RefCell<Option<Receiver<V>>>,
}

impl<V: Clone + 'static> ThrottleNode<V> {
    pub(crate) fn new(
        parent: &Signal<V>,
        min_interval: Duration,
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            min_interval,
            clock,
            scheduler,
            last_emit: Cell::new(None),
            timer: Cell::new(None),
            timer_active: Cell::new(false),
            count: Cell::new(0),
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }

    fn apply(&self, transaction: &Transaction<V>) {
        match transaction {
            Transaction::Begin => {
                let count = self.count.get();
                if count == 0 {
                    self.push_transaction(&Transaction::Begin);
                }
                self.count.set(count + 1);
            }
            Transaction::End(value) => self.end(value),
            Transaction::Cancel => self.settle(&Transaction::Cancel),
        }
    }

    fn end(&self, value: &V) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
        if self.timer_active.replace(false) {
            // Release the slot the cancelled timer was holding open.
            self.settle(&Transaction::Cancel);
        }

        let now = self.clock.now();
        match self.last_emit.get() {
            Some(previous) if now.duration_since(previous) <= self.min_interval => {
                let remaining = self.min_interval - now.duration_since(previous);
                self.arm(value.clone(), remaining);
            }
            _ => {
                self.last_emit.set(Some(now));
                self.settle(&Transaction::End(value.clone()));
            }
        }
    }

    fn arm(&self, value: V, delay: Duration) {
        let weak = self.weak.clone();
        let handle = self.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(node) = weak.upgrade() {
                    node.fire(value);
                }
            }),
        );
        self.timer.set(Some(handle));
        self.timer_active.set(true);
    }

    fn fire(&self, value: V) {
        self.timer.set(None);
        self.timer_active.set(false);
        self.last_emit.set(Some(self.clock.now()));
        self.settle(&Transaction::End(value));
    }

    fn settle(&self, transaction: &Transaction<V>) {
        let count = self.count.get();
        assert!(count > 0, "unbalanced transaction: settle without a matching begin");
        self.count.set(count - 1);
        if count == 1 {
            self.push_transaction(transaction);
        }
    }
}

impl<V: Clone + 'static> SignalNode<V> for ThrottleNode<V> {
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

impl<V: Clone + 'static> Drop for ThrottleNode<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}
