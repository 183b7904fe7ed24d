//! The ergonomic layer over the core: operator overloads, boolean algebra,
//! `Option` helpers, and edge-triggered outputs.
//!
//! The original infix surface maps onto Rust's overloadable operators:
//! `&signal >> callback` builds an [`Output`], `&input << value` assigns,
//! `!&signal` negates, and `&a & &b` / `&a | &b` combine boolean signals
//! pointwise. The boolean ops always evaluate both sides (they resample both
//! parents' latest values), so there is no short-circuiting.

use std::ops::{BitAnd, BitOr, Not, Shl, Shr};

use crate::receiver::Output;
use crate::signal::combine::combine;
use crate::signal::{Input, Signal};

/// Pointwise negation of a boolean signal.
pub fn not(signal: &Signal<bool>) -> Signal<bool> { signal.map(|value| !value) }

impl Not for &Signal<bool> {
    type Output = Signal<bool>;

    fn not(self) -> Signal<bool> { not(self) }
}

impl BitAnd for &Signal<bool> {
    type Output = Signal<bool>;

    fn bitand(self, rhs: &Signal<bool>) -> Signal<bool> { combine(self, rhs, |a, b| *a && *b) }
}

impl BitOr for &Signal<bool> {
    type Output = Signal<bool>;

    fn bitor(self, rhs: &Signal<bool>) -> Signal<bool> { combine(self, rhs, |a, b| *a || *b) }
}

/// `&signal >> callback` subscribes, returning the owning [`Output`].
impl<V: Clone + 'static, F: Fn(V) + 'static> Shr<F> for &Signal<V> {
    type Output = Output<V>;

    fn shr(self, callback: F) -> Output<V> { self.output(callback) }
}

/// `&input << value` assigns and propagates.
impl<V: Clone + 'static> Shl<V> for &Input<V> {
    type Output = ();

    fn shl(self, value: V) { self.set(value); }
}

impl<V: Clone + 'static> Signal<Option<V>> {
    /// True whenever the current value is absent.
    pub fn is_none(&self) -> Signal<bool> { self.map(|value| value.is_none()) }

    /// Admit only present values, unwrapped.
    pub fn filter_some(&self) -> Signal<V> {
        self.filter(|value| value.is_some())
            .map(|value| value.clone().expect("filter admitted only present values"))
    }
}

impl Signal<bool> {
    /// Invoke `callback` each time the signal transitions to true.
    pub fn on_rising_edge(&self, callback: impl Fn() + 'static) -> Output<bool> {
        self.on_change().filter(|value| *value).output(move |_| callback())
    }

    /// Invoke `callback` each time the signal transitions to false.
    pub fn on_falling_edge(&self, callback: impl Fn() + 'static) -> Output<bool> {
        self.on_change().filter(|value| !*value).output(move |_| callback())
    }
}
