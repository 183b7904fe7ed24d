use std::rc::Rc;

/// One phase of an observable change.
///
/// Every change travels as a pair: a `Begin`, followed eventually by exactly
/// one `End(v)` or `Cancel` before the next `Begin` on the same node. The
/// two-phase shape is what lets combining nodes notice that several upstream
/// notifications belong to a single external event and coalesce them.
#[derive(Clone, Debug, PartialEq)]
pub enum Transaction<V> {
    /// A change is in flight somewhere upstream.
    Begin,
    /// The change settled on a value.
    End(V),
    /// The change was suppressed mid-flight (filtered out, deduplicated,
    /// deferred, or vetoed).
    Cancel,
}

/// A pull-mode snapshot of a node's current value.
///
/// `Stored` is a cached value, `Computed` derives one on demand from
/// upstream state. Nodes that have not admitted a value yet report `None`.
pub enum LatestValue<V> {
    None,
    Stored(V),
    Computed(Rc<dyn Fn() -> V>),
}

impl<V> Clone for LatestValue<V>
where V: Clone
{
    fn clone(&self) -> Self {
        match self {
            LatestValue::None => LatestValue::None,
            LatestValue::Stored(value) => LatestValue::Stored(value.clone()),
            LatestValue::Computed(thunk) => LatestValue::Computed(thunk.clone()),
        }
    }
}

impl<V> std::fmt::Debug for LatestValue<V>
where V: std::fmt::Debug
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LatestValue::None => write!(f, "None"),
            LatestValue::Stored(value) => write!(f, "Stored({value:?})"),
            LatestValue::Computed(_) => write!(f, "Computed(_)"),
        }
    }
}

impl<V: Clone + 'static> LatestValue<V> {
    /// Whether a value is available (stored or computable).
    pub fn has(&self) -> bool { !matches!(self, LatestValue::None) }

    /// Materialize the current value, if any.
    pub fn get(&self) -> Option<V> {
        match self {
            LatestValue::None => None,
            LatestValue::Stored(value) => Some(value.clone()),
            LatestValue::Computed(thunk) => Some(thunk()),
        }
    }

    /// Turn a present value into a thunk. Combining nodes use this to build
    /// composed thunks without unwrapping along the way.
    pub(crate) fn materialize(self) -> Option<Rc<dyn Fn() -> V>> {
        match self {
            LatestValue::None => None,
            LatestValue::Stored(value) => Some(Rc::new(move || value.clone())),
            LatestValue::Computed(thunk) => Some(thunk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_value_get() {
        assert_eq!(LatestValue::<i32>::None.get(), None);
        assert_eq!(LatestValue::Stored(7).get(), Some(7));
        assert_eq!(LatestValue::Computed(Rc::new(|| 3 + 4)).get(), Some(7));
    }

    #[test]
    fn test_latest_value_has() {
        assert!(!LatestValue::<i32>::None.has());
        assert!(LatestValue::Stored(0).has());
        assert!(LatestValue::<i32>::Computed(Rc::new(|| 0)).has());
    }

    #[test]
    fn test_materialize_defers_computation() {
        use std::cell::Cell;
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let latest = LatestValue::Computed(Rc::new(move || {
            counter.set(counter.get() + 1);
            42
        }));
        let thunk = latest.materialize().unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(thunk(), 42);
        assert_eq!(calls.get(), 1);
    }
}
