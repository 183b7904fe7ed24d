use std::cell::{Cell, RefCell};

/// An insertion-ordered set of elements addressed by monotonically
/// increasing keys. Keys are never reused within one instance.
///
/// Backs every signal's observer list. Iteration happens through
/// [`KeyedSet::snapshot`], so callbacks invoked mid-iteration may freely add
/// or remove elements without skipping or double-visiting the rest.
pub struct KeyedSet<T> {
    entries: RefCell<Vec<(u64, T)>>,
    next_key: Cell<u64>,
}

impl<T> KeyedSet<T> {
    pub fn new() -> Self { Self { entries: RefCell::new(Vec::new()), next_key: Cell::new(0) } }

    /// Insert an element and return its key.
    pub fn add(&self, element: T) -> u64 {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.entries.borrow_mut().push((key, element));
        key
    }

    /// Remove the element under `key`. Unknown keys are a no-op.
    pub fn remove(&self, key: u64) { self.entries.borrow_mut().retain(|(k, _)| *k != key); }

    pub fn len(&self) -> usize { self.entries.borrow().len() }

    pub fn is_empty(&self) -> bool { self.entries.borrow().is_empty() }
}

impl<T: Clone> KeyedSet<T> {
    /// Clone the current elements in insertion order.
    pub fn snapshot(&self) -> Vec<T> { self.entries.borrow().iter().map(|(_, element)| element.clone()).collect() }
}

impl<T> Default for KeyedSet<T> {
    fn default() -> Self { Self::new() }
}
