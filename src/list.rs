//! Generic singly linked list.
//!
//! The manager keeps one of these per priority bucket (worker registrations,
//! in insertion order). The list is deliberately not synchronized: any caller
//! sharing one across tasks must provide its own mutual exclusion, which is
//! exactly what the manager's per-bucket lock does.

struct Node<T> {
    item: T,
    next: Option<Box<Node<T>>>,
}

/// A singly linked list of owned items.
///
/// Indices are zero-based. Out-of-range lookups and removals are quiet
/// no-ops (`None`), never panics. `push_back` walks to the tail, so appends
/// are O(n).
pub struct List<T> {
    head: Option<Box<Node<T>>>,
    len: usize,
}

impl<T> List<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of items in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append an item at the tail, preserving insertion order.
    pub fn push_back(&mut self, item: T) {
        let mut link = &mut self.head;
        while let Some(node) = link {
            link = &mut node.next;
        }
        *link = Some(Box::new(Node { item, next: None }));
        self.len += 1;
    }

    /// Item at `index`, or `None` if out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    /// Unlink and return the item at `index`; `None` on an invalid index.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let mut link = &mut self.head;
        for _ in 0..index {
            link = &mut link.as_mut()?.next;
        }
        let node = link.take()?;
        *link = node.next;
        self.len -= 1;
        Some(node.item)
    }

    /// Unlink and return the first item matching `pred`, leaving any later
    /// matches in place.
    pub fn remove_first<F>(&mut self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let index = self.iter().position(pred)?;
        self.remove(index)
    }

    /// Drop every item, leaving the list empty.
    pub fn clear(&mut self) {
        self.head = None;
        self.len = 0;
    }

    /// Iterate the items in list order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

// The derived recursive drop would overflow the stack on a long chain;
// unlink nodes one at a time instead.
impl<T> Drop for List<T> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

/// Borrowing iterator over a [`List`].
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(&node.item)
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for List<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
