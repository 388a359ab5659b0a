//! Fixed-capacity doubly linked list backed by a slot arena.
//!
//! Nodes live in a `Vec` and link to each other by slot index instead of by
//! pointer. A removed node's slot is threaded onto an intrusive free list and
//! handed out again by the next [`List::add`], so the arena never grows past
//! the capacity given at construction.
//!
//! The list is ordered from head (most recently added) to tail (least
//! recently added). Moving toward the head from a node means following its
//! `prev` link.

use core::fmt;
use core::num::NonZeroUsize;

struct Node<T> {
    val: T,
    prev: Option<usize>,
    next: Option<usize>,
}

enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: Option<usize> },
}

/// A doubly linked list with fixed capacity whose nodes are addressed by slot index.
///
/// # Examples
///
/// ```ignore
/// use core::num::NonZeroUsize;
///
/// let mut list = List::new(NonZeroUsize::new(3).unwrap());
/// let a = list.add(10).unwrap();
/// let b = list.add(20).unwrap();
///
/// assert_eq!(list.head(), Some(b));
/// assert_eq!(list.tail(), Some(a));
/// assert_eq!(list.remove(a), Some(10));
/// ```
pub(crate) struct List<T> {
    /// Maximum number of items the list can hold.
    cap: NonZeroUsize,
    /// Current number of items in the list.
    len: usize,
    slots: Vec<Slot<T>>,
    /// First vacant slot available for reuse.
    free: Option<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> List<T> {
    /// Creates a new list that holds at most `cap` items.
    pub(crate) fn new(cap: NonZeroUsize) -> List<T> {
        List {
            cap,
            len: 0,
            slots: Vec::with_capacity(cap.get()),
            free: None,
            head: None,
            tail: None,
        }
    }

    /// Returns the maximum number of items the list can hold.
    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    /// Returns the current number of items in the list.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.cap.get()
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<usize> {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> Option<usize> {
        self.tail
    }

    fn node(&self, idx: usize) -> Option<&Node<T>> {
        match self.slots.get(idx) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<T>> {
        match self.slots.get_mut(idx) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns the neighbour of `idx` on the head side, if any.
    #[inline]
    pub(crate) fn prev(&self, idx: usize) -> Option<usize> {
        self.node(idx).and_then(|node| node.prev)
    }

    /// Returns the neighbour of `idx` on the tail side, if any.
    #[inline]
    pub(crate) fn next(&self, idx: usize) -> Option<usize> {
        self.node(idx).and_then(|node| node.next)
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> Option<&T> {
        self.node(idx).map(|node| &node.val)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.node_mut(idx).map(|node| &mut node.val)
    }

    /// Adds a value at the head of the list and returns its slot index.
    ///
    /// Returns `None` when the list is already at capacity.
    pub(crate) fn add(&mut self, val: T) -> Option<usize> {
        if self.is_full() {
            return None;
        }

        let node = Node {
            val,
            prev: None,
            next: self.head,
        };

        let idx = match self.free {
            Some(idx) => {
                let slot = core::mem::replace(&mut self.slots[idx], Slot::Occupied(node));
                match slot {
                    Slot::Vacant { next_free } => self.free = next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                }
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old) => {
                if let Some(old_head) = self.node_mut(old) {
                    old_head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;

        Some(idx)
    }

    /// Unlinks the node at `idx` and returns its value.
    ///
    /// Head and tail are moved past the node when it occupied either end.
    /// Returns `None` if `idx` does not refer to a live node.
    pub(crate) fn remove(&mut self, idx: usize) -> Option<T> {
        let (prev, next) = {
            let node = self.node(idx)?;
            (node.prev, node.next)
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        let slot = core::mem::replace(
            &mut self.slots[idx],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(idx);
        self.len -= 1;

        match slot {
            Slot::Occupied(node) => Some(node.val),
            Slot::Vacant { .. } => None,
        }
    }

    /// Removes every node and releases all slots.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates over `(slot, value)` pairs from head to tail.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("cap", &self.cap)
            .field("len", &self.len)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.node(idx)?;
        self.cursor = node.next;
        Some((idx, &node.val))
    }
}
