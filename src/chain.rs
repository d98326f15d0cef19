//! Chain: the per-bucket singly linked list.
//!
//! Nodes live in a table-wide generational arena (`SlotMap`) and a `Chain`
//! only records the keys of its first and last node plus its length. Moving
//! an entry between chains relinks arena keys; the node itself never moves,
//! so a value keeps its storage slot for as long as it is in the table.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena key of one stored entry.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Node<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
    next: Option<EntryKey>,
}

impl<V> Node<V> {
    pub(crate) fn new(key: Box<[u8]>, value: V) -> Self {
        Node {
            key,
            value,
            next: None,
        }
    }

    pub(crate) fn into_parts(self) -> (Box<[u8]>, V) {
        (self.key, self.value)
    }
}

pub(crate) type Arena<V> = SlotMap<EntryKey, Node<V>>;

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Chain {
    head: Option<EntryKey>,
    tail: Option<EntryKey>,
    len: usize,
}

impl Chain {
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    // The table only appends; front insertion is part of the list contract
    // and covered by the tests below.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn push_front<V>(&mut self, arena: &mut Arena<V>, k: EntryKey) {
        arena[k].next = self.head;
        self.head = Some(k);
        if self.tail.is_none() {
            self.tail = Some(k);
        }
        self.len += 1;
    }

    pub(crate) fn push_back<V>(&mut self, arena: &mut Arena<V>, k: EntryKey) {
        arena[k].next = None;
        match self.tail {
            Some(t) => arena[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        self.len += 1;
    }

    pub(crate) fn pop_front<V>(&mut self, arena: &mut Arena<V>) -> Option<EntryKey> {
        let k = self.head?;
        self.head = arena[k].next.take();
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(k)
    }

    pub(crate) fn cursor(&self) -> ChainCursor {
        ChainCursor {
            prev: None,
            current: self.head,
        }
    }

    /// Positions a cursor on the entry whose key equals `key` byte for byte.
    pub(crate) fn find<V>(&self, arena: &Arena<V>, key: &[u8]) -> Option<ChainCursor> {
        let mut cursor = self.cursor();
        while let Some(k) = cursor.current() {
            if *arena[k].key == *key {
                return Some(cursor);
            }
            cursor.advance(arena);
        }
        None
    }
}

/// Position inside one chain. Holds only arena keys, so it does not borrow
/// the chain; every call passes the chain and arena it was created from.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ChainCursor {
    prev: Option<EntryKey>,
    current: Option<EntryKey>,
}

impl ChainCursor {
    pub(crate) fn current(&self) -> Option<EntryKey> {
        self.current
    }

    pub(crate) fn at_end(&self) -> bool {
        self.current.is_none()
    }

    pub(crate) fn advance<V>(&mut self, arena: &Arena<V>) -> bool {
        match self.current {
            Some(k) => {
                self.prev = Some(k);
                self.current = arena[k].next;
                true
            }
            None => false,
        }
    }

    /// Unlinks the current entry from `chain` and moves the cursor to the
    /// entry that followed it. The node stays in the arena.
    pub(crate) fn unlink<V>(&mut self, chain: &mut Chain, arena: &mut Arena<V>) -> Option<EntryKey> {
        let k = self.current?;
        let next = arena[k].next.take();
        match self.prev {
            Some(p) => arena[p].next = next,
            None => chain.head = next,
        }
        if chain.tail == Some(k) {
            chain.tail = self.prev;
        }
        chain.len -= 1;
        self.current = next;
        Some(k)
    }
}
