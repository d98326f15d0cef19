//! External iteration in bucket order.
//!
//! Both iterators hold a bucket index and a cursor into that bucket's chain.
//! When the chain is exhausted they scan forward for the next non-empty
//! bucket, skipping any number of empty ones. Order is bucket index
//! ascending, then chain order (oldest first) inside a bucket.
//!
//! `Iter` borrows the table shared and `CursorMut` borrows it exclusively,
//! so the table cannot be resized or dropped while either is alive.

use crate::chain::{Arena, Chain, ChainCursor, EntryKey};
use crate::hash::OneAtATime;
use crate::table::HashTable;
use core::iter::FusedIterator;

#[derive(Copy, Clone, Debug)]
enum State {
    Positioned { bucket: usize, cursor: ChainCursor },
    End,
}

impl State {
    /// First non-empty bucket at or after `from`.
    fn seek(buckets: &[Chain], from: usize) -> State {
        buckets
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, chain)| !chain.is_empty())
            .map_or(State::End, |(bucket, chain)| State::Positioned {
                bucket,
                cursor: chain.cursor(),
            })
    }

    /// Re-establishes "positioned on a live entry" after the cursor moved.
    fn settle(self, buckets: &[Chain]) -> State {
        match self {
            State::Positioned { bucket, cursor } if cursor.at_end() => {
                State::seek(buckets, bucket + 1)
            }
            other => other,
        }
    }

    fn advance<V>(self, buckets: &[Chain], arena: &Arena<V>) -> State {
        match self {
            State::Positioned { bucket, mut cursor } => {
                cursor.advance(arena);
                State::Positioned { bucket, cursor }.settle(buckets)
            }
            State::End => State::End,
        }
    }

    fn entry(&self) -> Option<EntryKey> {
        match self {
            State::Positioned { cursor, .. } => cursor.current(),
            State::End => None,
        }
    }

    fn position(&self, capacity: usize) -> usize {
        match self {
            State::Positioned { bucket, .. } => *bucket,
            State::End => capacity,
        }
    }
}

/// Shared iterator over a [`HashTable`].
///
/// Usable as a plain [`Iterator`] over `(key, value)` pairs or driven by hand
/// with [`at_end`](Iter::at_end), [`current_key`](Iter::current_key) and
/// [`advance`](Iter::advance).
pub struct Iter<'a, V, H = OneAtATime> {
    table: &'a HashTable<V, H>,
    state: State,
}

impl<'a, V, H> Iter<'a, V, H> {
    pub(crate) fn new(table: &'a HashTable<V, H>) -> Self {
        Iter {
            table,
            state: State::seek(&table.buckets, 0),
        }
    }

    pub fn at_end(&self) -> bool {
        matches!(self.state, State::End)
    }

    /// Bucket the iterator is in; equals the table capacity once at end.
    pub fn position(&self) -> usize {
        self.state.position(self.table.capacity())
    }

    /// Moves to the next entry. Returns `false` if there is none, including
    /// when the iterator was already at end.
    pub fn advance(&mut self) -> bool {
        self.state = self.state.advance(&self.table.buckets, &self.table.slots);
        !self.at_end()
    }

    pub fn current_key(&self) -> Option<&'a [u8]> {
        let table = self.table;
        let k = self.state.entry()?;
        Some(&table.slots[k].key[..])
    }

    pub fn current_value(&self) -> Option<&'a V> {
        let table = self.table;
        let k = self.state.entry()?;
        Some(&table.slots[k].value)
    }
}

impl<'a, V, H> Iterator for Iter<'a, V, H> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        let node = &table.slots[self.state.entry()?];
        self.advance();
        Some((&node.key[..], &node.value))
    }
}

impl<V, H> FusedIterator for Iter<'_, V, H> {}

/// Exclusive cursor over a [`HashTable`] that can delete as it walks.
///
/// Removing through the cursor never resizes the table; the next
/// [`HashTable::remove`] applies any pending shrink.
pub struct CursorMut<'a, V, H = OneAtATime> {
    table: &'a mut HashTable<V, H>,
    state: State,
}

impl<'a, V, H> CursorMut<'a, V, H> {
    pub(crate) fn new(table: &'a mut HashTable<V, H>) -> Self {
        let state = State::seek(&table.buckets, 0);
        CursorMut { table, state }
    }

    pub fn at_end(&self) -> bool {
        matches!(self.state, State::End)
    }

    pub fn position(&self) -> usize {
        self.state.position(self.table.capacity())
    }

    pub fn advance(&mut self) -> bool {
        self.state = self.state.advance(&self.table.buckets, &self.table.slots);
        !self.at_end()
    }

    pub fn current_key(&self) -> Option<&[u8]> {
        let k = self.state.entry()?;
        Some(&self.table.slots[k].key[..])
    }

    pub fn current_value_mut(&mut self) -> Option<&mut V> {
        let k = self.state.entry()?;
        Some(&mut self.table.slots[k].value)
    }

    /// Takes the current entry out of the table and moves to the entry after
    /// it, possibly in a later bucket.
    pub fn remove_current(&mut self) -> Option<(Box<[u8]>, V)> {
        let State::Positioned { bucket, mut cursor } = self.state else {
            return None;
        };
        let table = &mut *self.table;
        let k = cursor.unlink(&mut table.buckets[bucket], &mut table.slots)?;
        self.state = State::Positioned { bucket, cursor }.settle(&table.buckets);
        table.slots.remove(k).map(|node| node.into_parts())
    }
}
