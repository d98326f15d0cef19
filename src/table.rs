//! HashTable: bucket array of chains, the operations on it and resizing.

use crate::chain::{Arena, Chain, EntryKey, Node};
use crate::error::TableError;
use crate::hash::{bucket_index, BucketHasher, OneAtATime};
use crate::iter::{CursorMut, Iter};
use core::fmt;
use core::mem;
use core::num::NonZeroUsize;
use log::{debug, trace, warn};

/// Smallest bucket count a table is created with or shrinks to.
pub const MIN_CAPACITY: usize = 8;

/// Growth threshold: an insert of a new key doubles the bucket count once
/// `len > MAX_LOAD * capacity`.
pub const MAX_LOAD: usize = 2;

/// Shrink threshold: a remove halves the bucket count once
/// `len * MIN_LOAD_DIVISOR < capacity` (load below 0.5).
pub const MIN_LOAD_DIVISOR: usize = 2;

const fn nonzero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("bucket count must be non-zero"),
    }
}

const DEFAULT_CAPACITY: NonZeroUsize = nonzero(MIN_CAPACITY);
const GROWTH: NonZeroUsize = nonzero(2);

type Destructor<V> = Box<dyn FnMut(V)>;

/// Separate-chaining hash table keyed by byte strings.
///
/// Keys are copied into the table on insert and compared by content. Values
/// are owned by the table until they are handed back by [`remove`], by an
/// overwriting [`insert`], or passed to the destructor when the table drops.
///
/// [`remove`]: HashTable::remove
/// [`insert`]: HashTable::insert
pub struct HashTable<V, H = OneAtATime> {
    pub(crate) buckets: Vec<Chain>,
    pub(crate) slots: Arena<V>,
    capacity: NonZeroUsize,
    min_capacity: NonZeroUsize,
    hasher: H,
    destructor: Option<Destructor<V>>,
}

impl<V> HashTable<V> {
    pub fn new() -> Self {
        Self::with_hasher(OneAtATime)
    }

    /// Creates a table that passes every value still stored at drop time to
    /// `destructor`.
    pub fn with_destructor<F>(destructor: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        let mut table = Self::new();
        table.destructor = Some(Box::new(destructor));
        table
    }

    pub fn builder() -> HashTableBuilder<V> {
        HashTableBuilder::new()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_buckets(capacity: NonZeroUsize) -> Result<Vec<Chain>, TableError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity.get())
        .map_err(|source| TableError::BucketArray {
            capacity: capacity.get(),
            source,
        })?;
    buckets.resize(capacity.get(), Chain::default());
    Ok(buckets)
}

fn copy_key(key: &[u8]) -> Result<Box<[u8]>, TableError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(key.len())
        .map_err(|source| TableError::Key {
            len: key.len(),
            source,
        })?;
    buf.extend_from_slice(key);
    Ok(buf.into_boxed_slice())
}

// Accessors that never hash.
impl<V, H> HashTable<V, H> {
    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity.get() as f64
    }

    /// External iterator positioned at the first entry in bucket order.
    pub fn iter(&self) -> Iter<'_, V, H> {
        Iter::new(self)
    }

    /// Like [`iter`](Self::iter) but able to remove the entry it points at.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, V, H> {
        CursorMut::new(self)
    }

    /// Calls `f` on each entry in bucket order until it returns `false`.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &V) -> bool,
    {
        for (key, value) in self.iter() {
            if !f(key, value) {
                break;
            }
        }
    }
}

impl<V, H> HashTable<V, H>
where
    H: BucketHasher,
{
    pub fn with_hasher(hasher: H) -> Self {
        trace!("creating hash table with {} buckets", MIN_CAPACITY);
        Self {
            buckets: vec![Chain::default(); MIN_CAPACITY],
            slots: Arena::with_key(),
            capacity: DEFAULT_CAPACITY,
            min_capacity: DEFAULT_CAPACITY,
            hasher,
            destructor: None,
        }
    }

    fn bucket_of(&self, key: &[u8]) -> usize {
        bucket_index(&self.hasher, key, self.capacity)
    }

    fn locate(&self, key: &[u8]) -> Option<EntryKey> {
        self.buckets[self.bucket_of(key)]
            .find(&self.slots, key)
            .and_then(|cursor| cursor.current())
    }

    /// Stores `value` under `key`.
    ///
    /// If the key is already present its value is replaced in place and the
    /// previous value is returned; the destructor is not called for it. A new
    /// key is appended to the tail of its bucket's chain, growing the bucket
    /// array first when the load is above [`MAX_LOAD`]. On error nothing has
    /// changed.
    pub fn insert<K>(&mut self, key: &K, value: V) -> Result<Option<V>, TableError>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        if let Some(k) = self.locate(key) {
            return Ok(Some(mem::replace(&mut self.slots[k].value, value)));
        }

        let key = copy_key(key).inspect_err(|e| warn!("insert aborted: {e}"))?;
        if self.len() > self.capacity.get().saturating_mul(MAX_LOAD) {
            self.resize(self.capacity.saturating_mul(GROWTH))?;
        }

        let bucket = self.bucket_of(&key);
        let k = self.slots.insert(Node::new(key, value));
        self.buckets[bucket].push_back(&mut self.slots, k);
        Ok(None)
    }

    /// Removes `key` and hands its value back to the caller.
    ///
    /// Before searching, the bucket array is halved (never below the initial
    /// capacity) when the load is under 0.5. `Ok(None)` means the key was
    /// absent. If that shrink cannot allocate, nothing is removed.
    pub fn remove<K>(&mut self, key: &K) -> Result<Option<V>, TableError>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        if self.capacity > self.min_capacity
            && self.len().saturating_mul(MIN_LOAD_DIVISOR) < self.capacity.get()
        {
            let half = NonZeroUsize::new(self.capacity.get() / 2)
                .map_or(self.min_capacity, |n| n.max(self.min_capacity));
            self.resize(half)?;
        }

        let bucket = self.bucket_of(key);
        let chain = &mut self.buckets[bucket];
        let Some(mut cursor) = chain.find(&self.slots, key) else {
            return Ok(None);
        };
        Ok(cursor
            .unlink(chain, &mut self.slots)
            .and_then(|k| self.slots.remove(k))
            .map(|node| node.value))
    }

    pub fn get<K>(&self, key: &K) -> Option<&V>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.locate(key.as_ref()).map(|k| &self.slots[k].value)
    }

    pub fn get_mut<K>(&mut self, key: &K) -> Option<&mut V>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let k = self.locate(key.as_ref())?;
        Some(&mut self.slots[k].value)
    }

    pub fn contains<K>(&self, key: &K) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.locate(key.as_ref()).is_some()
    }

    /// Rebuilds the bucket array with `new_capacity` chains.
    ///
    /// The new array is allocated before anything moves. Entries are then
    /// relinked one by one from the front of each old chain to the back of
    /// their new chain; nodes keep their arena slot.
    fn resize(&mut self, new_capacity: NonZeroUsize) -> Result<(), TableError> {
        let mut buckets =
            empty_buckets(new_capacity).inspect_err(|e| warn!("resize aborted: {e}"))?;
        debug!(
            "resizing hash table from {} to {} buckets ({} entries, longest chain {})",
            self.capacity,
            new_capacity,
            self.len(),
            self.buckets.iter().map(Chain::len).max().unwrap_or(0)
        );

        for chain in &mut self.buckets {
            while let Some(k) = chain.pop_front(&mut self.slots) {
                let bucket = bucket_index(&self.hasher, &self.slots[k].key, new_capacity);
                buckets[bucket].push_back(&mut self.slots, k);
            }
        }

        self.buckets = buckets;
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<V, H> Drop for HashTable<V, H> {
    fn drop(&mut self) {
        if let Some(destructor) = self.destructor.as_mut() {
            for (_, node) in self.slots.drain() {
                destructor(node.value);
            }
        }
    }
}

impl<V: fmt::Debug, H> fmt::Debug for HashTable<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (String::from_utf8_lossy(k), v)))
            .finish()
    }
}

impl<'a, V, H> IntoIterator for &'a HashTable<V, H> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Construction-time configuration for [`HashTable`].
pub struct HashTableBuilder<V, H = OneAtATime> {
    initial_capacity: usize,
    hasher: H,
    destructor: Option<Destructor<V>>,
}

impl<V> HashTableBuilder<V> {
    pub fn new() -> Self {
        HashTableBuilder {
            initial_capacity: MIN_CAPACITY,
            hasher: OneAtATime,
            destructor: None,
        }
    }
}

impl<V> Default for HashTableBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H> HashTableBuilder<V, H>
where
    H: BucketHasher,
{
    /// Starting bucket count, raised to [`MIN_CAPACITY`] if smaller. The
    /// table never shrinks below it.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn hasher<H2: BucketHasher>(self, hasher: H2) -> HashTableBuilder<V, H2> {
        HashTableBuilder {
            initial_capacity: self.initial_capacity,
            hasher,
            destructor: self.destructor,
        }
    }

    pub fn destructor<F>(mut self, destructor: F) -> Self
    where
        F: FnMut(V) + 'static,
    {
        self.destructor = Some(Box::new(destructor));
        self
    }

    pub fn build(self) -> Result<HashTable<V, H>, TableError> {
        let capacity = NonZeroUsize::new(self.initial_capacity)
            .map_or(DEFAULT_CAPACITY, |n| n.max(DEFAULT_CAPACITY));
        let buckets = empty_buckets(capacity)?;
        trace!("creating hash table with {} buckets", capacity);
        Ok(HashTable {
            buckets,
            slots: Arena::with_key(),
            capacity,
            min_capacity: capacity,
            hasher: self.hasher,
            destructor: self.destructor,
        })
    }
}
