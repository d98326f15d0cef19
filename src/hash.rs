//! Bucket hashing: Jenkins one-at-a-time reduced modulo the bucket count.

use core::num::NonZeroUsize;

/// Maps key bytes to a 32-bit hash. The table reduces it to a bucket index
/// with [`bucket_index`], so implementations never see the capacity.
pub trait BucketHasher {
    fn hash_bytes(&self, key: &[u8]) -> u32;
}

/// Default hasher for [`HashTable`](crate::HashTable).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OneAtATime;

impl BucketHasher for OneAtATime {
    #[inline]
    fn hash_bytes(&self, key: &[u8]) -> u32 {
        one_at_a_time(key)
    }
}

/// Jenkins one-at-a-time hash with 32-bit wrapping arithmetic.
pub fn one_at_a_time(key: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &b in key {
        h = h.wrapping_add(u32::from(b));
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
    }
    h = h.wrapping_add(h << 3);
    h ^= h >> 11;
    h.wrapping_add(h << 15)
}

/// Bucket for `key` in a table of `capacity` buckets; always `< capacity`.
///
/// The result depends on `capacity`, so it has to be recomputed for every
/// entry whenever the table is resized.
#[inline]
pub fn bucket_index<H: BucketHasher + ?Sized>(
    hasher: &H,
    key: &[u8],
    capacity: NonZeroUsize,
) -> usize {
    hasher.hash_bytes(key) as usize % capacity.get()
}
