use log::debug;

use crate::error::{ProfileError, Result};

/// Maximum number of entries a profile may hold
pub const DIM_VECTOR_KMER_FREQ: usize = 1_000_000;

/// How a [`BlockVec`] sizes its storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Capacity of a freshly created buffer
    pub initial_capacity: usize,
    /// Number of slots added each time the buffer is full
    pub block_size: usize,
    /// Hard upper bound on capacity
    pub max_capacity: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy {
            initial_capacity: 10,
            block_size: 10,
            max_capacity: DIM_VECTOR_KMER_FREQ,
        }
    }
}

impl GrowthPolicy {
    /// Capacity after one growth step from `capacity`
    pub fn next_capacity(&self, capacity: usize) -> usize {
        capacity.saturating_add(self.block_size.max(1))
    }
}

/// Growable buffer with block-wise growth and a capacity ceiling.
///
/// The logical capacity is tracked separately from the `Vec` so that growth
/// follows the policy exactly, whatever the allocator decides.
#[derive(Debug, Clone)]
pub struct BlockVec<T> {
    items: Vec<T>,
    capacity: usize,
    policy: GrowthPolicy,
}

impl<T> BlockVec<T> {
    pub fn new(policy: GrowthPolicy) -> Self {
        let capacity = policy.initial_capacity.min(policy.max_capacity);
        BlockVec {
            items: Vec::with_capacity(capacity),
            capacity,
            policy,
        }
    }

    /// Take ownership of `items`; fails if they do not fit the policy
    pub fn from_vec(items: Vec<T>, policy: GrowthPolicy) -> Result<Self> {
        if items.len() > policy.max_capacity {
            return Err(ProfileError::CapacityExceeded {
                requested: items.len(),
                max: policy.max_capacity,
            });
        }
        let mut buffer = BlockVec::new(policy);
        buffer.reallocate(items.len().max(buffer.capacity))?;
        buffer.items = items;
        Ok(buffer)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    /// Resize the storage to `new_capacity`, keeping every element in order.
    ///
    /// Nothing changes when the request exceeds the policy's maximum or
    /// would drop live elements.
    pub fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity > self.policy.max_capacity {
            return Err(ProfileError::CapacityExceeded {
                requested: new_capacity,
                max: self.policy.max_capacity,
            });
        }
        if new_capacity < self.items.len() {
            return Err(ProfileError::InvalidArgument(format!(
                "cannot shrink capacity to {} below size {}",
                new_capacity,
                self.items.len()
            )));
        }

        debug!("Reallocating k-mer storage: {} -> {}", self.capacity, new_capacity);
        let mut items = Vec::with_capacity(new_capacity);
        items.append(&mut self.items);
        self.items = items;
        self.capacity = new_capacity;
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let next = self.policy.next_capacity(self.capacity);
        self.reallocate(next)
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        if self.items.len() == self.capacity {
            self.grow()?;
        }
        self.items.push(item);
        Ok(())
    }

    /// Fold `item` into the first element `same` accepts, or push it.
    ///
    /// Returns the position the item ended up at.
    pub fn merge_or_push<S, M>(&mut self, item: T, same: S, merge: M) -> Result<usize>
    where
        S: Fn(&T, &T) -> bool,
        M: FnOnce(&mut T, T),
    {
        match self.items.iter().position(|existing| same(existing, &item)) {
            Some(pos) => {
                merge(&mut self.items[pos], item);
                Ok(pos)
            }
            None => {
                self.push(item)?;
                Ok(self.items.len() - 1)
            }
        }
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        let size = self.items.len();
        self.items
            .get(index)
            .ok_or(ProfileError::IndexOutOfRange { index, size })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let size = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(ProfileError::IndexOutOfRange { index, size })
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(ProfileError::IndexOutOfRange {
                index,
                size: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Keep only the elements matching `keep`, preserving their order
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) {
        self.items.retain(keep);
    }

    /// Drop every element and return to the initial capacity
    pub fn clear(&mut self) {
        self.items = Vec::with_capacity(self.policy.initial_capacity);
        self.capacity = self.policy.initial_capacity.min(self.policy.max_capacity);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T> Default for BlockVec<T> {
    fn default() -> Self {
        BlockVec::new(GrowthPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn small_policy(max_capacity: usize) -> GrowthPolicy {
        GrowthPolicy {
            initial_capacity: 2,
            block_size: 3,
            max_capacity,
        }
    }

    #[test]
    fn test_default_policy() {
        let buffer: BlockVec<u32> = BlockVec::default();
        assert_eq!(buffer.capacity(), 10);
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.policy().block_size, 10);
    }

    #[test]
    fn test_block_growth() {
        let mut buffer = BlockVec::new(small_policy(100));
        for i in 0..2 {
            buffer.push(i).unwrap();
        }
        assert_eq!(buffer.capacity(), 2);

        buffer.push(2).unwrap();
        assert_eq!(buffer.capacity(), 5);

        for i in 3..6 {
            buffer.push(i).unwrap();
        }
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.as_slice(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_growth_past_maximum_fails_without_mutation() {
        let mut buffer = BlockVec::new(small_policy(4));
        buffer.push(1).unwrap();
        buffer.push(2).unwrap();

        let err = buffer.push(3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(buffer.as_slice(), &[1, 2]);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_reallocate_bounds() {
        let mut buffer = BlockVec::new(small_policy(10));
        buffer.push('a').unwrap();
        assert!(buffer.reallocate(11).is_err());
        assert!(buffer.reallocate(0).is_err());

        buffer.reallocate(7).unwrap();
        assert_eq!(buffer.capacity(), 7);
        assert_eq!(buffer.as_slice(), &['a']);
    }

    #[test]
    fn test_checked_access() {
        let mut buffer = BlockVec::new(small_policy(10));
        buffer.push(5).unwrap();
        assert_eq!(*buffer.get(0).unwrap(), 5);
        *buffer.get_mut(0).unwrap() = 6;
        assert_eq!(*buffer.get(0).unwrap(), 6);

        assert_eq!(buffer.get(1).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(buffer.get_mut(7).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(buffer.remove(1).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_merge_or_push() {
        let mut buffer = BlockVec::new(small_policy(10));
        let same = |a: &(char, u32), b: &(char, u32)| a.0 == b.0;
        let merge = |a: &mut (char, u32), b: (char, u32)| a.1 += b.1;

        assert_eq!(buffer.merge_or_push(('a', 2), same, merge).unwrap(), 0);
        assert_eq!(buffer.merge_or_push(('b', 3), same, merge).unwrap(), 1);
        assert_eq!(buffer.merge_or_push(('a', 1), same, merge).unwrap(), 0);
        assert_eq!(buffer.as_slice(), &[('a', 3), ('b', 3)]);
    }

    #[test]
    fn test_from_vec_and_clear() {
        let buffer = BlockVec::from_vec(vec![1, 2, 3], small_policy(10)).unwrap();
        assert_eq!(buffer.capacity(), 3);
        assert!(BlockVec::from_vec(vec![0; 11], small_policy(10)).is_err());

        let mut buffer = BlockVec::from_vec(vec![1; 9], small_policy(10)).unwrap();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = BlockVec::new(small_policy(10));
        original.push(1).unwrap();
        let mut copy = original.clone();
        copy.push(2).unwrap();
        *copy.get_mut(0).unwrap() = 9;

        assert_eq!(original.as_slice(), &[1]);
        assert_eq!(copy.as_slice(), &[9, 2]);
    }
}
