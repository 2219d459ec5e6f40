use std::fmt;

use log::{debug, trace};

use crate::contract::{self, Contract, Unchecked};
use crate::display::write_block;
use crate::error::{CollectionError, Result};
use crate::key::{key_of, HashKey, Key};
use crate::store::{self, LinkedStore};

/// Identifier of an [`LruBuffer`] instance, chosen by its owner.
///
/// Two buffers with different ids never compare equal, even with the same
/// contents. Clones keep the id of their source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bounded buffer that evicts its least recently used entry on overflow.
///
/// Entries are kept in recency order: the front holds the least recently
/// touched entry, the back the most recently touched one. Adding an entry
/// (new or already present) or updating it moves it to the back. When an
/// [`add`](LruBuffer::add) leaves the buffer holding more entries than its
/// size, exactly one entry is evicted from the front and handed back.
///
/// # Type Parameters
///
/// * `T` - The entry type. Must implement [`Key`]
/// * `C` - Declared entry contract, [`Unchecked`] by default
///
/// # Examples
///
/// ```rust
/// use identity_collections::LruBuffer;
///
/// let mut buffer = LruBuffer::new(3).unwrap();
/// for item in ["A", "B", "C"] {
///     assert_eq!(buffer.add(item).unwrap(), None);
/// }
/// buffer.update("A").unwrap();
/// assert_eq!(buffer.add("D").unwrap(), Some("B"));
/// ```
#[derive(Clone)]
pub struct LruBuffer<T, C = Unchecked> {
    id: BufferId,
    size: usize,
    store: LinkedStore<T>,
    element_type: C,
}

impl<T> LruBuffer<T> {
    /// Creates a buffer holding at most `size` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidCapacity`] if `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        Self::typed(size, Unchecked)
    }
}

impl<T, C> LruBuffer<T, C> {
    /// Creates a buffer whose entries must satisfy `element_type`.
    pub fn typed(size: usize, element_type: C) -> Result<Self> {
        validate_size(size)?;
        Ok(Self {
            id: BufferId::default(),
            size,
            store: LinkedStore::new(),
            element_type,
        })
    }

    /// Assigns the instance identifier.
    pub fn with_id(mut self, id: BufferId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Returns the configured capacity.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sets the capacity.
    ///
    /// Shrinking below the current number of entries evicts nothing right
    /// away; each subsequent [`add`](LruBuffer::add) trims one entry until
    /// the buffer is back within its size.
    pub fn set_size(&mut self, size: usize) -> Result<()> {
        validate_size(size)?;
        debug!(
            "lru buffer {}: size {} -> {} ({} entries)",
            self.id,
            self.size,
            size,
            self.store.len()
        );
        self.size = size;
        Ok(())
    }

    /// Returns the number of entries currently held.
    pub fn num_elements(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn element_type(&self) -> &C {
        &self.element_type
    }

    /// Iterates from least to most recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.store.iter(),
        }
    }
}

impl<T, C> LruBuffer<T, C>
where
    T: Key,
    C: Contract<T>,
{
    fn token(&self, element: &T) -> Result<HashKey> {
        contract::check_value(&self.element_type, element)?;
        key_of(element)
    }

    /// Adds `element` as the most recently used entry and returns the
    /// victim evicted in exchange, if any.
    ///
    /// An identity-equal entry already in the buffer is replaced by
    /// `element` and refreshed. At most one entry is evicted per call.
    pub fn add(&mut self, element: T) -> Result<Option<T>> {
        let token = self.token(&element)?;
        self.store.insert_back(token, element);

        if self.store.len() <= self.size {
            return Ok(None);
        }

        let victim = self.store.pop_front().map(|(_, victim)| victim);
        trace!(
            "lru buffer {}: evicted least recently used entry ({}/{})",
            self.id,
            self.store.len(),
            self.size
        );
        Ok(victim)
    }

    /// Moves `element` to the most recently used position.
    ///
    /// This is a pure recency bump: no eviction happens. An element that is
    /// not in the buffer yet is inserted even if that takes the buffer past
    /// its size; the next [`add`](LruBuffer::add) trims one entry.
    pub fn update(&mut self, element: T) -> Result<()> {
        let token = self.token(&element)?;
        if self.store.insert_back(token, element).is_none() && self.store.len() > self.size {
            debug!(
                "lru buffer {}: update inserted a new entry beyond size ({}/{})",
                self.id,
                self.store.len(),
                self.size
            );
        }
        Ok(())
    }

    pub fn contains(&self, element: &T) -> Result<bool> {
        let token = self.token(element)?;
        Ok(self.store.contains(&token))
    }
}

fn validate_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(CollectionError::InvalidCapacity(size));
    }
    Ok(())
}

/// Equal when id, size, contract and the recency-ordered entries match.
impl<T: PartialEq, C: PartialEq> PartialEq for LruBuffer<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.size == other.size
            && self.element_type == other.element_type
            && self.store.len() == other.store.len()
            && self
                .store
                .iter()
                .zip(other.store.iter())
                .all(|((a_key, a), (b_key, b))| a_key == b_key && a == b)
    }
}

impl<T: fmt::Debug, C: Contract<T>> fmt::Display for LruBuffer<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = contract::type_name("LruBuffer", &[self.element_type.name()]);
        write_block(
            f,
            format_args!("{name}[{}/{}]", self.store.len(), self.size),
            self.iter(),
            |f, e| write!(f, "{e:?}"),
        )
    }
}

impl<T: fmt::Debug, C> fmt::Debug for LruBuffer<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruBuffer")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("entries", &self.store)
            .finish()
    }
}

/// Iterator over the entries of an [`LruBuffer`], least recently used first.
pub struct Iter<'a, T> {
    inner: store::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, e)| e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T, C> IntoIterator for &'a LruBuffer<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
