use crate::error::Result;

/// The core trait that defines the behavior of an identity-keyed map.
///
/// Keys are located by their identity token, not by `Eq`: two keys with the
/// same token address the same entry. Every operation that takes a key
/// validates it against the map's key contract first and fails without side
/// effects if it is rejected.
///
/// # Type Parameters
///
/// * `K` - The type of keys used in the map
/// * `V` - The type of values stored in the map
pub trait Map<K, V> {
    /// Associates `value` with `key`.
    ///
    /// If the map already contains the key, the value is replaced in place
    /// and the entry keeps its position in iteration order.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `Ok(Some(V))` if the key already existed (returns the old value)
    /// * `Ok(None)` if the key didn't exist
    /// * `Err(_)` if the key or value was rejected
    fn put(&mut self, key: K, value: V) -> Result<Option<V>>;

    /// Retrieves a value by its key. Does not affect ordering.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(&V))` if the key exists
    /// * `Ok(None)` if the key doesn't exist
    fn get(&self, key: &K) -> Result<Option<&V>>;

    /// Removes an entry by its key.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(V))` if the key existed (returns the removed value)
    /// * `Ok(None)` if the key didn't exist
    fn remove(&mut self, key: &K) -> Result<Option<V>>;

    /// Returns true if the map contains an entry for `key`.
    fn contains_key(&self, key: &K) -> Result<bool>;

    /// Returns the keys in iteration order.
    fn keys(&self) -> Vec<&K>;

    /// Returns the values in iteration order.
    fn values(&self) -> Vec<&V>;

    /// Returns the number of entries in the map.
    fn len(&self) -> usize;

    /// Returns true if the map is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries from the map.
    fn clear(&mut self);
}

/// The core trait that defines the behavior of an identity-keyed set.
///
/// # Type Parameters
///
/// * `T` - The type of elements stored in the set
pub trait Set<T> {
    /// Adds an element.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the element was newly inserted
    /// * `Ok(false)` if an identity-equal element was already present
    fn add(&mut self, element: T) -> Result<bool>;

    /// Adds every element of `elements`, atomically.
    ///
    /// Either all elements are accepted, or the set is left unchanged and
    /// the first rejection is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if at least one element was newly inserted
    fn add_all<I>(&mut self, elements: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
        Self: Sized;

    /// Removes an element, returning whether it was present.
    fn remove(&mut self, element: &T) -> Result<bool>;

    /// Returns true if an identity-equal element is present.
    fn contains(&self, element: &T) -> Result<bool>;

    /// Returns the elements in iteration order.
    fn to_vec(&self) -> Vec<&T>;

    /// Returns the number of elements in the set.
    fn len(&self) -> usize;

    /// Returns true if the set is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all elements from the set.
    fn clear(&mut self);
}
