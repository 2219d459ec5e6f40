use std::fmt;

use crate::contract::{self, Contract, Unchecked};
use crate::display::write_block;
use crate::error::Result;
use crate::key::{digest, key_of, HashKey, Key};
use crate::store::{self, LinkedStore};
use crate::traits::Map;

/// A map from identity-keyed keys to values, iterated in insertion order.
///
/// Entries are located by the [`HashKey`] of their key. Re-putting a key
/// replaces the value in place; removing and re-putting it moves the entry
/// to the end of iteration order.
///
/// # Type Parameters
///
/// * `K` - The key type. Must implement [`Key`]
/// * `V` - The value type
/// * `KC`, `VC` - Declared key and value contracts, [`Unchecked`] by default
///
/// # Examples
///
/// ```rust
/// use identity_collections::HashTable;
///
/// let mut table = HashTable::new();
/// table.put(vec![1, 2], "three").unwrap();
/// assert_eq!(table.get(&vec![1, 2]).unwrap(), Some(&"three"));
/// assert_eq!(table.get(&vec![2, 1]).unwrap(), None);
/// ```
#[derive(Clone)]
pub struct HashTable<K, V, KC = Unchecked, VC = Unchecked> {
    store: LinkedStore<(K, V)>,
    key_type: KC,
    value_type: VC,
}

impl<K, V> HashTable<K, V> {
    pub fn new() -> Self {
        Self::typed(Unchecked, Unchecked)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: LinkedStore::with_capacity(capacity),
            key_type: Unchecked,
            value_type: Unchecked,
        }
    }
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, KC, VC> HashTable<K, V, KC, VC> {
    /// Creates a map that validates keys against `key_type` and values
    /// against `value_type`.
    pub fn typed(key_type: KC, value_type: VC) -> Self {
        Self {
            store: LinkedStore::new(),
            key_type,
            value_type,
        }
    }

    pub fn key_type(&self) -> &KC {
        &self.key_type
    }

    pub fn value_type(&self) -> &VC {
        &self.value_type
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Removes all entries from the map.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.store.iter(),
        }
    }
}

impl<K, V, KC, VC> HashTable<K, V, KC, VC>
where
    K: Key,
    KC: Contract<K>,
    VC: Contract<V>,
{
    fn token(&self, key: &K) -> Result<HashKey> {
        contract::check_key(&self.key_type, key)?;
        key_of(key)
    }

    /// Associates `value` with `key`, returning the previous value.
    ///
    /// Both arguments are validated before the map is modified.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        let token = self.token(&key)?;
        contract::check_value(&self.value_type, &value)?;
        Ok(self.store.insert(token, (key, value)).map(|(_, v)| v))
    }

    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        let token = self.token(key)?;
        Ok(self.store.get(&token).map(|(_, v)| v))
    }

    pub fn contains_key(&self, key: &K) -> Result<bool> {
        let token = self.token(key)?;
        Ok(self.store.contains(&token))
    }

    /// Removes the entry for `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        let token = self.token(key)?;
        Ok(self.store.remove(&token).map(|(_, v)| v))
    }
}

impl<K, V: PartialEq, KC, VC> HashTable<K, V, KC, VC> {
    /// Returns true if any entry holds a value equal to `value`.
    pub fn contains_value(&self, value: &V) -> bool {
        self.iter().any(|(_, v)| v == value)
    }
}

impl<K, V: Key, KC, VC> HashTable<K, V, KC, VC> {
    /// Digest of the key tokens and value tokens. Entries are digested in
    /// key token order, so equal maps have equal hash codes.
    pub fn hash_code(&self) -> Result<u128> {
        let mut entries = self
            .store
            .iter()
            .map(|(token, (_, v))| Ok((token, key_of(v)?)))
            .collect::<Result<Vec<_>>>()?;
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        Ok(digest(
            entries
                .iter()
                .flat_map(|(token, value)| [token.as_bytes(), value.as_bytes()]),
        ))
    }
}

/// Equal when both maps declare the same contracts and map the same tokens
/// to equal values. Key objects and order do not take part.
impl<K, V, KC, VC> PartialEq for HashTable<K, V, KC, VC>
where
    V: PartialEq,
    KC: PartialEq,
    VC: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.key_type == other.key_type
            && self.value_type == other.value_type
            && self.len() == other.len()
            && self
                .store
                .iter()
                .all(|(token, (_, v))| other.store.get(token).is_some_and(|(_, w)| v == w))
    }
}

impl<K, V, KC, VC> fmt::Display for HashTable<K, V, KC, VC>
where
    K: fmt::Debug,
    V: fmt::Debug,
    KC: Contract<K>,
    VC: Contract<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = contract::type_name(
            "HashTable",
            &[self.key_type.name(), self.value_type.name()],
        );
        write_block(f, format_args!("{name}[{}]", self.len()), self.iter(), |f, (k, v)| {
            write!(f, "{k:?} => {v:?}")
        })
    }
}

impl<K: fmt::Debug, V: fmt::Debug, KC, VC> fmt::Debug for HashTable<K, V, KC, VC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, KC, VC> Map<K, V> for HashTable<K, V, KC, VC>
where
    K: Key,
    KC: Contract<K>,
    VC: Contract<V>,
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.put(key, value)
    }

    fn get(&self, key: &K) -> Result<Option<&V>> {
        self.get(key)
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>> {
        self.remove(key)
    }

    fn contains_key(&self, key: &K) -> Result<bool> {
        self.contains_key(key)
    }

    fn keys(&self) -> Vec<&K> {
        self.keys()
    }

    fn values(&self) -> Vec<&V> {
        self.values()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn clear(&mut self) {
        self.clear()
    }
}

/// Iterator over the entries of a [`HashTable`], in insertion order.
pub struct Iter<'a, K, V> {
    inner: store::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, (k, v))| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, KC, VC> IntoIterator for &'a HashTable<K, V, KC, VC> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
