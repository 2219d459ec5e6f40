use std::fmt;

use crate::contract::{self, Contract, Unchecked};
use crate::display::write_block;
use crate::error::Result;
use crate::key::{digest, key_of, HashKey, Key};
use crate::store::{self, LinkedStore};
use crate::traits::Set;

/// A set of identity-keyed elements, iterated in insertion order.
///
/// Two elements are the same member when their [`HashKey`]s are equal.
/// Rejected elements (by the declared contract or for lack of an identity)
/// fail with an error and leave the set untouched, including in
/// [`add_all`](HashSet::add_all).
///
/// # Examples
///
/// ```rust
/// use identity_collections::HashSet;
///
/// let mut set = HashSet::new();
/// assert!(set.add("green").unwrap());
/// assert!(!set.add("green").unwrap());
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashSet<T, C = Unchecked> {
    store: LinkedStore<T>,
    element_type: C,
}

impl<T> HashSet<T> {
    pub fn new() -> Self {
        Self::typed(Unchecked)
    }
}

impl<T> Default for HashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> HashSet<T, C> {
    /// Creates a set whose elements must satisfy `element_type`.
    pub fn typed(element_type: C) -> Self {
        Self {
            store: LinkedStore::new(),
            element_type,
        }
    }

    pub fn element_type(&self) -> &C {
        &self.element_type
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Returns the elements in insertion order.
    pub fn to_vec(&self) -> Vec<&T> {
        self.iter().collect()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.store.iter(),
        }
    }

    /// Digest of the element tokens. Insertion order does not matter, so
    /// equal sets have equal hash codes.
    pub fn hash_code(&self) -> u128 {
        let mut tokens: Vec<&[u8]> = self.store.iter().map(|(token, _)| token.as_bytes()).collect();
        tokens.sort_unstable();
        digest(tokens)
    }
}

impl<T, C> HashSet<T, C>
where
    T: Key,
    C: Contract<T>,
{
    fn token(&self, element: &T) -> Result<HashKey> {
        contract::check_value(&self.element_type, element)?;
        key_of(element)
    }

    /// Adds `element`, returning `true` if it was not already present.
    pub fn add(&mut self, element: T) -> Result<bool> {
        let token = self.token(&element)?;
        if self.store.contains(&token) {
            return Ok(false);
        }
        self.store.insert(token, element);
        Ok(true)
    }

    /// Adds every element, returning `true` if at least one was new.
    ///
    /// All elements are validated and keyed before the first insertion, so
    /// a rejected element leaves the set exactly as it was.
    pub fn add_all<I>(&mut self, elements: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        let staged = elements
            .into_iter()
            .map(|element| Ok((self.token(&element)?, element)))
            .collect::<Result<Vec<_>>>()?;

        let mut changed = false;
        for (token, element) in staged {
            if !self.store.contains(&token) {
                self.store.insert(token, element);
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Removes `element`, returning `true` if it was present.
    pub fn remove(&mut self, element: &T) -> Result<bool> {
        let token = self.token(element)?;
        Ok(self.store.remove(&token).is_some())
    }

    pub fn contains(&self, element: &T) -> Result<bool> {
        let token = self.token(element)?;
        Ok(self.store.contains(&token))
    }
}

/// Equal when both sets declare the same contract and hold the same
/// tokens, regardless of order.
impl<T, C: PartialEq> PartialEq for HashSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type
            && self.len() == other.len()
            && self.store.iter().all(|(token, _)| other.store.contains(token))
    }
}

impl<T: fmt::Debug, C: Contract<T>> fmt::Display for HashSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = contract::type_name("HashSet", &[self.element_type.name()]);
        write_block(f, format_args!("{name}[{}]", self.len()), self.iter(), |f, e| {
            write!(f, "{e:?}")
        })
    }
}

impl<T: fmt::Debug, C> fmt::Debug for HashSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> Set<T> for HashSet<T, C>
where
    T: Key,
    C: Contract<T>,
{
    fn add(&mut self, element: T) -> Result<bool> {
        self.add(element)
    }

    fn add_all<I>(&mut self, elements: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        self.add_all(elements)
    }

    fn remove(&mut self, element: &T) -> Result<bool> {
        self.remove(element)
    }

    fn contains(&self, element: &T) -> Result<bool> {
        self.contains(element)
    }

    fn to_vec(&self) -> Vec<&T> {
        self.to_vec()
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

/// Iterator over the elements of a [`HashSet`], in insertion order.
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

impl<'a, T, C> IntoIterator for &'a HashSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
