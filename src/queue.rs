use std::collections::VecDeque;
use std::fmt;

use crate::contract::{self, Contract, Unchecked};
use crate::display::write_block;
use crate::error::{CollectionError, Result};
use crate::key::{digest, key_of, Key};

/// A first-in, first-out queue.
///
/// Position `0` is the head, the element [`get`](Queue::get) returns next.
#[derive(Clone)]
pub struct Queue<T, C = Unchecked> {
    elements: VecDeque<T>,
    element_type: C,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::typed(Unchecked)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Queue<T, C> {
    pub fn typed(element_type: C) -> Self {
        Self {
            elements: VecDeque::new(),
            element_type,
        }
    }

    pub fn element_type(&self) -> &C {
        &self.element_type
    }

    /// Removes and returns the head.
    ///
    /// # Errors
    ///
    /// [`CollectionError::EmptyContainer`] if the queue is empty.
    pub fn get(&mut self) -> Result<T> {
        self.elements
            .pop_front()
            .ok_or(CollectionError::EmptyContainer("Queue"))
    }

    /// Returns the head without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.elements.front()
    }

    pub fn element_at(&self, index: usize) -> Result<&T> {
        let len = self.elements.len();
        self.elements
            .get(index)
            .ok_or(CollectionError::IndexOutOfRange { index, len })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T, C: Contract<T>> Queue<T, C> {
    /// Appends `element` at the tail.
    pub fn put(&mut self, element: T) -> Result<()> {
        contract::check_value(&self.element_type, &element)?;
        self.elements.push_back(element);
        Ok(())
    }
}

impl<T: PartialEq, C> Queue<T, C> {
    /// Returns the position of the first element equal to `element`.
    pub fn search(&self, element: &T) -> Option<usize> {
        self.elements.iter().position(|e| e == element)
    }

    /// Removes the first element equal to `element`, returning whether one
    /// was found. The order of the remaining elements is kept.
    pub fn remove(&mut self, element: &T) -> bool {
        match self.search(element) {
            Some(pos) => self.elements.remove(pos).is_some(),
            None => false,
        }
    }
}

impl<T: Key, C> Queue<T, C> {
    /// Digest of the element identities, head first.
    pub fn hash_code(&self) -> Result<u128> {
        let tokens = self.iter().map(key_of).collect::<Result<Vec<_>>>()?;
        Ok(digest(tokens.iter().map(|token| token.as_bytes())))
    }
}

impl<T: PartialEq, C: PartialEq> PartialEq for Queue<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type && self.elements == other.elements
    }
}

impl<T: fmt::Debug, C: Contract<T>> fmt::Display for Queue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = contract::type_name("Queue", &[self.element_type.name()]);
        write_block(
            f,
            format_args!("{name}[{}]", self.elements.len()),
            &self.elements,
            |f, e| write!(f, "{e:?}"),
        )
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Queue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.elements).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a Queue<T, C> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
