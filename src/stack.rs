use std::fmt;

use crate::contract::{self, Contract, Unchecked};
use crate::display::write_block;
use crate::error::{CollectionError, Result};
use crate::key::{digest, key_of, Key};

/// A last-in, first-out stack.
///
/// Positions are counted from the top: position `0` is the element
/// [`peek`](Stack::peek) returns.
///
/// # Examples
///
/// ```rust
/// use identity_collections::Stack;
///
/// let mut stack = Stack::new();
/// stack.push("a").unwrap();
/// stack.push("b").unwrap();
/// assert_eq!(stack.search(&"a"), Some(1));
/// assert_eq!(stack.pop().unwrap(), "b");
/// ```
#[derive(Clone)]
pub struct Stack<T, C = Unchecked> {
    // top is the last element
    elements: Vec<T>,
    element_type: C,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self::typed(Unchecked)
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Stack<T, C> {
    pub fn typed(element_type: C) -> Self {
        Self {
            elements: Vec::new(),
            element_type,
        }
    }

    pub fn element_type(&self) -> &C {
        &self.element_type
    }

    /// Removes and returns the top element.
    ///
    /// # Errors
    ///
    /// [`CollectionError::EmptyContainer`] if the stack is empty.
    pub fn pop(&mut self) -> Result<T> {
        self.elements
            .pop()
            .ok_or(CollectionError::EmptyContainer("Stack"))
    }

    /// Returns the top element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.elements.last()
    }

    /// Returns the element at `index` positions below the top.
    pub fn element_at(&self, index: usize) -> Result<&T> {
        let len = self.elements.len();
        if index >= len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
        Ok(&self.elements[len - 1 - index])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates from the top down.
    pub fn iter(&self) -> std::iter::Rev<std::slice::Iter<'_, T>> {
        self.elements.iter().rev()
    }
}

impl<T, C: Contract<T>> Stack<T, C> {
    /// Pushes `element` onto the top.
    pub fn push(&mut self, element: T) -> Result<()> {
        contract::check_value(&self.element_type, &element)?;
        self.elements.push(element);
        Ok(())
    }
}

impl<T: PartialEq, C> Stack<T, C> {
    /// Returns the position of the topmost element equal to `element`.
    pub fn search(&self, element: &T) -> Option<usize> {
        self.iter().position(|e| e == element)
    }
}

impl<T: Key, C> Stack<T, C> {
    /// Digest of the element identities, from the top down.
    pub fn hash_code(&self) -> Result<u128> {
        let tokens = self.iter().map(key_of).collect::<Result<Vec<_>>>()?;
        Ok(digest(tokens.iter().map(|token| token.as_bytes())))
    }
}

impl<T: PartialEq, C: PartialEq> PartialEq for Stack<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type && self.elements == other.elements
    }
}

impl<T: fmt::Debug, C: Contract<T>> fmt::Display for Stack<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = contract::type_name("Stack", &[self.element_type.name()]);
        write_block(
            f,
            format_args!("{name}[{}]", self.elements.len()),
            self.iter(),
            |f, e| write!(f, "{e:?}"),
        )
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Stack<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a Stack<T, C> {
    type Item = &'a T;
    type IntoIter = std::iter::Rev<std::slice::Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
