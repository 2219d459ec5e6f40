use std::fmt;

use crate::contract::{self, Contract, Unchecked};
use crate::display::write_block;
use crate::error::{CollectionError, Result};
use crate::key::{digest, key_of, Key};

/// A growable list with positional access.
///
/// Unlike the hash containers, `Vector` locates elements by value equality
/// (`PartialEq`), so it holds values that have no identity at all.
///
/// # Type Parameters
///
/// * `T` - The element type
/// * `C` - Declared element contract, [`Unchecked`] by default
#[derive(Clone)]
pub struct Vector<T, C = Unchecked> {
    elements: Vec<T>,
    element_type: C,
}

impl<T> Vector<T> {
    pub fn new() -> Self {
        Self::typed(Unchecked)
    }

    pub fn from_vec(elements: Vec<T>) -> Self {
        Self {
            elements,
            element_type: Unchecked,
        }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Vector<T, C> {
    pub fn typed(element_type: C) -> Self {
        Self {
            elements: Vec::new(),
            element_type,
        }
    }

    pub fn element_type(&self) -> &C {
        &self.element_type
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// [`CollectionError::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.elements.len();
        self.elements
            .get(index)
            .ok_or(CollectionError::IndexOutOfRange { index, len })
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// down by one.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        Ok(self.elements.remove(index))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the elements as a slice, in order.
    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.elements.len();
        if index < len {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange { index, len })
        }
    }
}

impl<T, C: Contract<T>> Vector<T, C> {
    /// Creates a vector from `elements`, validating each against
    /// `element_type`.
    pub fn from_vec_typed(elements: Vec<T>, element_type: C) -> Result<Self> {
        for element in &elements {
            contract::check_value(&element_type, element)?;
        }
        Ok(Self {
            elements,
            element_type,
        })
    }

    /// Appends `element` to the end.
    pub fn add(&mut self, element: T) -> Result<()> {
        contract::check_value(&self.element_type, &element)?;
        self.elements.push(element);
        Ok(())
    }

    /// Appends every element of `elements`. If any element is rejected,
    /// nothing is appended.
    pub fn add_all<I>(&mut self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let staged: Vec<T> = elements.into_iter().collect();
        for element in &staged {
            contract::check_value(&self.element_type, element)?;
        }
        self.elements.extend(staged);
        Ok(())
    }

    /// Replaces the element at `index` and returns the previous one.
    pub fn set(&mut self, index: usize, element: T) -> Result<T> {
        self.check_index(index)?;
        contract::check_value(&self.element_type, &element)?;
        Ok(std::mem::replace(&mut self.elements[index], element))
    }
}

impl<T: PartialEq, C> Vector<T, C> {
    pub fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }

    /// Returns the position of the first element equal to `element`.
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.elements.iter().position(|e| e == element)
    }

    /// Returns the position of the last element equal to `element`.
    pub fn last_index_of(&self, element: &T) -> Option<usize> {
        self.elements.iter().rposition(|e| e == element)
    }
}

impl<T: Key, C> Vector<T, C> {
    /// Digest of the element identities, in order.
    pub fn hash_code(&self) -> Result<u128> {
        let tokens = self.iter().map(key_of).collect::<Result<Vec<_>>>()?;
        Ok(digest(tokens.iter().map(|token| token.as_bytes())))
    }
}

impl<T: PartialEq, C: PartialEq> PartialEq for Vector<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type && self.elements == other.elements
    }
}

impl<T: fmt::Debug, C: Contract<T>> fmt::Display for Vector<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = contract::type_name("Vector", &[self.element_type.name()]);
        write_block(
            f,
            format_args!("{name}[{}]", self.elements.len()),
            &self.elements,
            |f, e| write!(f, "{e:?}"),
        )
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Vector<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.elements).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a Vector<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::{Type, Var};

    #[test]
    fn test_add_and_get() {
        let mut vector = Vector::new();
        vector.add("a").unwrap();
        vector.add("b").unwrap();
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.get(1), Ok(&"b"));
    }

    #[test]
    fn test_index_out_of_range() {
        let mut vector = Vector::from_vec(vec![1, 2, 3]);
        let err = CollectionError::IndexOutOfRange { index: 3, len: 3 };
        assert_eq!(vector.get(3), Err(err.clone()));
        assert_eq!(vector.set(3, 0), Err(err.clone()));
        assert_eq!(vector.remove(3), Err(err));
        assert_eq!(vector.elements(), &[1, 2, 3]);
    }

    #[test]
    fn test_set_and_remove() {
        let mut vector = Vector::from_vec(vec![1, 2, 3]);
        assert_eq!(vector.set(0, 10), Ok(1));
        assert_eq!(vector.remove(1), Ok(2));
        assert_eq!(vector.elements(), &[10, 3]);
    }

    #[test]
    fn test_value_search() {
        let vector = Vector::from_vec(vec!["x", "y", "x"]);
        assert!(vector.contains(&"y"));
        assert!(!vector.contains(&"z"));
        assert_eq!(vector.index_of(&"x"), Some(0));
        assert_eq!(vector.last_index_of(&"x"), Some(2));
        assert_eq!(vector.index_of(&"z"), None);
    }

    #[test]
    fn test_add_all_is_atomic() {
        let mut vector = Vector::typed(Type::Int);
        vector.add(Var::from(1)).unwrap();

        let result = vector.add_all(vec![Var::from(2), Var::from("three")]);
        assert!(matches!(result, Err(CollectionError::InvalidValueType(_))));
        assert_eq!(vector.len(), 1);

        vector.add_all(vec![Var::from(2), Var::from(3)]).unwrap();
        assert_eq!(vector.len(), 3);
    }

    #[test]
    fn test_typed_set_rejects() {
        let mut vector = Vector::from_vec_typed(vec![Var::from(1.5)], Type::Float).unwrap();
        assert!(vector.set(0, Var::Null).is_err());
        assert_eq!(vector.get(0), Ok(&Var::Float(1.5)));
        assert!(Vector::from_vec_typed(vec![Var::Null], Type::Float).is_err());
    }

    #[test]
    fn test_hash_code() {
        let a = Vector::from_vec(vec!["x", "y"]);
        let b = Vector::from_vec(vec!["y", "x"]);
        assert_eq!(a.hash_code().unwrap(), a.clone().hash_code().unwrap());
        assert_ne!(a.hash_code().unwrap(), b.hash_code().unwrap());

        let ints = Vector::from_vec(vec![1u8, 2]);
        let wide = Vector::from_vec(vec![1i64, 2]);
        assert_eq!(ints.hash_code().unwrap(), wide.hash_code().unwrap());
    }

    #[test]
    fn test_clear() {
        let mut vector = Vector::from_vec(vec![1, 2]);
        vector.clear();
        assert!(vector.is_empty());
    }

    #[test]
    fn test_string_representation() {
        let mut vector = Vector::new();
        assert_eq!(vector.to_string(), "Vector[0] { }");
        vector.add_all(["a", "b"]).unwrap();
        assert_eq!(vector.to_string(), "Vector[2] {\n  \"a\",\n  \"b\"\n}");

        let typed: Vector<Var, Type> = Vector::typed(Type::array_of(Type::Int));
        assert_eq!(typed.to_string(), "Vector<int[]>[0] { }");
    }
}
