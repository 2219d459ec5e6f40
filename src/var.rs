//! Dynamic values and their declared types.
//!
//! [`Var`] lets a single container hold values of mixed shape (scalars,
//! arrays, objects) while still identifying them by content. A [`Type`]
//! declared at construction time restricts what such a container accepts.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::contract::Contract;
use crate::key::{Key, KeyShape, Scalar};

/// Identity capability of an object value.
///
/// Implementors promise that `equals` implies equal `hash_code`s.
pub trait Object: fmt::Debug + Send + Sync {
    /// Name of the object's class, used by [`Type::Class`].
    fn class_name(&self) -> &str;

    fn hash_code(&self) -> String;

    fn equals(&self, other: &dyn Object) -> bool {
        self.class_name() == other.class_name() && self.hash_code() == other.hash_code()
    }
}

/// A dynamically typed value.
#[derive(Clone)]
pub enum Var {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Var>),
    Object(Arc<dyn Object>),
}

impl Var {
    pub fn object(value: impl Object + 'static) -> Self {
        Var::Object(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Var::Null)
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Var::Null, Var::Null) => true,
            (Var::Bool(a), Var::Bool(b)) => a == b,
            (Var::Int(a), Var::Int(b)) => a == b,
            (Var::Float(a), Var::Float(b)) => a == b,
            (Var::Str(a), Var::Str(b)) => a == b,
            (Var::Array(a), Var::Array(b)) => a == b,
            (Var::Object(a), Var::Object(b)) => a.equals(b.as_ref()),
            _ => false,
        }
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Null => f.write_str("null"),
            Var::Bool(b) => write!(f, "{b}"),
            Var::Int(i) => write!(f, "{i}"),
            Var::Float(x) => write!(f, "{x:?}"),
            Var::Str(s) => write!(f, "{s:?}"),
            Var::Array(items) => f.debug_list().entries(items).finish(),
            Var::Object(o) => write!(f, "{o:?}"),
        }
    }
}

impl Key for Var {
    fn shape(&self) -> KeyShape<'_> {
        match self {
            Var::Null => KeyShape::Scalar(Scalar::Null),
            Var::Bool(b) => KeyShape::Scalar(Scalar::Bool(*b)),
            Var::Int(i) => KeyShape::Scalar(Scalar::Int(i128::from(*i))),
            Var::Float(x) => KeyShape::Scalar(Scalar::Float(*x)),
            Var::Str(s) => KeyShape::Scalar(Scalar::Str(s)),
            Var::Array(items) => KeyShape::composite(items),
            // Class-qualified so equal codes of unrelated classes differ.
            Var::Object(o) => KeyShape::Identity(Cow::Owned(format!(
                "{}:{}",
                o.class_name(),
                o.hash_code()
            ))),
        }
    }
}

impl From<bool> for Var {
    fn from(value: bool) -> Self {
        Var::Bool(value)
    }
}

impl From<i64> for Var {
    fn from(value: i64) -> Self {
        Var::Int(value)
    }
}

impl From<i32> for Var {
    fn from(value: i32) -> Self {
        Var::Int(i64::from(value))
    }
}

impl From<f64> for Var {
    fn from(value: f64) -> Self {
        Var::Float(value)
    }
}

impl From<&str> for Var {
    fn from(value: &str) -> Self {
        Var::Str(value.to_string())
    }
}

impl From<String> for Var {
    fn from(value: String) -> Self {
        Var::Str(value)
    }
}

impl<T: Into<Var>> From<Vec<T>> for Var {
    fn from(values: Vec<T>) -> Self {
        Var::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Var>> From<Option<T>> for Var {
    fn from(value: Option<T>) -> Self {
        value.map_or(Var::Null, Into::into)
    }
}

/// Declared type of a [`Var`] slot.
///
/// Every type except [`Type::Var`] rejects `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Any value, including null.
    Var,
    Bool,
    Int,
    Float,
    String,
    /// Arrays whose every element satisfies the component type.
    Array(Box<Type>),
    /// Objects whose [`Object::class_name`] matches.
    Class(String),
}

impl Type {
    pub fn array_of(component: Type) -> Self {
        Type::Array(Box::new(component))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Type::Class(name.into())
    }

    pub fn is_instance(&self, value: &Var) -> bool {
        match (self, value) {
            (Type::Var, _) => true,
            (Type::Bool, Var::Bool(_)) => true,
            (Type::Int, Var::Int(_)) => true,
            (Type::Float, Var::Float(_)) => true,
            (Type::String, Var::Str(_)) => true,
            (Type::Array(component), Var::Array(items)) => {
                items.iter().all(|item| component.is_instance(item))
            }
            (Type::Class(name), Var::Object(o)) => o.class_name() == name,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Var => f.write_str("var"),
            Type::Bool => f.write_str("bool"),
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::String => f.write_str("string"),
            Type::Array(component) => write!(f, "{component}[]"),
            Type::Class(name) => f.write_str(name),
        }
    }
}

impl Contract<Var> for Type {
    fn admits(&self, value: &Var) -> bool {
        self.is_instance(value)
    }

    fn name(&self) -> Option<String> {
        Some(self.to_string())
    }
}
