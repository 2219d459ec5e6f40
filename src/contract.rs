//! Declared type contracts for container keys and values.
//!
//! A container checks every incoming key or value against its contract
//! before touching its storage, so a rejected value leaves the container
//! exactly as it was. Statically typed containers use [`Unchecked`], which
//! admits everything and costs nothing; containers of dynamic
//! [`Var`](crate::var::Var) values use a [`Type`](crate::var::Type).

use crate::error::{CollectionError, Result};

/// A run-time admission check for values of type `T`.
pub trait Contract<T: ?Sized> {
    /// Returns `true` if `value` satisfies this contract.
    fn admits(&self, value: &T) -> bool;

    /// Name used in error messages and container display. `None` means the
    /// contract is not declared and the container renders without type
    /// parameters.
    fn name(&self) -> Option<String>;
}

/// The contract of an undeclared container: admits every value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Unchecked;

impl<T: ?Sized> Contract<T> for Unchecked {
    #[inline]
    fn admits(&self, _value: &T) -> bool {
        true
    }

    fn name(&self) -> Option<String> {
        None
    }
}

pub(crate) fn check_key<T: ?Sized, C: Contract<T>>(contract: &C, key: &T) -> Result<()> {
    if contract.admits(key) {
        Ok(())
    } else {
        Err(CollectionError::key(rejection(contract)))
    }
}

pub(crate) fn check_value<T: ?Sized, C: Contract<T>>(contract: &C, value: &T) -> Result<()> {
    if contract.admits(value) {
        Ok(())
    } else {
        Err(CollectionError::value(rejection(contract)))
    }
}

fn rejection<T: ?Sized, C: Contract<T>>(contract: &C) -> String {
    match contract.name() {
        Some(name) => format!("expected {name}"),
        None => "rejected by contract".to_string(),
    }
}

/// Renders `Name<A,B>` for declared contracts, or just `Name` when none of
/// the parameters is declared.
pub(crate) fn type_name(name: &str, params: &[Option<String>]) -> String {
    if params.iter().all(Option::is_none) {
        return name.to_string();
    }
    let params: Vec<&str> = params
        .iter()
        .map(|p| p.as_deref().unwrap_or("var"))
        .collect();
    format!("{name}<{}>", params.join(","))
}
