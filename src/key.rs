//! Identity keys: mapping arbitrary values to stable lookup tokens.
//!
//! Every associative container in this crate indexes its entries by a
//! [`HashKey`] rather than by the value itself. A value describes how it
//! should be identified by implementing [`Key`], which resolves it into one
//! of four closed shapes:
//!
//! - [`KeyShape::Scalar`]: numbers, text, booleans, chars and null. The token
//!   is an exact canonical encoding of the value. Integers are encoded as
//!   128-bit big-endian words, never through floating point, so large
//!   integers never collapse onto each other.
//! - [`KeyShape::Identity`]: values exposing a `hash_code`-like capability.
//!   The token is the code the value produces; equal values must produce
//!   equal codes.
//! - [`KeyShape::Composite`]: ordered sequences. The token combines the
//!   component encodings in order.
//! - [`KeyShape::Unsupported`]: values that cannot be identified. Resolving
//!   such a value fails with [`CollectionError::InvalidKeyType`].
//!
//! Scalar and composite encodings are prefix-free, so the token of a scalar
//! or composite value is injective: two different values never share one.
//!
//! ```
//! use identity_collections::key::key_of;
//!
//! let a = key_of(&vec!["hello", "world"]).unwrap();
//! let b = key_of(&["hello".to_string(), "world".to_string()]).unwrap();
//! assert_eq!(a, b);
//! assert_ne!(a, key_of(&vec!["world", "hello"]).unwrap());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{CollectionError, Result};

const TAG_NULL: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_UINT: u8 = 0x03;
const TAG_FLOAT: u8 = 0x04;
const TAG_CHAR: u8 = 0x05;
const TAG_STR: u8 = 0x06;
const TAG_IDENTITY: u8 = 0x07;
const TAG_COMPOSITE: u8 = 0x08;

// Most scalar tokens fit inline.
const INLINE_TOKEN: usize = 24;

/// A scalar value in canonical form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    Int(i128),
    /// Unsigned values above `i128::MAX`.
    UInt(u128),
    Float(f64),
    Char(char),
    Str(&'a str),
}

/// How a value is identified, resolved once per [`key_of`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyShape<'a> {
    Scalar(Scalar<'a>),
    Identity(Cow<'a, str>),
    Composite(Vec<KeyShape<'a>>),
    /// Carries a short description of what could not be identified.
    Unsupported(&'static str),
}

impl<'a> KeyShape<'a> {
    /// Shape of a value identified by an owned hash code.
    pub fn identity(code: impl Into<Cow<'a, str>>) -> Self {
        KeyShape::Identity(code.into())
    }

    /// Shape of an ordered sequence of components.
    pub fn composite<I, K>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: Key + ?Sized + 'a,
    {
        KeyShape::Composite(items.into_iter().map(Key::shape).collect())
    }
}

/// Capability of producing an identity shape.
///
/// Implement this for your own types to use them as map keys, set elements
/// or buffer entries. Types with a natural hash code should return
/// [`KeyShape::Identity`]:
///
/// ```
/// use identity_collections::key::{Key, KeyShape};
///
/// struct Name(String);
///
/// impl Key for Name {
///     fn shape(&self) -> KeyShape<'_> {
///         KeyShape::identity(self.0.as_str())
///     }
/// }
/// ```
pub trait Key {
    fn shape(&self) -> KeyShape<'_>;
}

/// Structural lookup token derived from a value's identity shape.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey(SmallVec<[u8; INLINE_TOKEN]>);

impl HashKey {
    /// Raw canonical encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 128-bit digest of this token.
    pub fn fingerprint(&self) -> u128 {
        digest([self.as_bytes()])
    }
}

impl fmt::Debug for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashKey(")?;
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        f.write_str(")")
    }
}

/// Computes the identity token of `value`.
///
/// Fails with [`CollectionError::InvalidKeyType`] if the value, or any
/// component of it, resolves to [`KeyShape::Unsupported`].
pub fn key_of<K: Key + ?Sized>(value: &K) -> Result<HashKey> {
    let mut out = SmallVec::new();
    encode(&value.shape(), &mut out)?;
    Ok(HashKey(out))
}

fn encode(shape: &KeyShape<'_>, out: &mut SmallVec<[u8; INLINE_TOKEN]>) -> Result<()> {
    match shape {
        KeyShape::Scalar(scalar) => encode_scalar(scalar, out),
        KeyShape::Identity(code) => {
            out.push(TAG_IDENTITY);
            encode_bytes(code.as_bytes(), out);
        }
        KeyShape::Composite(items) => {
            out.push(TAG_COMPOSITE);
            out.extend_from_slice(&(items.len() as u64).to_be_bytes());
            for item in items {
                encode(item, out)?;
            }
        }
        KeyShape::Unsupported(what) => {
            return Err(CollectionError::key(format!("{what} has no identity")));
        }
    }
    Ok(())
}

fn encode_scalar(scalar: &Scalar<'_>, out: &mut SmallVec<[u8; INLINE_TOKEN]>) {
    match *scalar {
        Scalar::Null => out.push(TAG_NULL),
        Scalar::Bool(b) => out.extend_from_slice(&[TAG_BOOL, b as u8]),
        Scalar::Int(i) => {
            out.push(TAG_INT);
            out.extend_from_slice(&i.to_be_bytes());
        }
        Scalar::UInt(u) => match i128::try_from(u) {
            Ok(i) => encode_scalar(&Scalar::Int(i), out),
            Err(_) => {
                out.push(TAG_UINT);
                out.extend_from_slice(&u.to_be_bytes());
            }
        },
        Scalar::Float(x) => {
            // -0.0 == 0.0, and every NaN is the same key
            let bits = if x == 0.0 {
                0u64
            } else if x.is_nan() {
                f64::NAN.to_bits()
            } else {
                x.to_bits()
            };
            out.push(TAG_FLOAT);
            out.extend_from_slice(&bits.to_be_bytes());
        }
        Scalar::Char(c) => {
            out.push(TAG_CHAR);
            out.extend_from_slice(&(c as u32).to_be_bytes());
        }
        Scalar::Str(s) => {
            out.push(TAG_STR);
            encode_bytes(s.as_bytes(), out);
        }
    }
}

fn encode_bytes(bytes: &[u8], out: &mut SmallVec<[u8; INLINE_TOKEN]>) {
    out.extend_from_slice(&(bytes.len() as u64).to_be_bytes());
    out.extend_from_slice(bytes);
}

/// Digest of a sequence of byte strings; each part is length-prefixed so
/// part boundaries are significant.
pub(crate) fn digest<'a, I>(parts: I) -> u128
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(&(part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    let hash = hasher.finalize();
    let mut word = [0u8; 16];
    word.copy_from_slice(&hash.as_bytes()[..16]);
    u128::from_be_bytes(word)
}

/// Decodes a hexadecimal digest (up to 32 digits, optional `0x` prefix)
/// into its exact integer value.
///
/// ```
/// use identity_collections::key::parse_hex_digest;
///
/// assert_eq!(
///     parse_hex_digest("d41d8cd98f00b204e9800998ecf8427e"),
///     Some(0xd41d8cd98f00b204e9800998ecf8427e)
/// );
/// ```
pub fn parse_hex_digest(digest: &str) -> Option<u128> {
    let digits = digest.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty()
        || digits.len() > 32
        || !digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}

/// Explicit reference-identity fallback.
///
/// Values without an identity capability can still be stored by wrapping
/// them in an `Arc`; the token is the allocation address, so two wrappers
/// are the same key only when they share the allocation.
pub struct ByAddress<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> ByAddress<T> {
    pub fn new(value: Arc<T>) -> Self {
        Self(value)
    }
}

impl<T: ?Sized> Clone for ByAddress<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for ByAddress<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByAddress({:p})", Arc::as_ptr(&self.0) as *const u8)
    }
}

impl<T: ?Sized> PartialEq for ByAddress<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Key for ByAddress<T> {
    fn shape(&self) -> KeyShape<'_> {
        let address = Arc::as_ptr(&self.0) as *const u8 as usize;
        KeyShape::identity(format!("@{address:x}"))
    }
}

macro_rules! int_key {
    ($($t:ty),*) => {
        $(
            impl Key for $t {
                fn shape(&self) -> KeyShape<'_> {
                    KeyShape::Scalar(Scalar::Int(*self as i128))
                }
            }
        )*
    };
}

int_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl Key for u128 {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::Scalar(Scalar::UInt(*self))
    }
}

impl Key for bool {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::Scalar(Scalar::Bool(*self))
    }
}

impl Key for f32 {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl Key for f64 {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::Scalar(Scalar::Float(*self))
    }
}

impl Key for char {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::Scalar(Scalar::Char(*self))
    }
}

impl Key for str {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::Scalar(Scalar::Str(self))
    }
}

impl Key for String {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::Scalar(Scalar::Str(self))
    }
}

impl<T: Key> Key for Option<T> {
    fn shape(&self) -> KeyShape<'_> {
        match self {
            Some(value) => value.shape(),
            None => KeyShape::Scalar(Scalar::Null),
        }
    }
}

impl<T: Key + ?Sized> Key for &T {
    fn shape(&self) -> KeyShape<'_> {
        (**self).shape()
    }
}

impl<T: Key + ?Sized> Key for Box<T> {
    fn shape(&self) -> KeyShape<'_> {
        (**self).shape()
    }
}

impl<T: Key + ?Sized> Key for Rc<T> {
    fn shape(&self) -> KeyShape<'_> {
        (**self).shape()
    }
}

impl<T: Key + ?Sized> Key for Arc<T> {
    fn shape(&self) -> KeyShape<'_> {
        (**self).shape()
    }
}

impl<T: Key> Key for [T] {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::composite(self)
    }
}

impl<T: Key, const N: usize> Key for [T; N] {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::composite(self)
    }
}

impl<T: Key> Key for Vec<T> {
    fn shape(&self) -> KeyShape<'_> {
        KeyShape::composite(self)
    }
}

macro_rules! tuple_key {
    ($($name:ident),+) => {
        impl<$($name: Key),+> Key for ($($name,)+) {
            #[allow(non_snake_case)]
            fn shape(&self) -> KeyShape<'_> {
                let ($($name,)+) = self;
                KeyShape::Composite(vec![$($name.shape()),+])
            }
        }
    };
}

tuple_key!(A, B);
tuple_key!(A, B, C);
tuple_key!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    impl Key for Opaque {
        fn shape(&self) -> KeyShape<'_> {
            KeyShape::Unsupported("opaque value")
        }
    }

    struct Name(&'static str);

    impl Key for Name {
        fn shape(&self) -> KeyShape<'_> {
            KeyShape::identity(self.0)
        }
    }

    #[test]
    fn repeated_calls_are_stable() {
        assert_eq!(key_of("hello").unwrap(), key_of("hello").unwrap());
        assert_eq!(key_of(&42i64).unwrap(), key_of(&42i64).unwrap());
        assert_eq!(
            key_of(&vec![1, 2, 3]).unwrap(),
            key_of(&vec![1, 2, 3]).unwrap()
        );
    }

    #[test]
    fn integer_widths_share_tokens() {
        assert_eq!(key_of(&7u8).unwrap(), key_of(&7i64).unwrap());
        assert_eq!(key_of(&7u128).unwrap(), key_of(&7isize).unwrap());
    }

    #[test]
    fn large_integers_stay_exact() {
        let a = key_of(&u128::MAX).unwrap();
        let b = key_of(&(u128::MAX - 1)).unwrap();
        assert_ne!(a, b);

        let c = key_of(&(1u64 << 60)).unwrap();
        let d = key_of(&((1u64 << 60) + 1)).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn text_and_numbers_never_collide() {
        assert_ne!(key_of("1").unwrap(), key_of(&1).unwrap());
        assert_ne!(key_of(&1).unwrap(), key_of(&1.0f64).unwrap());
        assert_ne!(key_of(&true).unwrap(), key_of(&1).unwrap());
        assert_ne!(key_of(&'a').unwrap(), key_of("a").unwrap());
    }

    #[test]
    fn float_zero_and_nan_are_canonical() {
        assert_eq!(key_of(&0.0f64).unwrap(), key_of(&-0.0f64).unwrap());
        assert_eq!(key_of(&f64::NAN).unwrap(), key_of(&(-f64::NAN)).unwrap());
        assert_eq!(key_of(&1.5f32).unwrap(), key_of(&1.5f64).unwrap());
    }

    #[test]
    fn composite_is_order_sensitive() {
        assert_ne!(
            key_of(&vec![1, 2]).unwrap(),
            key_of(&vec![2, 1]).unwrap()
        );
    }

    #[test]
    fn composite_boundaries_are_significant() {
        assert_ne!(
            key_of(&vec!["ab"]).unwrap(),
            key_of(&vec!["a", "b"]).unwrap()
        );
        assert_ne!(
            key_of(&vec![vec![1], vec![2]]).unwrap(),
            key_of(&vec![vec![1, 2]]).unwrap()
        );
    }

    #[test]
    fn tuples_and_sequences_of_same_parts_match() {
        assert_eq!(
            key_of(&(1, 2)).unwrap(),
            key_of(&[1, 2]).unwrap()
        );
    }

    #[test]
    fn none_is_null() {
        let none: Option<i32> = None;
        assert_eq!(
            key_of(&none).unwrap().as_bytes(),
            &[TAG_NULL]
        );
        assert_eq!(key_of(&Some(3)).unwrap(), key_of(&3).unwrap());
    }

    #[test]
    fn identity_uses_hash_code() {
        assert_eq!(key_of(&Name("a")).unwrap(), key_of(&Name("a")).unwrap());
        assert_ne!(key_of(&Name("a")).unwrap(), key_of(&Name("b")).unwrap());
        // identity and text are separate namespaces
        assert_ne!(key_of(&Name("a")).unwrap(), key_of("a").unwrap());
    }

    #[test]
    fn unsupported_values_fail() {
        let err = key_of(&Opaque).unwrap_err();
        assert!(matches!(err, CollectionError::InvalidKeyType(_)));
    }

    #[test]
    fn unsupported_component_fails_whole_key() {
        let shape = KeyShape::Composite(vec![
            KeyShape::Scalar(Scalar::Int(1)),
            KeyShape::Unsupported("closure"),
        ]);
        struct Mixed<'a>(KeyShape<'a>);
        impl Key for Mixed<'_> {
            fn shape(&self) -> KeyShape<'_> {
                self.0.clone()
            }
        }
        let err = key_of(&Mixed(shape)).unwrap_err();
        assert_eq!(err.to_string(), "invalid key type: closure has no identity");
    }

    #[test]
    fn by_address_distinguishes_allocations() {
        let a = ByAddress::new(Arc::new(5));
        let b = ByAddress::new(Arc::new(5));
        assert_ne!(key_of(&a).unwrap(), key_of(&b).unwrap());
        assert_eq!(key_of(&a).unwrap(), key_of(&a.clone()).unwrap());
    }

    #[test]
    fn fingerprint_is_stable_and_discriminating() {
        let a = key_of("a").unwrap();
        assert_eq!(a.fingerprint(), key_of("a").unwrap().fingerprint());
        assert_ne!(a.fingerprint(), key_of("b").unwrap().fingerprint());
    }

    #[test]
    fn hex_digest_decodes_exactly() {
        assert_eq!(
            parse_hex_digest("098f6bcd4621d373cade4e832627b4f6"),
            Some(0x098f6bcd4621d373cade4e832627b4f6)
        );
        assert_eq!(parse_hex_digest("0xff"), Some(255));
        let fp = key_of("x").unwrap().fingerprint();
        assert_eq!(parse_hex_digest(&format!("{fp:032x}")), Some(fp));
    }

    #[test]
    fn hex_digest_rejects_garbage() {
        assert_eq!(parse_hex_digest(""), None);
        assert_eq!(parse_hex_digest("xyz"), None);
        assert_eq!(parse_hex_digest("+ff"), None);
        assert_eq!(parse_hex_digest("0x+ff"), None);
        assert_eq!(parse_hex_digest(&"f".repeat(33)), None);
    }

    #[test]
    fn debug_renders_hex() {
        let key = key_of(&true).unwrap();
        assert_eq!(format!("{key:?}"), "HashKey(0101)");
    }
}
