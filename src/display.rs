//! Block rendering shared by the containers' `Display` impls.
//!
//! ```text
//! HashSet[2] {
//!   "color",
//!   "price"
//! }
//! ```
//!
//! Empty containers render on one line as `HashSet[0] { }`.

use std::fmt;

pub(crate) fn write_block<I, F>(
    f: &mut fmt::Formatter<'_>,
    header: impl fmt::Display,
    items: I,
    mut write_item: F,
) -> fmt::Result
where
    I: IntoIterator,
    F: FnMut(&mut fmt::Formatter<'_>, I::Item) -> fmt::Result,
{
    write!(f, "{header} {{")?;
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return f.write_str(" }");
    }

    f.write_str("\n")?;
    while let Some(item) = items.next() {
        f.write_str("  ")?;
        write_item(f, item)?;
        if items.peek().is_some() {
            f.write_str(",\n")?;
        } else {
            f.write_str("\n")?;
        }
    }
    f.write_str("}")
}
