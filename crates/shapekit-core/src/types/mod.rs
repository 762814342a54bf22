//! Type aliases shared across crates.
//!
//! - [`aliases`]: `Rc<RefCell<T>>` wrappers and their constructors.

pub mod aliases;

pub use aliases::*;
