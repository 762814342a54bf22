//! Type aliases for commonly used shared-ownership types.
//!
//! The engine is single-threaded: one input context is shared by every
//! scene drawing in the same window, and handlers capture shared state to
//! record what they observed. Both use `Rc<RefCell<T>>`.
//!
//! ```rust,ignore
//! use shapekit_core::types::*;
//!
//! let hits: SharedVec<String> = shared(Vec::new());
//! hits.borrow_mut().push("mousedown".into());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// A shared vector, typically used to collect events inside handlers.
pub type SharedVec<T> = Rc<RefCell<Vec<T>>>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
