//! Layered key-value store.
//!
//! A [`LayeredStack`] keeps an ordered list of independent mappings and
//! answers queries as if they were merged into one, with lower layer indexes
//! shadowing higher ones. It also offers optional case-insensitive keys, a
//! content fingerprint of the merged view, and a tabular dump for debugging.

mod digest;
mod error;
mod loader;
mod options;
mod policy;
mod stack;
mod table;

/// Canonical form and fingerprint of a merged view.
pub use digest::{canonicalize, digest_view};
/// Public error type returned by fallible stack operations.
pub use error::StackError;
/// JSON5 layer file parsing.
pub use loader::{load_layer_from_path, load_layer_from_str};
/// Construction options.
pub use options::StackOptions;
/// Key normalization policy.
pub use policy::KeyPolicy;
/// The stack and its layer type.
pub use stack::{Layer, LayeredStack};
/// Debug table rendering.
pub use table::render_table;
