//! Advice discovery, filtering and ordering.
//!
//! An advice root is a directory tree. Any directory holding an
//! [`adviser_api::ADVICE_MANIFEST`] is a leaf advice named by its
//! root-relative path (`python/typed-marker`). The manifest's `kind` selects a
//! factory from the [`Registry`]; [`Registry::builtin`] knows `command`,
//! `rename`, `replace` and `write-file`.
//!
//! [`Catalog::order`] is the single source of execution order: filtered
//! advice sorted by `(order, name)`.

mod catalog;
mod error;
mod filter;
pub mod kinds;
mod registry;

pub use catalog::{Catalog, LoadedAdvice};
pub use error::CatalogError;
pub use filter::{Filter, name_pattern};
pub use registry::Registry;
