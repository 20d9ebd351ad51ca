//! BML Registry crate.
//!
//! Provides [`TypeRegistry`], the per-run store of canonical BML types and
//! their Java counterparts.

mod registry;

pub use registry::TypeRegistry;
