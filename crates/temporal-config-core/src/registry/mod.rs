//! Bootstrap of registration modules into resolved singletons
//!
//! A [`RegistryBuilder`] composes modules, validates the dependency graph
//! and resolves every descriptor once. The resulting [`Registry`] is
//! immutable and may be installed process-wide with [`bootstrap_global`].

mod builder;
mod container;
mod explorer;
mod global;
mod graph;

pub use builder::RegistryBuilder;
pub use container::Registry;
pub use explorer::Explorer;
pub use global::{bootstrap_global, global};
