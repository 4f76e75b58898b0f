//! Casement Core
//!
//! Shared building blocks for the Casement windowing layer: the typed
//! property store, geometry primitives, hash collections, logging setup and
//! profiling hooks.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod profiling;
pub mod properties;

pub use properties::{PropertyGroup, PropertyType, PropertyValue};
