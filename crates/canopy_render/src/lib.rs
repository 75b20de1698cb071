//! A small deterministic template renderer.
//!
//! Templates are plain text with `{{name}}` placeholders; rendering
//! substitutes every placeholder from a [`Bindings`] set and fails if any
//! placeholder is unbound. Repeated or conditional blocks are produced by
//! the caller as ordinary strings and bound like any other variable, so the
//! renderer itself stays a pure substitution: same template and same
//! bindings always yield byte-identical output.

#![warn(missing_docs)]

pub mod bindings;
pub mod engine;
pub mod error;

pub use bindings::Bindings;
pub use engine::{render, render_to_file};
pub use error::RenderError;
