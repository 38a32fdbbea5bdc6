//! Built-in rule sets.
//!
//! Each submodule provides a complete, valid [`crate::ModelConfig`]: term
//! breakpoints plus the rules over them.

pub(crate) mod growth;
