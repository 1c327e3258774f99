//! CLI library components for the template vault.

#![allow(missing_docs)]

pub mod edits;
pub mod logging;
