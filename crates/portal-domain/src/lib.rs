//! Domain types shared across the student portal crates.
//!
//! Pure types only: no web, database or token dependencies.

pub mod id;
pub mod project;
pub mod user;
