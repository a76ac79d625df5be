pub mod assignment;
pub mod auth;
pub mod evaluation;
pub mod feedback;
pub mod lifecycle;
pub mod progress;
pub mod project;
pub mod user;

#[cfg(test)]
pub(crate) mod mock;
