//! sea-orm entities for the portal database.

pub mod evaluations;
pub mod feedback;
pub mod progress_updates;
pub mod projects;
pub mod users;
