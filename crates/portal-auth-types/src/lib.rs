//! Auth types shared by the portal service and its tests.
//!
//! Provides the bearer-token service, the request `Principal` with its extractor,
//! and `Authorization: Bearer` header parsing.

pub mod bearer;
pub mod principal;
pub mod token;
