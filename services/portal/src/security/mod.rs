pub mod authenticator;
pub mod identity;
pub mod password;
pub mod policy;
