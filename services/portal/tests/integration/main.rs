mod auth_test;
mod helpers;
mod policy_test;
mod progress_test;
