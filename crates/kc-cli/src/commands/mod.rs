//! Command implementations.

mod login;

pub use login::{run_login, LoginSummary};
