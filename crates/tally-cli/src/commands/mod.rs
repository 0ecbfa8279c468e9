//! Command implementations.

pub mod models;
pub mod run;

pub use self::models::execute_models;
pub use self::run::execute_run;
