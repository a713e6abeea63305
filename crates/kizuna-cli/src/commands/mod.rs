//! Command implementations.

pub mod config;
pub mod run;
pub mod taxonomy;

pub use self::config::execute_config;
pub use self::run::execute_run;
pub use self::taxonomy::execute_taxonomy;
