//! Command implementations.

mod run;
mod validate;

pub use run::run_console;
pub use validate::run_validate;
