//! Command implementations.

pub mod process;
pub mod query;

pub use self::process::execute_process;
pub use self::query::{
    execute_export, execute_history, execute_latest, execute_show, execute_stats,
};
