//! Application command handlers for specfall.
//!
//! # Commands
//! - `view`: the live waterfall and session overview (default)
//! - `config`: open the configuration file in the user's preferred editor
//! - `logs`: display recent log entries

pub mod config;
pub mod logs;
pub mod view;

pub use config::handle_config;
pub use logs::handle_logs;
pub use view::handle_view;
