pub mod commands;
pub mod handlers;
pub mod logging;
pub mod output;
