//! quotabar: subscription usage bars for terminal statuslines and
//! desktop status bars.

pub mod commands;
pub mod config;
pub mod driver;
pub mod output;
