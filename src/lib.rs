pub mod auth;
pub mod commands;
pub mod completion;
pub mod config;
pub mod consts;
pub mod error;
pub mod handler;
pub mod interaction;
pub mod server;
