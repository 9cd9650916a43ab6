pub mod archive;
pub mod commands;
pub mod detect;
pub mod download;
pub mod http;
pub mod notice;
pub mod resolver;
pub mod runtime;
pub mod session;
