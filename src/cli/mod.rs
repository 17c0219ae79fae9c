//! CLI command implementations

pub mod http;
pub mod init;
pub mod remote;
pub mod serve;
pub mod status;
