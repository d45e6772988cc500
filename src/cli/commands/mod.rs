pub mod config;
pub mod docs;
pub mod extract;
pub mod generate;
pub mod init;
pub mod merge;
pub mod project;
pub mod status;
pub mod tokens;
