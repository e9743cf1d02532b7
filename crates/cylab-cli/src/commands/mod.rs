pub mod init;
pub mod report;
pub mod shell;
