pub mod init;
pub mod person;
