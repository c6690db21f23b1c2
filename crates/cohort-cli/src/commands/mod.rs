pub mod dispatch;
pub mod init;
pub mod log;
pub mod schema;
pub mod shared;
pub mod study;
