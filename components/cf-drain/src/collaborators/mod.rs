pub mod downloader;
pub mod password;
pub mod random;
