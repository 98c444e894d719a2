pub mod application;
pub mod credentials;
pub mod errors;
pub mod provisioner;
pub mod service;
