pub mod cf;
pub mod connection;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod session;
