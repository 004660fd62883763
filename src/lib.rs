extern crate alloc;

mod client;
pub use client::{authenticator, rpc, Client};

pub mod config;
pub mod errors;
pub mod store;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

#[cfg(test)]
mod tests;
