pub mod config;
pub mod content;
pub mod domain;
pub mod paths;
pub mod quiz;
pub mod review;
pub mod search;
pub mod services;
pub mod state;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
