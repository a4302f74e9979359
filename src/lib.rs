pub mod error;
pub use error::*;

pub mod backup;
pub mod provider;
pub mod retry;
pub mod store;

mod wrapper;
pub use wrapper::aws::load_sdk_config;
