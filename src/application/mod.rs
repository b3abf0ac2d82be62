pub mod bootstrap;
pub mod queries;
pub mod shared_store;
pub mod snapshot;
pub mod store;
