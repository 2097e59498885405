#[cfg(test)]
pub mod memory;
pub mod pool;
pub mod store;

pub use pool::create_pool;
