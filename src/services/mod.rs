pub mod client;
pub mod memory_store;
pub mod object_storage;
pub mod signer;

#[cfg(test)]
pub mod testing;
