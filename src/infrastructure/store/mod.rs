//! Message store implementations.

mod inmemory;

pub use inmemory::InMemoryMessageStore;
