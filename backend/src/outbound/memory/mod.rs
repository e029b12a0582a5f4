//! Process-local adapters used when no database is configured and in tests.

mod in_memory_directory;

pub use in_memory_directory::InMemoryDirectory;
