pub mod memory;
pub mod traits;

// Re-export
pub use memory::InMemoryLogRepository;
pub use traits::LogRepository;
