pub mod entry;
pub mod filter;
pub mod registry;
pub mod sort;
