pub mod aggregate;
pub mod dto;
pub mod export;
pub mod filter;
pub mod logbook_service;
pub mod sort;
