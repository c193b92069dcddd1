pub mod dto;
pub mod orders;
pub mod products;
