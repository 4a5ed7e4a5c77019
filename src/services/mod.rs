pub mod gallery;
pub mod lazy_tile;
pub mod pagination;
pub mod registry;
pub mod store;
pub mod upload;
