pub mod api;
pub mod gallery;
pub mod htmx;
