pub mod extract;
pub mod info;
pub mod ranges;
pub mod rasterize;
