pub mod common;
pub mod image;
pub mod params;

pub use common::*;
pub use image::*;
pub use params::*;
