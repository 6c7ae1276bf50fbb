//! Colour values handed to the GPU layer.

pub mod color;

pub use color::Color;
