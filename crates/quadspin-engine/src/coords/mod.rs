//! Coordinate types shared between the runtime and renderers.
//!
//! Sizes handed to applications are physical pixels, matching the surface
//! (swapchain) extent that draw calls rasterize into.

mod viewport;

pub use viewport::Viewport;
