//! Quadspin engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the applications:
//! the window/event loop, the wgpu device and surface, frame timing, and the
//! lifecycle contract an application implements.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
