//! Time subsystem.
//!
//! Provides testable frame timing without coupling to the runtime.
//! The runtime ticks one `FrameClock` per redraw and hands the resulting
//! `FrameTime` to both the update and render callbacks of that frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
