//! # Rendering Module
//!
//! Static-layer compositing and per-frame 2D drawing using macroquad.

pub mod compositor;
pub mod display;

pub use compositor::*;
pub use display::*;
