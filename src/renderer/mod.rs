//! 2D rendering module
//!
//! Draws the breath circle onto any `Surface`: Canvas 2D on the web, a
//! headless display list elsewhere.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use shapes::{FrameStyle, draw_breath};
pub use surface::{Color, ColorStop, DisplayList, DrawCommand, RadialGradient, Surface};
