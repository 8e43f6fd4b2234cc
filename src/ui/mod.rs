//! Terminal front end: keyboard and gamepad input, sprites, rendering.

pub mod assets;
pub mod gamepad;
pub mod input;
pub mod renderer;
