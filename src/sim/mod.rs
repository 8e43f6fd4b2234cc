//! Simulation: level loading, the game world, and its command/event types.

pub mod event;
pub mod level;
pub mod world;
