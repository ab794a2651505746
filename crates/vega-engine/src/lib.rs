//! Vega engine crate.
//!
//! A thin object-oriented layer over wgpu: a render context that owns the
//! device, surface, and queue; builder types for GPU resources; and the
//! window, event, asset, and GUI layers that drive a frame loop.

pub mod context;
pub mod resources;
pub mod binding;
pub mod pipeline;
pub mod command;

pub mod events;
pub mod window;
pub mod assets;
pub mod gui;

pub mod app;
pub mod time;
pub mod logging;
