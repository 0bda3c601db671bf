// src/lib.rs
//! Gesture-driven particle cloud viewer.
//!
//! Wires the `handcloud` frame driver to a wgpu point renderer, a winit
//! window and a hand-tracking backend. The bundled backend simulates a hand
//! from mouse and keyboard input.

pub mod app;
pub mod camera;
pub mod config;
pub mod renderer;
pub mod tracking;
pub mod ui;
