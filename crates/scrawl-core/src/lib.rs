//! Scrawl Core Types and Definitions
//!
//! This crate provides the foundational types for the scrawl diagram
//! renderer. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Layers**: Z-ordered SVG output collection ([`layer`] module)
//! - **Paths**: Structured SVG path data ([`path`] module)
//! - **Surface**: The rendered surface model, elements, primitives, and
//!   semantic categories ([`surface`] module)

pub mod color;
pub mod geometry;
pub mod layer;
pub mod path;
pub mod surface;
