//! Cartouche Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Cartouche
//! composition engine and its front-ends. It includes:
//!
//! - **Identifiers**: Interned panel identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Draw**: Strokes, arrows, text, frames and layered SVG output ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
