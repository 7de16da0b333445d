//! Pure view-model state bound by a rendering layer.
//!
//! Nothing here performs I/O; mutations that touch records go through the
//! controller.

pub mod audit_filter;
pub mod board;
pub mod dashboard;
pub mod navigation;
pub mod panels;
