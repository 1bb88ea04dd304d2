//! Painter library crate.
//!
//! A small drawing pipeline: scripts in the command language are parsed into
//! operations, posted to a queue, and applied by a single event-loop thread to
//! a double-buffered canvas that hands finished frames to a receiver.

/// Drawing surface capability and the in-memory framebuffer.
pub mod canvas;
/// Color types and the named palette.
pub mod color;
/// Configuration management.
pub mod config;
/// Command language parser.
pub mod lang;
/// PNG frame output.
pub mod output;
/// Operations, the operation queue, and the event loop.
pub mod pipeline;
