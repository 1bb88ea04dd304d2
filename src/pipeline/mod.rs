// src/pipeline/mod.rs

//! The concurrent operation pipeline: operations, the blocking queue that
//! carries them, and the event loop that applies them.

pub mod event_loop;
pub mod op;
pub mod queue;

pub use event_loop::{EventLoop, LoopState, LoopStats, Poster, Receiver};
pub use op::{BackgroundColor, DrawStyle, Operation};
pub use queue::OperationQueue;
