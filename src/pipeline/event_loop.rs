// src/pipeline/event_loop.rs
//! EventLoop - dedicated thread applying operations to a double-buffered canvas.
//!
//! Threading model:
//! - Owns: back buffer, front buffer, Receiver, DrawStyle (all moved onto the loop thread)
//! - Producers hold `Poster` clones and push onto a shared `OperationQueue`
//! - The loop pulls one message at a time and applies it to the back buffer
//! - On a frame-ready signal the buffers swap and the Receiver borrows the
//!   new front buffer for the duration of `on_frame`; it is not drawn into
//!   again until a later swap makes it the back buffer
//!
//! Shutdown is a control message queued behind everything already posted, so
//! `stop_and_wait` returns only after those operations have been applied.

use crate::canvas::{Canvas, CanvasFactory};
use crate::config::Config;
use crate::pipeline::op::{DrawStyle, Operation};
use crate::pipeline::queue::OperationQueue;
use anyhow::{anyhow, Context, Result};
use log::*;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Sink for completed frames.
///
/// Called on the loop thread, once per applied frame-ready signal, never
/// concurrently with itself.
pub trait Receiver<C>: Send {
    fn on_frame(&mut self, canvas: &C);
}

impl<C, F> Receiver<C> for F
where
    F: FnMut(&C) + Send,
{
    fn on_frame(&mut self, canvas: &C) {
        self(canvas)
    }
}

/// Counters reported once the loop has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub operations_applied: u64,
    pub frames_delivered: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What travels through the queue. `Stop` never leaves the loop thread's view.
enum LoopMessage {
    Apply(Operation),
    Stop,
}

/// Cloneable producer handle. Safe to move to and use from any thread.
#[derive(Clone)]
pub struct Poster {
    queue: Arc<OperationQueue<LoopMessage>>,
}

impl Poster {
    /// Enqueues one operation.
    pub fn post(&self, op: Operation) {
        trace!("Poster: post {:?}", op);
        self.queue.push(LoopMessage::Apply(op));
    }

    /// Enqueues a parsed operation list. The operations stay contiguous in
    /// the queue; no other producer's post lands between them.
    pub fn post_all<I>(&self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        self.queue.push_all(ops.into_iter().map(LoopMessage::Apply));
    }
}

/// Handle to a running event loop.
pub struct EventLoop {
    poster: Poster,
    done_rx: Option<mpsc::Receiver<LoopStats>>,
    thread_handle: Option<JoinHandle<()>>,
    stop_requested: bool,
    stats: Option<LoopStats>,
}

impl EventLoop {
    /// Allocates both buffers from `factory` at the configured size and
    /// spawns the loop thread.
    pub fn start<F, R>(mut factory: F, receiver: R, config: &Config) -> Result<Self>
    where
        F: CanvasFactory,
        R: Receiver<F::Canvas> + 'static,
    {
        config.validate().context("Invalid event loop configuration")?;
        let (width, height) = (config.canvas.width, config.canvas.height);
        info!("EventLoop: Allocating {}x{} buffers", width, height);

        let back = factory
            .new_canvas(width, height)
            .context("Failed to allocate back buffer")?;
        let front = factory
            .new_canvas(width, height)
            .context("Failed to allocate front buffer")?;

        let queue = Arc::new(OperationQueue::new());
        let (done_tx, done_rx) = mpsc::channel();

        let worker = LoopWorker {
            back,
            front,
            receiver,
            style: DrawStyle::from(config),
            state: LoopState::Running,
            stats: LoopStats::default(),
        };

        let worker_queue = Arc::clone(&queue);
        let thread_handle = thread::Builder::new()
            .name("painter-loop".to_string())
            .spawn(move || worker.run(&worker_queue, done_tx))
            .context("Failed to spawn event loop thread")?;

        info!("EventLoop: Thread spawned");

        Ok(Self {
            poster: Poster { queue },
            done_rx: Some(done_rx),
            thread_handle: Some(thread_handle),
            stop_requested: false,
            stats: None,
        })
    }

    /// A producer handle for other threads.
    pub fn poster(&self) -> Poster {
        self.poster.clone()
    }

    pub fn post(&self, op: Operation) {
        self.poster.post(op);
    }

    pub fn post_all<I>(&self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        self.poster.post_all(ops);
    }

    /// Queues the stop message behind everything posted so far. Does not wait.
    pub fn stop(&mut self) {
        if self.stop_requested {
            return;
        }
        debug!("EventLoop: Stop requested");
        self.stop_requested = true;
        self.poster.queue.push(LoopMessage::Stop);
    }

    /// Stops the loop and blocks until every operation posted before the stop
    /// has been applied and the thread has exited.
    pub fn stop_and_wait(&mut self) -> Result<LoopStats> {
        if let Some(stats) = self.stats {
            return Ok(stats);
        }
        self.stop();

        let done_rx = self
            .done_rx
            .take()
            .context("Event loop already failed during an earlier stop")?;
        let completion = done_rx.recv();

        if let Some(handle) = self.thread_handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("Event loop thread panicked"))?;
        }

        let stats = completion.context("Event loop exited without signalling completion")?;
        info!(
            "EventLoop: Stopped after {} operations, {} frames",
            stats.operations_applied, stats.frames_delivered
        );
        self.stats = Some(stats);
        Ok(stats)
    }

    pub fn state(&self) -> LoopState {
        if self.stats.is_some() || self.thread_handle.is_none() {
            LoopState::Stopped
        } else {
            LoopState::Running
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            if let Err(e) = self.stop_and_wait() {
                error!("EventLoop: Shutdown on drop failed: {:#}", e);
            }
        }
    }
}

/// State living on the loop thread.
struct LoopWorker<C, R> {
    back: C,
    front: C,
    receiver: R,
    style: DrawStyle,
    state: LoopState,
    stats: LoopStats,
}

impl<C, R> LoopWorker<C, R>
where
    C: Canvas,
    R: Receiver<C>,
{
    fn run(mut self, queue: &OperationQueue<LoopMessage>, done_tx: Sender<LoopStats>) {
        info!("EventLoop: Thread started");

        while self.state == LoopState::Running {
            match queue.pull() {
                LoopMessage::Apply(op) => self.apply(op),
                LoopMessage::Stop => {
                    debug!("EventLoop: Stop message reached the head of the queue");
                    self.state = LoopState::Stopped;
                }
            }
        }

        let leftover = queue.len();
        if leftover > 0 {
            debug!("EventLoop: Discarding {} messages posted after stop", leftover);
        }

        if done_tx.send(self.stats).is_err() {
            warn!("EventLoop: Nobody waiting for completion");
        }
        info!("EventLoop: Thread stopped");
    }

    fn apply(&mut self, op: Operation) {
        trace!("EventLoop: Applying {:?}", op);
        let ready = op.apply(&mut self.back, &self.style);
        self.stats.operations_applied += 1;

        if ready {
            std::mem::swap(&mut self.back, &mut self.front);
            self.receiver.on_frame(&self.front);
            self.stats.frames_delivered += 1;
            debug!("EventLoop: Frame {} delivered", self.stats.frames_delivered);
        }
    }
}
