//! Bounded single-producer/single-consumer handoff of [`AudioBlock`]s.
//!
//! The producer half lives in the capture callback and never blocks: when the
//! ring is full the *incoming* block is dropped and counted (drop-newest). The
//! consumer half blocks in [`BlockConsumer::pop`] until a block arrives or the
//! queue is closed. Closing discards whatever is still queued.

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::Thread;
use std::time::Duration;
use voxdrive_core::AudioBlock;

/// Upper bound on how long a parked consumer sleeps before re-checking.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

struct QueueShared {
    closed: AtomicBool,
    pushed: AtomicU64,
    dropped: AtomicU64,
    waiter: OnceLock<Thread>,
}

impl QueueShared {
    fn wake(&self) {
        if let Some(thread) = self.waiter.get() {
            thread.unpark();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Queue was full; the block was discarded.
    Dropped,
    /// Queue was closed; the block was discarded.
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub pushed: u64,
    pub dropped: u64,
}

/// Create a block queue holding at most `capacity` blocks.
pub fn block_queue(capacity: usize) -> (BlockProducer, BlockConsumer) {
    let (prod, cons) = HeapRb::<AudioBlock>::new(capacity).split();
    let shared = Arc::new(QueueShared {
        closed: AtomicBool::new(false),
        pushed: AtomicU64::new(0),
        dropped: AtomicU64::new(0),
        waiter: OnceLock::new(),
    });
    (
        BlockProducer {
            inner: prod,
            shared: Arc::clone(&shared),
        },
        BlockConsumer {
            inner: cons,
            shared,
            poll_interval: DEFAULT_POLL_INTERVAL,
        },
    )
}

// ── BlockProducer ─────────────────────────────────────────────

pub struct BlockProducer {
    inner: HeapProd<AudioBlock>,
    shared: Arc<QueueShared>,
}

impl BlockProducer {
    pub fn push(&mut self, block: AudioBlock) -> PushOutcome {
        if self.shared.closed.load(Ordering::Acquire) {
            return PushOutcome::Closed;
        }
        match self.inner.try_push(block) {
            Ok(()) => {
                self.shared.pushed.fetch_add(1, Ordering::Relaxed);
                self.shared.wake();
                PushOutcome::Queued
            }
            Err(_rejected) => {
                self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                PushOutcome::Dropped
            }
        }
    }

    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

// ── BlockConsumer ─────────────────────────────────────────────

pub struct BlockConsumer {
    inner: HeapCons<AudioBlock>,
    shared: Arc<QueueShared>,
    poll_interval: Duration,
}

impl BlockConsumer {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Block until the next block is available. Returns `None` once the queue
    /// is closed, without handing out blocks that were still queued.
    pub fn pop(&mut self) -> Option<AudioBlock> {
        let _ = self.shared.waiter.get_or_init(std::thread::current);
        loop {
            if self.shared.closed.load(Ordering::Acquire) {
                return None;
            }
            if let Some(block) = self.inner.try_pop() {
                return Some(block);
            }
            std::thread::park_timeout(self.poll_interval);
        }
    }

    pub fn try_pop(&mut self) -> Option<AudioBlock> {
        if self.shared.closed.load(Ordering::Acquire) {
            return None;
        }
        self.inner.try_pop()
    }

    pub fn len(&self) -> usize {
        self.inner.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every queued block, returning how many were discarded.
    pub fn discard_pending(&mut self) -> usize {
        let mut discarded = 0;
        while self.inner.try_pop().is_some() {
            discarded += 1;
        }
        discarded
    }

    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

// ── QueueHandle ───────────────────────────────────────────────

/// Cloneable control surface for a queue: close it and read its counters.
#[derive(Clone)]
pub struct QueueHandle {
    shared: Arc<QueueShared>,
}

impl QueueHandle {
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.wake();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            pushed: self.shared.pushed.load(Ordering::Relaxed),
            dropped: self.shared.dropped.load(Ordering::Relaxed),
        }
    }
}
