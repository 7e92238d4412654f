//! Staged async command scheduler.
//!
//! Host → `pending` → worker (process) → `exchange` → RT (exchange) → `tidy`
//! → worker (tidy-up) → `finished` → RT (reply, destroy).
//!
//! Every queue holds at most `capacity` jobs and a job sits in exactly one
//! queue at a time, so forwarding between stages never fails.

use crate::error::{Result, WrapperError};
use crate::host::AsyncCommand;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 64;

const IDLE_SLEEP: Duration = Duration::from_micros(100);

struct Job {
    command: AsyncCommand,
    processed: bool,
}

pub(crate) struct Scheduler {
    capacity: usize,
    pending: ArrayQueue<AsyncCommand>,
    exchange: ArrayQueue<Job>,
    tidy: ArrayQueue<Job>,
    finished: ArrayQueue<Job>,
    in_flight: AtomicUsize,
    running: AtomicBool,
}

impl Scheduler {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pending: ArrayQueue::new(capacity),
            exchange: ArrayQueue::new(capacity),
            tidy: ArrayQueue::new(capacity),
            finished: ArrayQueue::new(capacity),
            in_flight: AtomicUsize::new(0),
            running: AtomicBool::new(true),
        }
    }

    /// Queue a command for its process stage.
    ///
    /// A rejected command is destroyed before returning.
    pub(crate) fn submit(&self, command: AsyncCommand) -> Result<()> {
        if !self.is_running() {
            command.stages.destroy();
            return Err(WrapperError::ShutDown);
        }
        let reserved = self
            .in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            });
        if reserved.is_err() {
            command.stages.destroy();
            return Err(WrapperError::SchedulerFull {
                capacity: self.capacity,
            });
        }
        forward(&self.pending, command);

        // Lost a race with `stop`: nothing will run the stages.
        if !self.is_running() {
            self.drain();
            return Err(WrapperError::ShutDown);
        }
        Ok(())
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// One worker pass: process at most one new command and tidy up at most
    /// one exchanged command. Returns whether anything ran.
    pub(crate) fn run_worker_once(&self) -> bool {
        let mut worked = false;

        if let Some(mut command) = self.pending.pop() {
            let processed = command.stages.process();
            forward(&self.exchange, Job { command, processed });
            worked = true;
        }

        if let Some(mut job) = self.tidy.pop() {
            job.command.stages.tidy_up();
            forward(&self.finished, job);
            worked = true;
        }

        worked
    }

    /// Real-time side: exchange every processed command, then finish every
    /// tidied one.
    ///
    /// `on_exchanged` runs after a successful process and exchange;
    /// `on_finished` runs right before the command is destroyed. Returns the
    /// number of commands destroyed.
    pub(crate) fn run_rt_stages(
        &self,
        mut on_exchanged: impl FnMut(&AsyncCommand),
        mut on_finished: impl FnMut(&AsyncCommand),
    ) -> usize {
        while let Some(mut job) = self.exchange.pop() {
            let exchanged = job.command.stages.exchange();
            if job.processed && exchanged {
                on_exchanged(&job.command);
            }
            forward(&self.tidy, job);
        }

        let mut destroyed = 0;
        while let Some(job) = self.finished.pop() {
            on_finished(&job.command);
            job.command.stages.destroy();
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            destroyed += 1;
        }
        destroyed
    }

    pub(crate) fn spawn_worker(self: &Arc<Self>) -> std::io::Result<thread::JoinHandle<()>> {
        let scheduler = Arc::clone(self);
        thread::Builder::new()
            .name("ugenwrap-worker".to_string())
            .spawn(move || {
                while scheduler.is_running() {
                    if !scheduler.run_worker_once() {
                        thread::sleep(IDLE_SLEEP);
                    }
                }
            })
    }

    pub(crate) fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Destroy every queued command without running its remaining stages.
    pub(crate) fn drain(&self) -> usize {
        let mut dropped = 0;
        while let Some(command) = self.pending.pop() {
            command.stages.destroy();
            dropped += 1;
        }
        for queue in [&self.exchange, &self.tidy, &self.finished] {
            while let Some(job) = queue.pop() {
                job.command.stages.destroy();
                dropped += 1;
            }
        }
        self.in_flight.fetch_sub(dropped, Ordering::AcqRel);
        dropped
    }
}

fn forward<T>(queue: &ArrayQueue<T>, item: T) {
    let pushed = queue.push(item).is_ok();
    assert!(pushed, "async stage queue overflow");
}
