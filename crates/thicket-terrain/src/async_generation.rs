//! Background chunk generation on a fixed worker pool.
//!
//! Tasks go through a bounded channel to worker threads that share one
//! [`TerrainGenerator`]. Finished columns come back on a second bounded
//! channel. A task can be cancelled until its result has been drained.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use thicket_config::GenerationConfig;
use thicket_math::ChunkPos;
use thicket_voxel::ChunkColumn;

use crate::error::TerrainError;
use crate::generator::TerrainGenerator;

/// A request to generate a single chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationTask {
    pub pos: ChunkPos,
    /// Lower values are submitted first by [`ChunkWorkerPool::submit_all`].
    /// Usually the squared distance to whatever is asking for chunks.
    pub priority: u64,
}

/// A generated column ready to be stored.
#[derive(Debug)]
pub struct GeneratedChunk {
    pub pos: ChunkPos,
    pub column: ChunkColumn,
    /// Generation time in microseconds.
    pub generation_time_us: u64,
}

struct QueuedTask {
    task: GenerationTask,
    cancelled: Arc<AtomicBool>,
}

/// Runs [`TerrainGenerator::generate_chunk`] across a thread pool.
pub struct ChunkWorkerPool {
    task_sender: Sender<QueuedTask>,
    result_receiver: Receiver<GeneratedChunk>,
    active_tasks: Arc<DashMap<ChunkPos, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl ChunkWorkerPool {
    /// Start `thread_count` workers.
    ///
    /// At most `max_concurrent * 2` tasks may be queued; further submissions
    /// are handed back. `result_capacity` bounds the finished-chunk channel.
    pub fn new(
        generator: Arc<TerrainGenerator>,
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> Result<Self, TerrainError> {
        let (task_sender, task_receiver) = bounded::<QueuedTask>(max_concurrent * 2);
        let (result_sender, result_receiver) = bounded::<GeneratedChunk>(result_capacity);
        let in_flight = Arc::new(AtomicU64::new(0));

        for index in 0..thread_count {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let generator = Arc::clone(&generator);

            std::thread::Builder::new()
                .name(format!("thicket-gen-worker-{index}"))
                .spawn(move || {
                    while let Ok(queued) = receiver.recv() {
                        if queued.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = Instant::now();
                        let column = generator.generate_chunk(queued.task.pos);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if !queued.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(GeneratedChunk {
                                pos: queued.task.pos,
                                column,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .map_err(TerrainError::Spawn)?;
        }

        tracing::debug!(threads = thread_count, max_concurrent, "Chunk worker pool started");

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Pool sized from the CPU count, leaving two cores free.
    pub fn with_defaults(generator: Arc<TerrainGenerator>) -> Result<Self, TerrainError> {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(generator, threads, 64, 128)
    }

    /// Pool sized from the generation settings. Zero worker threads means
    /// "pick from the CPU count".
    pub fn from_config(
        generator: Arc<TerrainGenerator>,
        config: &GenerationConfig,
    ) -> Result<Self, TerrainError> {
        let threads = match config.worker_threads {
            0 => num_cpus::get().saturating_sub(2).max(1),
            n => n,
        };
        let capacity = config.queue_capacity.max(1);
        Self::new(generator, threads, capacity, capacity)
    }

    /// Queue a chunk. Returns the task back if the queue is full.
    pub fn submit(&self, task: GenerationTask) -> Result<(), GenerationTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(task.pos, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(QueuedTask { task, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let rejected = e.into_inner().task;
                self.active_tasks.remove(&rejected.pos);
                rejected
            })
    }

    /// Queue several chunks, lowest priority value first. Returns the tasks
    /// that did not fit.
    pub fn submit_all(&self, mut tasks: Vec<GenerationTask>) -> Vec<GenerationTask> {
        tasks.sort_by_key(|task| task.priority);
        tasks
            .into_iter()
            .filter_map(|task| self.submit(task).err())
            .collect()
    }

    /// Cancel a queued or running task. No-op once its result was drained.
    pub fn cancel(&self, pos: &ChunkPos) {
        if let Some((_, cancelled)) = self.active_tasks.remove(pos) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Take every finished chunk without blocking.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        while let Ok(chunk) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&chunk.pos);
            results.push(chunk);
        }
        results
    }

    /// Wait up to `timeout` for the next finished chunk.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<GeneratedChunk> {
        let chunk = self.result_receiver.recv_timeout(timeout).ok()?;
        self.active_tasks.remove(&chunk.pos);
        Some(chunk)
    }

    /// Tasks queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn is_pending(&self, pos: &ChunkPos) -> bool {
        self.active_tasks.contains_key(pos)
    }
}
