//! Handoff of finished waveform data to render-side readers.
//!
//! A [`SnapshotPublisher`] owns the latest heights and time scale as one
//! immutable [`WaveformSnapshot`] behind a `tokio::sync::watch` channel.
//! Readers take the whole snapshot once per paint or gesture, so the heights
//! and density they use always belong together. Normalization can run on the
//! blocking pool; only its finished result is swapped in.
//!
//! Heights and scale are versioned separately. A duration change while a
//! recompute is running replaces the scale but leaves the pending heights
//! free to land.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::timeline::TimeScale;
use crate::waveform::normalize;

/// Heights and the time scale they are drawn against.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSnapshot {
    /// Generation of `heights`; 0 is the initial empty waveform
    pub generation: u64,
    /// Generation of `scale`
    pub scale_generation: u64,
    pub heights: Arc<[i32]>,
    pub scale: TimeScale,
}

impl WaveformSnapshot {
    fn empty(scale: TimeScale) -> Self {
        Self {
            generation: 0,
            scale_generation: 0,
            heights: Arc::from(Vec::new()),
            scale,
        }
    }
}

/// Single writer side of the snapshot channel.
///
/// Cloning shares the same channel and generation counter.
#[derive(Clone)]
pub struct SnapshotPublisher {
    sender: Arc<watch::Sender<Arc<WaveformSnapshot>>>,
    next_generation: Arc<AtomicU64>,
}

impl SnapshotPublisher {
    /// Starts with an empty waveform under `scale`.
    pub fn new(scale: TimeScale) -> Self {
        let (sender, _) = watch::channel(Arc::new(WaveformSnapshot::empty(scale)));
        Self {
            sender: Arc::new(sender),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader {
            receiver: self.sender.subscribe(),
        }
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<WaveformSnapshot> {
        Arc::clone(&self.sender.borrow())
    }

    /// Publishes finished heights with their scale and returns the generation.
    pub fn publish(&self, heights: Vec<i32>, scale: TimeScale) -> u64 {
        let generation = self.reserve();
        self.install(generation, Some(heights.into()), scale);
        generation
    }

    /// Replaces only the time scale. The current heights, and any recompute
    /// still running, are left alone.
    pub fn set_scale(&self, scale: TimeScale) -> u64 {
        let generation = self.reserve();
        self.install(generation, None, scale);
        generation
    }

    /// Normalizes `raw` on the blocking pool and publishes the result.
    ///
    /// The generation is reserved before the work starts. If newer heights
    /// were published by the time this one finishes, the result is dropped and
    /// the task yields `Ok(None)`. `scale` only applies if no newer scale was
    /// set in the meantime.
    pub fn recompute(
        &self,
        raw: Vec<i32>,
        half_height_px: i32,
        scale: TimeScale,
    ) -> JoinHandle<Result<Option<u64>>> {
        let generation = self.reserve();
        let publisher = self.clone();
        tokio::task::spawn_blocking(move || {
            let heights = normalize(&raw, half_height_px)?;
            let installed = publisher.install(generation, Some(heights.into()), scale);
            Ok(installed.then_some(generation))
        })
    }

    fn reserve(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    /// Swaps in whichever of `heights` and `scale` is newer than what is
    /// visible, reading the current snapshot under the channel lock.
    ///
    /// Returns whether the heights (or, for a scale-only update, the scale)
    /// were taken.
    fn install(&self, generation: u64, heights: Option<Arc<[i32]>>, scale: TimeScale) -> bool {
        let scale_only = heights.is_none();
        let mut taken = false;
        self.sender.send_if_modified(|current| {
            let new_heights = heights.filter(|_| generation > current.generation);
            let new_scale = generation > current.scale_generation;
            taken = if scale_only { new_scale } else { new_heights.is_some() };
            if new_heights.is_none() && !new_scale {
                return false;
            }

            let mut next = (**current).clone();
            if let Some(heights) = new_heights {
                next.generation = generation;
                next.heights = heights;
            }
            if new_scale {
                next.scale_generation = generation;
                next.scale = scale;
            }
            *current = Arc::new(next);
            true
        });
        if !taken {
            tracing::debug!("Dropped stale waveform snapshot {}", generation);
        }
        taken
    }
}

/// Reader side, one per render loop or gesture handler.
#[derive(Clone)]
pub struct SnapshotReader {
    receiver: watch::Receiver<Arc<WaveformSnapshot>>,
}

impl SnapshotReader {
    /// Snapshot to use for the whole of one paint or interaction cycle.
    pub fn current(&self) -> Arc<WaveformSnapshot> {
        Arc::clone(&self.receiver.borrow())
    }

    /// Marks the current snapshot as seen and returns it.
    pub fn take(&mut self) -> Arc<WaveformSnapshot> {
        Arc::clone(&self.receiver.borrow_and_update())
    }

    /// Waits for the next publication. Returns `false` once every publisher
    /// is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}
