// Sample handoff - audio callback to analysis loop
//
// `SampleTap` lives in the audio callback: it keeps channel 0 of every
// interleaved frame and copies it into recycled pool buffers. `SampleFeed`
// lives with the analyzer and drains filled buffers in arrival order. When
// the pool runs dry the tap drops the rest of the batch and counts it; it
// never blocks or allocates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::buffer_pool::{BufferPool, ConsumerChannels, ProducerChannels};

#[derive(Debug, Default)]
struct HandoffCounters {
    delivered_samples: AtomicU64,
    dropped_samples: AtomicU64,
    dropped_batches: AtomicU64,
}

/// Snapshot of the handoff counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct HandoffStats {
    pub delivered_samples: u64,
    pub dropped_samples: u64,
    pub dropped_batches: u64,
}

impl HandoffCounters {
    fn snapshot(&self) -> HandoffStats {
        HandoffStats {
            delivered_samples: self.delivered_samples.load(Ordering::Relaxed),
            dropped_samples: self.dropped_samples.load(Ordering::Relaxed),
            dropped_batches: self.dropped_batches.load(Ordering::Relaxed),
        }
    }
}

/// Create a connected tap/feed pair
///
/// # Arguments
/// * `buffer_count` - Number of recycled buffers
/// * `buffer_size` - Mono samples per buffer
///
/// # Panics
/// Panics if either argument is 0
pub fn sample_handoff(buffer_count: usize, buffer_size: usize) -> (SampleTap, SampleFeed) {
    let (producer, consumer) = BufferPool::new(buffer_count, buffer_size);
    let counters = Arc::new(HandoffCounters::default());
    (
        SampleTap {
            channels: producer,
            buffer_size,
            counters: Arc::clone(&counters),
        },
        SampleFeed {
            channels: consumer,
            counters,
        },
    )
}

/// Producer half, owned by the audio callback
pub struct SampleTap {
    channels: ProducerChannels,
    buffer_size: usize,
    counters: Arc<HandoffCounters>,
}

impl SampleTap {
    /// Hand channel 0 of an interleaved frame batch to the analysis loop
    ///
    /// # Returns
    /// Number of frames delivered; frames beyond that were dropped because no
    /// pool buffer was free.
    pub fn push_frames(&mut self, interleaved: &[f32], channels: usize) -> usize {
        let channels = channels.max(1);
        let frames = interleaved.len() / channels;
        let mut mono = interleaved.chunks_exact(channels).map(|frame| frame[0]);
        let mut delivered = 0;

        while delivered < frames {
            let Ok(mut buffer) = self.channels.pool_consumer.pop() else {
                break;
            };
            let take = (frames - delivered).min(self.buffer_size);
            buffer.clear();
            buffer.extend(mono.by_ref().take(take));
            match self.channels.data_producer.push(buffer) {
                Ok(()) => delivered += take,
                Err(_) => break,
            }
        }

        self.counters
            .delivered_samples
            .fetch_add(delivered as u64, Ordering::Relaxed);
        if delivered < frames {
            self.counters
                .dropped_samples
                .fetch_add((frames - delivered) as u64, Ordering::Relaxed);
            self.counters.dropped_batches.fetch_add(1, Ordering::Relaxed);
        }
        delivered
    }

    /// Hand a mono batch to the analysis loop
    pub fn push_mono(&mut self, samples: &[f32]) -> usize {
        self.push_frames(samples, 1)
    }

    pub fn stats(&self) -> HandoffStats {
        self.counters.snapshot()
    }
}

/// Consumer half, owned by the analysis loop
pub struct SampleFeed {
    channels: ConsumerChannels,
    counters: Arc<HandoffCounters>,
}

impl SampleFeed {
    /// Pass every pending buffer to `sink` in arrival order
    ///
    /// Buffers go back to the pool once `sink` returns.
    ///
    /// # Returns
    /// Number of samples drained
    pub fn drain<F>(&mut self, mut sink: F) -> usize
    where
        F: FnMut(&[f32]),
    {
        let mut drained = 0;
        while let Ok(mut buffer) = self.channels.data_consumer.pop() {
            sink(&buffer);
            drained += buffer.len();
            buffer.clear();
            if self.channels.pool_producer.push(buffer).is_err() {
                log::warn!("[SampleFeed] Pool queue full, buffer discarded");
            }
        }
        drained
    }

    /// Filled buffers waiting to be drained
    pub fn pending_buffers(&self) -> usize {
        self.channels.data_consumer.slots()
    }

    pub fn stats(&self) -> HandoffStats {
        self.counters.snapshot()
    }
}
