// Audio module - lock-free sample handoff from the audio callback

pub mod buffer_pool;
pub mod tap;

pub use buffer_pool::{BufferPool, SampleBuffer, DEFAULT_BUFFER_COUNT, DEFAULT_BUFFER_SIZE};
pub use tap::{sample_handoff, HandoffStats, SampleFeed, SampleTap};
