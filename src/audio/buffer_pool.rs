// BufferPool - recycled sample buffers circulating over dual SPSC queues
//
// Two lock-free rtrb ring buffers carry pre-allocated sample buffers between
// the audio callback and the analysis loop, so the callback never allocates.
//
// - DATA queue: producer pushes filled buffers, consumer pops them
// - POOL queue: consumer returns emptied buffers, producer recycles them
//
// Buffers are handed out empty with their full capacity reserved; the
// producer extends them up to capacity and the consumer clears them before
// returning them to the pool.

use rtrb::{Consumer, Producer};

pub const DEFAULT_BUFFER_COUNT: usize = 64;
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Mono sample buffer; length = samples filled, capacity = buffer size
pub type SampleBuffer = Vec<f32>;

/// Queue ends owned by the audio callback
pub struct ProducerChannels {
    /// Filled buffers going to the analysis loop
    pub data_producer: Producer<SampleBuffer>,
    /// Empty buffers coming back from the analysis loop
    pub pool_consumer: Consumer<SampleBuffer>,
}

/// Queue ends owned by the analysis loop
pub struct ConsumerChannels {
    /// Filled buffers arriving from the audio callback
    pub data_consumer: Consumer<SampleBuffer>,
    /// Empty buffers returned for reuse
    pub pool_producer: Producer<SampleBuffer>,
}

/// Pre-allocated buffer pool split into producer and consumer halves
///
/// # Example
/// ```ignore
/// let (mut producer, mut consumer) = BufferPool::new(16, 1024);
///
/// // Audio callback:
/// if let Ok(mut buffer) = producer.pool_consumer.pop() {
///     buffer.extend_from_slice(&samples);
///     producer.data_producer.push(buffer).ok();
/// }
///
/// // Analysis loop:
/// if let Ok(mut buffer) = consumer.data_consumer.pop() {
///     history.extend_from_slice(&buffer);
///     buffer.clear();
///     consumer.pool_producer.push(buffer).ok();
/// }
/// ```
pub struct BufferPool;

impl BufferPool {
    /// Allocate `buffer_count` buffers of `buffer_size` samples each
    ///
    /// # Panics
    /// Panics if buffer_count is 0 or buffer_size is 0
    #[allow(clippy::new_ret_no_self)]
    pub fn new(buffer_count: usize, buffer_size: usize) -> (ProducerChannels, ConsumerChannels) {
        assert!(buffer_count > 0, "buffer_count must be greater than 0");
        assert!(buffer_size > 0, "buffer_size must be greater than 0");

        let (mut pool_producer, pool_consumer) = rtrb::RingBuffer::new(buffer_count);
        let (data_producer, data_consumer) = rtrb::RingBuffer::new(buffer_count);

        for _ in 0..buffer_count {
            pool_producer
                .push(Vec::with_capacity(buffer_size))
                .expect("pool queue holds exactly buffer_count buffers");
        }

        (
            ProducerChannels {
                data_producer,
                pool_consumer,
            },
            ConsumerChannels {
                data_consumer,
                pool_producer,
            },
        )
    }
}
