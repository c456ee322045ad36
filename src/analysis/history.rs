// Sample history - fixed-capacity rolling window of recent mono samples
//
// Stored as a ring buffer so each push is O(1); readers get the samples
// linearized oldest-first, exactly as a shift-left history would hold them.

use super::window::HannWindow;

/// Rolling history of the most recent `capacity` samples
///
/// Always holds exactly `capacity` samples; a fresh history is all zeros.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    ring: Vec<f32>,
    /// Index of the oldest sample (next slot to overwrite)
    head: usize,
}

impl SampleHistory {
    /// Create a zero-filled history
    ///
    /// # Panics
    /// Panics if capacity is 0
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be greater than 0");
        Self {
            ring: vec![0.0; capacity],
            head: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Append one sample, evicting the oldest
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.ring[self.head] = sample;
        self.head += 1;
        if self.head == self.ring.len() {
            self.head = 0;
        }
    }

    /// Append every sample of a mono slice in order
    pub fn extend_from_slice(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// Append channel 0 of an interleaved frame batch
    ///
    /// # Arguments
    /// * `interleaved` - Frames laid out as `[ch0, ch1, .., ch0, ch1, ..]`
    /// * `channels` - Channels per frame (0 is treated as 1)
    pub fn push_frames(&mut self, interleaved: &[f32], channels: usize) {
        for frame in interleaved.chunks_exact(channels.max(1)) {
            self.push(frame[0]);
        }
    }

    /// Sample at position `index`, where 0 is the oldest
    pub fn get(&self, index: usize) -> Option<f32> {
        if index >= self.ring.len() {
            return None;
        }
        let slot = (self.head + index) % self.ring.len();
        Some(self.ring[slot])
    }

    /// Most recently pushed sample
    pub fn latest(&self) -> f32 {
        let slot = if self.head == 0 {
            self.ring.len() - 1
        } else {
            self.head - 1
        };
        self.ring[slot]
    }

    /// Copy the samples oldest-first into `output`
    ///
    /// # Panics
    /// Panics if `output.len() != self.len()`
    pub fn copy_ordered(&self, output: &mut [f32]) {
        assert_eq!(output.len(), self.ring.len(), "output length mismatch");
        let tail = self.ring.len() - self.head;
        output[..tail].copy_from_slice(&self.ring[self.head..]);
        output[tail..].copy_from_slice(&self.ring[..self.head]);
    }

    pub fn to_vec(&self) -> Vec<f32> {
        let mut output = vec![0.0; self.ring.len()];
        self.copy_ordered(&mut output);
        output
    }

    /// Write the windowed snapshot into `output` without touching the history
    pub fn windowed_into(&self, window: &HannWindow, output: &mut [f32]) {
        self.copy_ordered(output);
        for (sample, &coefficient) in output.iter_mut().zip(window.coefficients()) {
            *sample *= coefficient;
        }
    }

    /// Windowed snapshot of the history
    pub fn window(&self, window: &HannWindow) -> Vec<f32> {
        let mut output = vec![0.0; self.ring.len()];
        self.windowed_into(window, &mut output);
        output
    }

    /// Zero every sample (used when a new track starts)
    pub fn reset(&mut self) {
        self.ring.fill(0.0);
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_is_zeroed() {
        let history = SampleHistory::new(8);
        assert_eq!(history.len(), 8);
        assert_eq!(history.to_vec(), vec![0.0; 8]);
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut history = SampleHistory::new(4);
        for i in 1..=6 {
            history.push(i as f32);
        }
        assert_eq!(history.to_vec(), vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(history.get(0), Some(3.0));
        assert_eq!(history.get(3), Some(6.0));
        assert_eq!(history.get(4), None);
        assert_eq!(history.latest(), 6.0);
    }

    #[test]
    fn test_length_is_invariant() {
        let mut history = SampleHistory::new(16);
        for i in 0..1000 {
            history.push(i as f32);
            assert_eq!(history.len(), 16);
        }
    }

    #[test]
    fn test_push_frames_takes_left_channel() {
        let mut history = SampleHistory::new(3);
        history.push_frames(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0], 2);
        assert_eq!(history.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_window_does_not_mutate_history() {
        let mut history = SampleHistory::new(32);
        for i in 0..40 {
            history.push((i as f32 * 0.1).cos());
        }
        let before = history.to_vec();
        let window = HannWindow::new(32);

        let first = history.window(&window);
        let second = history.window(&window);

        assert_eq!(first, second);
        assert_eq!(history.to_vec(), before);
        assert_eq!(first, window.apply(&before));
    }

    #[test]
    fn test_reset_clears_samples() {
        let mut history = SampleHistory::new(4);
        history.extend_from_slice(&[1.0, 2.0, 3.0]);
        history.reset();
        assert_eq!(history.to_vec(), vec![0.0; 4]);
    }

    #[test]
    #[should_panic(expected = "history capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        SampleHistory::new(0);
    }
}
