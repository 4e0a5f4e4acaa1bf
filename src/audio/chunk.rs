//! Fixed-cadence LINEAR16 chunk packing

/// Accumulates f32 sample buffers and emits fixed-duration LINEAR16
/// (16-bit signed little-endian) chunks for the recognition stream.
///
/// cpal delivers buffers of whatever size the device favors; the backend
/// wants a steady chunk cadence, so leftover samples carry over to the next
/// call. Single-threaded, owned by the chunk-forwarding loop.
#[derive(Debug)]
pub struct ChunkPacker {
    chunk_samples: usize,
    pending: Vec<f32>,
}

impl ChunkPacker {
    pub fn new(chunk_samples: usize) -> Self {
        Self {
            chunk_samples: chunk_samples.max(1),
            pending: Vec::with_capacity(chunk_samples.max(1)),
        }
    }

    /// Feed captured samples; returns every complete chunk now available.
    pub fn push(&mut self, samples: &[f32]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(samples);

        let mut chunks = Vec::new();
        while self.pending.len() >= self.chunk_samples {
            let rest = self.pending.split_off(self.chunk_samples);
            let chunk = std::mem::replace(&mut self.pending, rest);
            chunks.push(encode_linear16(&chunk));
        }
        chunks
    }

    /// Samples waiting for the next complete chunk
    pub fn pending_samples(&self) -> usize {
        self.pending.len()
    }
}

/// Convert f32 samples in [-1, 1] to 16-bit signed little-endian bytes
pub fn encode_linear16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}
