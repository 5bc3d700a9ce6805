use crate::TransferError;

/// One chunk of a planned upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedChunk {
    /// 1-based sequence number.
    pub part_no: u32,
    /// Length of this chunk in bytes.
    pub len: u64,
}

/// Splits a source of known size into fixed-size chunks.
///
/// Every chunk is `chunk_size` bytes except the last, which holds the
/// remainder. A zero-byte source plans zero chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    total_size: u64,
    chunk_size: u64,
    total_chunks: u32,
}

impl ChunkPlan {
    /// Plans `total_size` bytes in chunks of `chunk_size` bytes.
    pub fn new(total_size: u64, chunk_size: u64) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::InvalidChunkSize);
        }
        let total_chunks = u32::try_from(total_size.div_ceil(chunk_size))
            .map_err(|_| TransferError::InvalidChunkSize)?;
        Ok(Self {
            total_size,
            chunk_size,
            total_chunks,
        })
    }

    /// Total source size in bytes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of chunks.
    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Length of chunk `part_no` (1-based), or `None` if out of range.
    pub fn chunk_len(&self, part_no: u32) -> Option<u64> {
        if part_no == 0 || part_no > self.total_chunks {
            return None;
        }
        if part_no < self.total_chunks {
            Some(self.chunk_size)
        } else {
            Some(self.total_size - self.chunk_size * u64::from(self.total_chunks - 1))
        }
    }

    /// Iterates the planned chunks in ascending order.
    pub fn chunks(&self) -> impl Iterator<Item = PlannedChunk> + '_ {
        (1..=self.total_chunks).map(move |part_no| PlannedChunk {
            part_no,
            len: self.chunk_len(part_no).unwrap_or(0),
        })
    }
}
