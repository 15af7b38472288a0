//! Index buffers
//!
//! Indices are not checked against any vertex buffer here; the rasterizer skips
//! out-of-range indices per draw call.

use crate::error::BufferError;

/// Owned array of vertex indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexBuffer {
    data: Vec<u32>,
}

impl IndexBuffer {
    pub fn new(indices: &[u32]) -> Self {
        let mut data = Vec::new();
        if data.try_reserve_exact(indices.len()).is_err() {
            log::error!("failed to allocate {} indices", indices.len());
            return Self::default();
        }
        data.extend_from_slice(indices);
        Self { data }
    }

    /// `count` zero indices
    pub fn zeroed(count: usize) -> Self {
        let mut data = Vec::new();
        if data.try_reserve_exact(count).is_err() {
            log::error!("failed to allocate {} indices", count);
            return Self::default();
        }
        data.resize(count, 0);
        Self { data }
    }

    /// Replaces the contents, reallocating to grow or truncating (with the freed
    /// tail zeroed) to shrink. An empty slice leaves the buffer untouched.
    pub fn update(&mut self, indices: &[u32]) -> Result<(), BufferError> {
        if indices.is_empty() {
            return Ok(());
        }
        let old = self.data.len();
        if indices.len() > old {
            self.data
                .try_reserve_exact(indices.len() - old)
                .map_err(|_| BufferError::OutOfMemory(indices.len() * std::mem::size_of::<u32>()))?;
            self.data.resize(indices.len(), 0);
        } else if indices.len() < old {
            self.data[indices.len()..].fill(0);
            self.data.truncate(indices.len());
        }
        self.data.copy_from_slice(indices);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        self.data.get(i).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.data.iter().copied()
    }
}

impl From<Vec<u32>> for IndexBuffer {
    fn from(data: Vec<u32>) -> Self {
        Self { data }
    }
}
