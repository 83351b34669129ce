//! Captured frame type

use bytes::Bytes;
use std::time::SystemTime;

/// One captured link-layer frame.
///
/// Frames are immutable once created. The capture loop hands each frame to
/// the per-frame callback by value.
#[derive(Debug, Clone)]
pub struct Frame {
    timestamp: SystemTime,
    data: Bytes,
    wire_len: usize,
}

impl Frame {
    /// Create a frame whose captured bytes are the whole wire frame
    pub fn new(timestamp: SystemTime, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let wire_len = data.len();
        Self {
            timestamp,
            data,
            wire_len,
        }
    }

    /// Create a frame that was truncated by the snapshot length
    pub fn truncated(timestamp: SystemTime, data: impl Into<Bytes>, wire_len: usize) -> Self {
        let data = data.into();
        let wire_len = wire_len.max(data.len());
        Self {
            timestamp,
            data,
            wire_len,
        }
    }

    /// When the frame was captured
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Captured bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of captured bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no bytes were captured
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the frame on the wire
    pub fn wire_len(&self) -> usize {
        self.wire_len
    }

    /// Whether the snapshot length cut the frame short
    pub fn is_truncated(&self) -> bool {
        self.wire_len > self.data.len()
    }
}
