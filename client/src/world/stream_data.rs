use std::collections::{HashMap, VecDeque};

use log::warn;

use kbe_shared::StreamId;

/// What a stream carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamType {
    Data,
    File,
    Other(i8),
}

impl From<i8> for StreamType {
    fn from(raw: i8) -> Self {
        match raw {
            0 => StreamType::Data,
            1 => StreamType::File,
            other => StreamType::Other(other),
        }
    }
}

impl From<StreamType> for i8 {
    fn from(stream_type: StreamType) -> Self {
        match stream_type {
            StreamType::Data => 0,
            StreamType::File => 1,
            StreamType::Other(raw) => raw,
        }
    }
}

/// Upper bound on the buffer reserved up front from an announced stream size
const MAX_PREALLOCATION: usize = 64 * 1024;

/// Completed streams kept for the application; the oldest is dropped past this
pub const MAX_COMPLETED_STREAMS: usize = 32;

/// A fully received out-of-band transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStream {
    pub stream_id: StreamId,
    pub description: String,
    pub stream_type: StreamType,
    pub data: Vec<u8>,
}

#[derive(Debug)]
struct StreamTransfer {
    size: usize,
    description: String,
    stream_type: StreamType,
    data: Vec<u8>,
}

/// Assembles chunked transfers. Data becomes readable only once a stream completes.
#[derive(Debug, Default)]
pub struct StreamDataStore {
    in_progress: HashMap<StreamId, StreamTransfer>,
    completed: HashMap<StreamId, CompletedStream>,
    completed_order: VecDeque<StreamId>,
}

impl StreamDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(
        &mut self,
        stream_id: StreamId,
        size: usize,
        description: impl Into<String>,
        stream_type: StreamType,
    ) {
        if self.in_progress.contains_key(&stream_id) {
            warn!("stream {} restarted before completing", stream_id);
        }
        self.forget_completed(stream_id);
        self.in_progress.insert(
            stream_id,
            StreamTransfer {
                size,
                description: description.into(),
                stream_type,
                data: Vec::with_capacity(size.min(MAX_PREALLOCATION)),
            },
        );
    }

    /// Appends a chunk. Returns false for a stream that was never started.
    pub fn append(&mut self, stream_id: StreamId, chunk: &[u8]) -> bool {
        let Some(transfer) = self.in_progress.get_mut(&stream_id) else {
            return false;
        };
        transfer.data.extend_from_slice(chunk);
        if transfer.data.len() > transfer.size {
            warn!(
                "stream {} received {} bytes, more than the {} announced",
                stream_id,
                transfer.data.len(),
                transfer.size
            );
        }
        true
    }

    /// Finishes a stream. Returns None for a stream that was never started.
    pub fn complete(&mut self, stream_id: StreamId) -> Option<&CompletedStream> {
        let transfer = self.in_progress.remove(&stream_id)?;
        if transfer.data.len() != transfer.size {
            warn!(
                "stream {} completed with {} bytes, {} announced",
                stream_id,
                transfer.data.len(),
                transfer.size
            );
        }
        self.forget_completed(stream_id);
        if self.completed_order.len() >= MAX_COMPLETED_STREAMS {
            if let Some(oldest) = self.completed_order.pop_front() {
                warn!("dropping unread completed stream {}", oldest);
                self.completed.remove(&oldest);
            }
        }
        self.completed_order.push_back(stream_id);
        self.completed.insert(
            stream_id,
            CompletedStream {
                stream_id,
                description: transfer.description,
                stream_type: transfer.stream_type,
                data: transfer.data,
            },
        );
        self.completed.get(&stream_id)
    }

    pub fn completed(&self, stream_id: StreamId) -> Option<&CompletedStream> {
        self.completed.get(&stream_id)
    }

    pub fn take_completed(&mut self, stream_id: StreamId) -> Option<CompletedStream> {
        self.forget_completed(stream_id)
    }

    fn forget_completed(&mut self, stream_id: StreamId) -> Option<CompletedStream> {
        self.completed_order.retain(|id| *id != stream_id);
        self.completed.remove(&stream_id)
    }

    pub fn is_in_progress(&self, stream_id: StreamId) -> bool {
        self.in_progress.contains_key(&stream_id)
    }
}
