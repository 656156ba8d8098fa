use crate::error::{MemoryError, MemoryResult};
use crate::process::ProcessId;

/// One slot of physical memory. Occupied iff it has an owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    owner: Option<ProcessId>,
}

impl Frame {
    /// Whether some process owns this frame
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.owner.is_some()
    }

    /// Owning process, `None` while free
    #[inline]
    pub fn owner(&self) -> Option<ProcessId> {
        self.owner
    }
}

/// Fixed pool of frames shared by all processes
#[derive(Debug, Clone)]
pub struct FramePool {
    frames: Box<[Frame]>,
}

impl FramePool {
    /// Create a pool of `total_frames` free frames
    pub fn new(total_frames: usize) -> Self {
        FramePool {
            frames: vec![Frame::default(); total_frames].into_boxed_slice(),
        }
    }

    /// Total number of frames in the pool
    #[inline]
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    /// Number of owned frames, counted from the slots each time
    pub fn occupied_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_occupied()).count()
    }

    /// Number of frames without an owner
    pub fn free_count(&self) -> usize {
        self.capacity() - self.occupied_count()
    }

    /// True iff no free frame exists
    pub fn is_full(&self) -> bool {
        self.frames.iter().all(Frame::is_occupied)
    }

    /// Lowest-indexed free frame, if any
    pub fn first_free(&self) -> Option<usize> {
        self.frames.iter().position(|f| !f.is_occupied())
    }

    /// Get a frame by index
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Owner of a frame; `None` if free or out of range
    pub fn owner_of(&self, index: usize) -> Option<ProcessId> {
        self.frames.get(index).and_then(Frame::owner)
    }

    /// Frames currently owned by `process`, in index order
    pub fn frames_owned_by(&self, process: ProcessId) -> Vec<usize> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| f.owner == Some(process))
            .map(|(i, _)| i)
            .collect()
    }

    /// Occupancy as a percentage of the pool
    pub fn occupancy_percent(&self) -> f64 {
        if self.capacity() == 0 {
            return 0.0;
        }
        self.occupied_count() as f64 * 100.0 / self.capacity() as f64
    }

    /// Give a free frame to `process`
    pub fn assign(&mut self, index: usize, process: ProcessId) -> MemoryResult<()> {
        let frame = self
            .frames
            .get_mut(index)
            .ok_or(MemoryError::FrameOutOfRange(index))?;
        if let Some(owner) = frame.owner {
            return Err(MemoryError::InvariantViolation { frame: index, owner });
        }
        frame.owner = Some(process);
        Ok(())
    }

    /// Free an occupied frame, returning its previous owner
    pub fn release(&mut self, index: usize) -> MemoryResult<ProcessId> {
        let frame = self
            .frames
            .get_mut(index)
            .ok_or(MemoryError::FrameOutOfRange(index))?;
        frame.owner.take().ok_or(MemoryError::FrameNotOccupied(index))
    }

    /// Owner of every frame in index order
    pub fn snapshot(&self) -> Vec<Option<ProcessId>> {
        self.frames.iter().map(Frame::owner).collect()
    }
}

/// FIFO of occupied frame indices in the order they were filled.
///
/// Fixed-capacity ring buffer with independent head and tail cursors.
#[derive(Debug, Clone)]
pub struct ReclamationQueue {
    slots: Box<[usize]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl ReclamationQueue {
    /// Create an empty queue holding at most `capacity` frame indices
    pub fn new(capacity: usize) -> Self {
        ReclamationQueue {
            slots: vec![0usize; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Maximum number of entries (the pool size)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of queued frames; matches the pool's occupied count
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no frame is queued
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Oldest entry without removing it
    pub fn peek(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[self.head])
        }
    }

    /// Append a newly assigned frame at the tail
    pub fn enqueue(&mut self, frame: usize) -> MemoryResult<()> {
        if self.len == self.capacity() {
            return Err(MemoryError::QueueFull);
        }
        self.slots[self.tail] = frame;
        self.tail = (self.tail + 1) % self.capacity();
        self.len += 1;
        Ok(())
    }

    /// Remove and return the oldest frame at the head
    pub fn dequeue(&mut self) -> MemoryResult<usize> {
        if self.is_empty() {
            return Err(MemoryError::EmptyQueue);
        }
        let frame = self.slots[self.head];
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Ok(frame)
    }

    /// Entries from head (oldest) to tail (newest)
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % self.capacity()])
    }
}
