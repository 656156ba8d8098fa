use log::{debug, trace};

use crate::error::MemoryResult;
use crate::memory::{FramePool, ReclamationQueue};
use crate::process::{Process, ProcessId};

/// A frame handed to the requesting process during one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub frame: usize,
    /// Position of this assignment within the call, starting at 0
    pub order: usize,
}

/// A frame reclaimed from the head of the FIFO to make room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub frame: usize,
    pub victim: ProcessId,
}

/// Outcome of one `allocate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    pub process: ProcessId,
    pub assignments: Vec<Assignment>,
    pub evictions: Vec<Eviction>,
    /// True when this call resumed a capped request
    pub resumed: bool,
    pub pages_allocated: usize,
    pub pending_pages: usize,
}

impl AllocationResult {
    #[inline]
    pub fn frames_allocated(&self) -> usize {
        self.assignments.len()
    }
}

/// Grant `process` its outstanding demand for this pass.
///
/// Free frames are taken lowest index first. When the pool is full the frame
/// at the head of `queue` is released no matter who owns it, and the scan is
/// retried. The victim's own counters are left to the caller.
pub fn allocate(
    process: &mut Process,
    pool: &mut FramePool,
    queue: &mut ReclamationQueue,
    max_pages_per_process: usize,
) -> MemoryResult<AllocationResult> {
    let resumed = process.has_pending();
    let mut demand = process.outstanding_demand(max_pages_per_process);
    // Demand can exceed the pool many times over; never reserve more than one pool's worth
    let mut assignments = Vec::with_capacity(demand.min(pool.capacity()));
    let mut evictions = Vec::new();

    debug!(
        "{}: {} pass, demand {} of {} pages",
        process.id,
        if resumed { "resume" } else { "first" },
        demand,
        process.pages_needed
    );

    while demand > 0 {
        match pool.first_free() {
            Some(frame) => {
                pool.assign(frame, process.id)?;
                queue.enqueue(frame)?;
                trace!("{}: assigned frame {}", process.id, frame);
                assignments.push(Assignment { frame, order: assignments.len() });
                process.pages_allocated += 1;
                demand -= 1;
            }
            None => {
                let frame = queue.dequeue()?;
                let victim = pool.release(frame)?;
                trace!("{}: evicted frame {} from {}", process.id, frame, victim);
                evictions.push(Eviction { frame, victim });
            }
        }
    }

    if resumed {
        process.pending_pages -= assignments.len();
    } else if !process.first_pass_done {
        process.first_pass_done = true;
        if process.pages_needed > max_pages_per_process {
            process.pending_pages = process.pages_needed - max_pages_per_process;
        }
    }

    Ok(AllocationResult {
        process: process.id,
        assignments,
        evictions,
        resumed,
        pages_allocated: process.pages_allocated,
        pending_pages: process.pending_pages,
    })
}
