use std::fmt;

/// 1-based process identifier, assigned in input order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub usize);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so table column widths apply
        f.pad(&format!("P{}", self.0))
    }
}

/// A process and its paging bookkeeping across allocation passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub id: ProcessId,
    pub arrival_time: u64,
    /// Requested storage in KB
    pub size: usize,
    pub pages_needed: usize,
    pub pages_allocated: usize,
    /// Pages still owed after the first pass was capped
    pub pending_pages: usize,
    /// Set once the first allocation pass has run
    pub first_pass_done: bool,
    /// Pages taken from this process by eviction
    pub pages_evicted: usize,
}

impl Process {
    pub fn new(id: ProcessId, arrival_time: u64, size: usize, pages_needed: usize) -> Self {
        Process {
            id,
            arrival_time,
            size,
            pages_needed,
            pages_allocated: 0,
            pending_pages: 0,
            first_pass_done: false,
            pages_evicted: 0,
        }
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending_pages > 0
    }

    /// Pages the next allocation pass should grant
    pub fn outstanding_demand(&self, max_pages_per_process: usize) -> usize {
        if self.has_pending() {
            self.pending_pages
        } else if !self.first_pass_done {
            self.pages_needed.min(max_pages_per_process)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_process() {
        let p = Process::new(ProcessId(1), 0, 12, 3);
        assert_eq!(p.pages_allocated, 0);
        assert_eq!(p.pending_pages, 0);
        assert!(!p.first_pass_done);
        assert!(!p.has_pending());
    }

    #[test]
    fn test_outstanding_demand_caps_first_pass() {
        let p = Process::new(ProcessId(1), 0, 32, 8);
        assert_eq!(p.outstanding_demand(5), 5);

        let small = Process::new(ProcessId(2), 0, 12, 3);
        assert_eq!(small.outstanding_demand(5), 3);
    }

    #[test]
    fn test_outstanding_demand_resumes_pending() {
        let mut p = Process::new(ProcessId(1), 0, 32, 8);
        p.first_pass_done = true;
        p.pages_allocated = 5;
        p.pending_pages = 3;
        assert_eq!(p.outstanding_demand(5), 3);

        p.pending_pages = 0;
        p.pages_allocated = 8;
        assert_eq!(p.outstanding_demand(5), 0);
    }

    #[test]
    fn test_display_id() {
        assert_eq!(ProcessId(4).to_string(), "P4");
        assert_eq!(format!("{:<4}|", ProcessId(12)), "P12 |");
    }
}
