use log::{debug, info, warn};

use crate::allocation::{allocate, AllocationResult, Eviction};
use crate::config::SimulationConfig;
use crate::error::{ConfigResult, MemoryError, MemoryResult};
use crate::memory::{FramePool, ReclamationQueue};
use crate::process::{Process, ProcessId};
use crate::report::ProcessStats;

/// Lifecycle of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    InitialPass,
    ResumePasses,
    Summarizing,
    Done,
}

/// One `allocate` call as seen by the reporting layer
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessAllocation {
    pub process: ProcessId,
    pub arrival_time: u64,
    pub size: usize,
    pub result: AllocationResult,
    /// Pool occupancy right after the call
    pub occupancy_percent: f64,
}

/// Every call made during one sweep. Pass 0 is the initial pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    pub pass: usize,
    pub allocations: Vec<ProcessAllocation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub passes: Vec<PassRecord>,
    /// Final descriptors in scheduling (arrival) order
    pub processes: Vec<Process>,
    /// Owner of each frame at the end of the run
    pub frames: Vec<Option<ProcessId>>,
    pub total_evictions: usize,
    pub stats: Option<ProcessStats>,
}

impl SimulationReport {
    /// Frames owned at the end of the run
    pub fn occupied_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }

    /// Frames left free at the end of the run
    pub fn free_frames(&self) -> usize {
        self.frames.len() - self.occupied_frames()
    }

    /// Passes after the initial one
    pub fn resume_passes(&self) -> usize {
        self.passes.len().saturating_sub(1)
    }

    /// Frames `process` still holds at the end, in index order
    pub fn frames_owned_by(&self, process: ProcessId) -> Vec<usize> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, owner)| **owner == Some(process))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Drives the allocation engine over a process set until no demand is pending.
///
/// Owns the frame pool and reclamation queue; nothing else mutates them.
pub struct Simulation {
    config: SimulationConfig,
    pool: FramePool,
    queue: ReclamationQueue,
    phase: Phase,
}

impl Simulation {
    /// Validate `config` and set up an empty pool and queue
    pub fn new(config: SimulationConfig) -> ConfigResult<Self> {
        config.validate()?;
        let frames = config.total_frames();
        Ok(Simulation {
            config,
            pool: FramePool::new(frames),
            queue: ReclamationQueue::new(frames),
            phase: Phase::Loading,
        })
    }

    /// Current lifecycle phase
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn pool(&self) -> &FramePool {
        &self.pool
    }

    pub fn queue(&self) -> &ReclamationQueue {
        &self.queue
    }

    /// Run every process to completion and collect the results
    pub fn run(&mut self, mut processes: Vec<Process>) -> MemoryResult<SimulationReport> {
        let frames = self.config.total_frames();
        self.pool = FramePool::new(frames);
        self.queue = ReclamationQueue::new(frames);
        self.phase = Phase::Loading;

        // Stable, so equal arrivals keep input order
        processes.sort_by_key(|p| p.arrival_time);
        info!(
            "Scheduling {} processes over {} frames (cap {} pages per pass)",
            processes.len(),
            frames,
            self.config.max_pages_per_process
        );

        let mut passes = Vec::new();
        let mut total_evictions = 0;

        self.phase = Phase::InitialPass;
        let all: Vec<usize> = (0..processes.len()).collect();
        passes.push(self.sweep(0, &all, &mut processes, &mut total_evictions)?);

        self.phase = Phase::ResumePasses;
        loop {
            let pending: Vec<usize> = processes
                .iter()
                .enumerate()
                .filter(|(_, p)| p.has_pending())
                .map(|(i, _)| i)
                .collect();
            if pending.is_empty() {
                break;
            }
            let pass = passes.len();
            passes.push(self.sweep(pass, &pending, &mut processes, &mut total_evictions)?);
        }
        info!("Finished after {} resume passes, {} evictions", passes.len() - 1, total_evictions);

        self.phase = Phase::Summarizing;
        let stats = ProcessStats::from_processes(&processes);
        let report = SimulationReport {
            passes,
            frames: self.pool.snapshot(),
            processes,
            total_evictions,
            stats,
        };

        self.phase = Phase::Done;
        Ok(report)
    }

    fn sweep(
        &mut self,
        pass: usize,
        indices: &[usize],
        processes: &mut [Process],
        total_evictions: &mut usize,
    ) -> MemoryResult<PassRecord> {
        debug!("Pass {}: {} processes", pass, indices.len());
        let mut allocations = Vec::with_capacity(indices.len());

        for &i in indices {
            let result = allocate(
                &mut processes[i],
                &mut self.pool,
                &mut self.queue,
                self.config.max_pages_per_process,
            )?;
            *total_evictions += result.evictions.len();
            self.charge_victims(&result.evictions, processes)?;

            let process = &processes[i];
            allocations.push(ProcessAllocation {
                process: process.id,
                arrival_time: process.arrival_time,
                size: process.size,
                // Victim corrections may have touched the requester itself
                result: AllocationResult {
                    pages_allocated: process.pages_allocated,
                    ..result
                },
                occupancy_percent: self.pool.occupancy_percent(),
            });
        }

        Ok(PassRecord { pass, allocations })
    }

    /// Record each eviction against the process that owned the frame
    fn charge_victims(&self, evictions: &[Eviction], processes: &mut [Process]) -> MemoryResult<()> {
        for eviction in evictions {
            let victim = processes
                .iter_mut()
                .find(|p| p.id == eviction.victim)
                .ok_or(MemoryError::UnknownOwner {
                    frame: eviction.frame,
                    owner: eviction.victim,
                })?;
            warn!("Frame {} reclaimed from {}", eviction.frame, victim.id);
            victim.pages_evicted += 1;
            if self.config.reclaim_victim_pages {
                victim.pages_allocated = victim.pages_allocated.saturating_sub(1);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(config: &SimulationConfig, records: &[(u64, usize)]) -> Vec<Process> {
        records
            .iter()
            .enumerate()
            .map(|(i, &(arrival, size))| {
                Process::new(ProcessId(i + 1), arrival, size, config.pages_for(size))
            })
            .collect()
    }

    #[test]
    fn test_new_simulation_is_loading() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.phase(), Phase::Loading);
        assert_eq!(sim.pool().capacity(), 64);
        assert_eq!(sim.queue().capacity(), 64);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimulationConfig::with_frames(4, 0);
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_single_small_process() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::new(config).unwrap();
        let report = sim.run(descriptors(&config, &[(0, 12)])).unwrap();

        assert_eq!(sim.phase(), Phase::Done);
        assert_eq!(report.passes.len(), 1);
        assert_eq!(report.occupied_frames(), 3);
        assert_eq!(report.processes[0].pending_pages, 0);
        assert_eq!(report.processes[0].pages_allocated, 3);
    }

    #[test]
    fn test_oversized_process_takes_resume_pass() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::new(config).unwrap();
        let report = sim.run(descriptors(&config, &[(0, 32)])).unwrap();

        assert_eq!(report.passes.len(), 2);
        assert_eq!(report.passes[0].allocations[0].result.frames_allocated(), 5);
        assert_eq!(report.passes[0].allocations[0].result.pending_pages, 3);
        assert_eq!(report.passes[1].allocations[0].result.frames_allocated(), 3);
        assert_eq!(report.occupied_frames(), 8);
        assert_eq!(report.processes[0].pages_allocated, 8);
    }

    #[test]
    fn test_fifo_pressure_between_processes() {
        let config = SimulationConfig::with_frames(4, 5);
        let mut sim = Simulation::new(config).unwrap();
        let report = sim.run(descriptors(&config, &[(0, 16), (1, 8)])).unwrap();

        assert_eq!(report.frames_owned_by(ProcessId(1)), vec![2, 3]);
        assert_eq!(report.frames_owned_by(ProcessId(2)), vec![0, 1]);
        assert_eq!(report.total_evictions, 2);
        assert_eq!(report.processes[0].pages_evicted, 2);
        // Victim counters are not corrected by default
        assert_eq!(report.processes[0].pages_allocated, 4);
    }

    #[test]
    fn test_reclaim_victim_pages_corrects_counters() {
        let mut config = SimulationConfig::with_frames(4, 5);
        config.reclaim_victim_pages = true;
        let mut sim = Simulation::new(config).unwrap();
        let report = sim.run(descriptors(&config, &[(0, 16), (1, 8)])).unwrap();

        assert_eq!(report.processes[0].pages_allocated, 2);
        assert_eq!(report.processes[1].pages_allocated, 2);
    }

    #[test]
    fn test_sorted_by_arrival_with_stable_ties() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::new(config).unwrap();
        let report = sim.run(descriptors(&config, &[(5, 4), (1, 4), (5, 4), (0, 4)])).unwrap();

        let order: Vec<ProcessId> = report.passes[0].allocations.iter().map(|a| a.process).collect();
        assert_eq!(order, vec![ProcessId(4), ProcessId(2), ProcessId(1), ProcessId(3)]);
        assert_eq!(report.frames_owned_by(ProcessId(4)), vec![0]);
        assert_eq!(report.frames_owned_by(ProcessId(3)), vec![3]);
    }

    #[test]
    fn test_resume_passes_only_visit_pending_processes() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::new(config).unwrap();
        let report = sim.run(descriptors(&config, &[(0, 8), (1, 40), (2, 4)])).unwrap();

        assert_eq!(report.passes.len(), 2);
        let resumed: Vec<ProcessId> = report.passes[1].allocations.iter().map(|a| a.process).collect();
        assert_eq!(resumed, vec![ProcessId(2)]);
        assert_eq!(report.processes[1].pages_allocated, 10);
        assert_eq!(report.occupied_frames(), 2 + 10 + 1);
    }

    #[test]
    fn test_occupancy_recorded_per_call() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::new(config).unwrap();
        let report = sim.run(descriptors(&config, &[(0, 12), (1, 4)])).unwrap();

        let occupancy: Vec<f64> = report.passes[0].allocations.iter().map(|a| a.occupancy_percent).collect();
        assert!((occupancy[0] - 4.6875).abs() < 1e-9);
        assert!((occupancy[1] - 6.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_process_set() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let report = sim.run(Vec::new()).unwrap();

        assert_eq!(report.passes.len(), 1);
        assert!(report.passes[0].allocations.is_empty());
        assert_eq!(report.free_frames(), 64);
        assert!(report.stats.is_none());
        assert_eq!(sim.phase(), Phase::Done);
    }

    #[test]
    fn test_eviction_of_unknown_owner_is_an_error() {
        let config = SimulationConfig::default();
        let sim = Simulation::new(config).unwrap();
        let mut processes = descriptors(&config, &[(0, 4)]);
        let evictions = [Eviction { frame: 3, victim: ProcessId(42) }];

        assert_eq!(
            sim.charge_victims(&evictions, &mut processes),
            Err(MemoryError::UnknownOwner { frame: 3, owner: ProcessId(42) })
        );
        assert_eq!(processes[0].pages_evicted, 0);
    }

    #[test]
    fn test_eviction_is_charged_to_owner() {
        let config = SimulationConfig::default();
        let sim = Simulation::new(config).unwrap();
        let mut processes = descriptors(&config, &[(0, 4), (1, 4)]);
        let evictions = [Eviction { frame: 0, victim: ProcessId(2) }];

        sim.charge_victims(&evictions, &mut processes).unwrap();
        assert_eq!(processes[0].pages_evicted, 0);
        assert_eq!(processes[1].pages_evicted, 1);
    }

    #[test]
    fn test_rerun_starts_from_empty_pool() {
        let config = SimulationConfig::default();
        let mut sim = Simulation::new(config).unwrap();
        sim.run(descriptors(&config, &[(0, 40)])).unwrap();
        let report = sim.run(descriptors(&config, &[(0, 4)])).unwrap();

        assert_eq!(report.occupied_frames(), 1);
        assert_eq!(report.total_evictions, 0);
    }
}
