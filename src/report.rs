//! Text rendering of a finished simulation
//!
//! Everything here reads a [`SimulationReport`]; nothing feeds back into the
//! allocation engine.

use std::fmt::{self, Write};

use crate::config::SimulationConfig;
use crate::process::Process;
use crate::scheduler::{PassRecord, SimulationReport};

const RULE: &str = "------------------------------------------------------------";
const BANNER: &str = "============================================================";

/// Size summary over every loaded process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessStats {
    pub count: usize,
    pub max_size: usize,
    pub min_size: usize,
    pub average_size: f64,
}

impl ProcessStats {
    /// `None` when there are no processes
    pub fn from_processes(processes: &[Process]) -> Option<Self> {
        let max_size = processes.iter().map(|p| p.size).max()?;
        let min_size = processes.iter().map(|p| p.size).min()?;
        let total: usize = processes.iter().map(|p| p.size).sum();
        Some(ProcessStats {
            count: processes.len(),
            max_size,
            min_size,
            average_size: total as f64 / processes.len() as f64,
        })
    }
}

/// A finished run paired with the settings it ran under, printable as the full report
pub struct ReportView<'a> {
    pub report: &'a SimulationReport,
    pub config: &'a SimulationConfig,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.report, self.config)
    }
}

/// Render the full run report
pub fn render(report: &SimulationReport, config: &SimulationConfig) -> String {
    ReportView { report, config }.to_string()
}

fn write_report<W: Write>(out: &mut W, report: &SimulationReport, config: &SimulationConfig) -> fmt::Result {
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "{:^60}", "MEMORY MODULE OF OS")?;
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "Total Main Memory: {} KB", config.total_memory)?;
    writeln!(out, "Memory Management Technique Used: Paging (Frame Size: {} KB)", config.frame_size)?;
    writeln!(out, "Total frames: {}", config.total_frames())?;
    writeln!(out, "Max pages per process per pass: {}", config.max_pages_per_process)?;

    for pass in &report.passes {
        write_pass(out, pass)?;
    }

    section(out, "Memory Status")?;
    writeln!(out, "Occupied Frames: {}", report.occupied_frames())?;
    writeln!(out, "Free Frames: {}", report.free_frames())?;
    writeln!(out, "Evictions: {}", report.total_evictions)?;
    writeln!(out, "Resume passes: {}", report.resume_passes())?;

    section(out, "Process Allocation Summary")?;
    writeln!(out, "  Process  Arrival  Size (KB)  Needed  Allocated  Frames Held")?;
    writeln!(out, "{}", RULE)?;
    for process in &report.processes {
        let held = report.frames_owned_by(process.id);
        let held = if held.is_empty() {
            "-".to_string()
        } else {
            held.iter().map(|f| format!("F{}", f)).collect::<Vec<_>>().join(" ")
        };
        writeln!(
            out,
            "  {:<7}  {:<7}  {:<9}  {:<6}  {:<9}  {}",
            process.id, process.arrival_time, process.size, process.pages_needed, process.pages_allocated, held
        )?;
    }

    section(out, "Process Size Summary")?;
    match &report.stats {
        Some(stats) => {
            writeln!(out, "Total Processes: {}", stats.count)?;
            writeln!(out, "Max Process Size: {} KB", stats.max_size)?;
            writeln!(out, "Min Process Size: {} KB", stats.min_size)?;
            writeln!(out, "Average Process Size: {:.2} KB", stats.average_size)?;
        }
        None => writeln!(out, "Total Processes: 0")?,
    }
    Ok(())
}

fn write_pass<W: Write>(out: &mut W, pass: &PassRecord) -> fmt::Result {
    if pass.pass == 0 {
        section(out, "Initial Allocation Pass")?;
    } else {
        section(out, &format!("Resume Pass {}", pass.pass))?;
    }

    for allocation in &pass.allocations {
        writeln!(out, "  Frame   Process   Arrival Time   Size (KB)")?;
        for eviction in &allocation.result.evictions {
            writeln!(out, "  F{:<5}  evicted from {}", eviction.frame, eviction.victim)?;
        }
        for assignment in &allocation.result.assignments {
            writeln!(
                out,
                "  F{:<5}  {:<8}  {:<13}  {}",
                assignment.frame, allocation.process, allocation.arrival_time, allocation.size
            )?;
        }
        if allocation.result.assignments.is_empty() {
            writeln!(out, "  -       {:<8}  {:<13}  {}", allocation.process, allocation.arrival_time, allocation.size)?;
        }
        writeln!(
            out,
            "  Memory occupied: {:.2}%  (pending pages for {}: {})",
            allocation.occupancy_percent, allocation.process, allocation.result.pending_pages
        )?;
        writeln!(out)?;
    }
    Ok(())
}

fn section<W: Write>(out: &mut W, title: &str) -> fmt::Result {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{:^60}", title)?;
    writeln!(out, "{}", RULE)
}
