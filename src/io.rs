use std::fs;
use std::path::Path;

use crate::config::SimulationConfig;
use crate::error::{LoadError, LoadResult};
use crate::process::{Process, ProcessId};

/// One `arrival size` record from the process file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessRecord {
    pub arrival_time: u64,
    pub size: usize,
}

/// Records in input order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessTable {
    pub records: Vec<ProcessRecord>,
}

impl ProcessTable {
    /// Read and parse a process file
    pub fn from_file<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| LoadError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse whitespace-separated `arrival size` pairs. Line breaks carry no meaning.
    pub fn parse(content: &str) -> LoadResult<Self> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() % 2 != 0 {
            return Err(LoadError::OddTokenCount(tokens.len()));
        }

        let mut records = Vec::with_capacity(tokens.len() / 2);
        for (i, pair) in tokens.chunks(2).enumerate() {
            let record = i + 1;
            let arrival = parse_number(pair[0], record)?;
            let size = parse_number(pair[1], record)?;

            if arrival < 0 {
                return Err(LoadError::NegativeArrival { record, value: arrival });
            }
            if size <= 0 {
                return Err(LoadError::NonPositiveSize { record, value: size });
            }
            records.push(ProcessRecord {
                arrival_time: arrival as u64,
                size: size as usize,
            });
        }

        Ok(ProcessTable { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build descriptors with 1-based ids in input order
    pub fn into_processes(self, config: &SimulationConfig) -> Vec<Process> {
        self.records
            .into_iter()
            .enumerate()
            .map(|(i, r)| Process::new(ProcessId(i + 1), r.arrival_time, r.size, config.pages_for(r.size)))
            .collect()
    }
}

fn parse_number(token: &str, record: usize) -> LoadResult<i64> {
    token.parse().map_err(|_| LoadError::InvalidNumber {
        record,
        token: token.to_string(),
    })
}

/// Write a rendered report to a file, replacing it
pub fn write_report<P: AsRef<Path>>(path: P, report: &str) -> std::io::Result<()> {
    fs::write(path.as_ref(), report)
}
