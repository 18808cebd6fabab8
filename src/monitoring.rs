//! Process statistics reported by `/health` and logged at shutdown
//!
//! Only the server process itself is sampled, never machine-wide figures.

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Resource usage of the server process at a given moment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStats {
    pub pid: u32,
    /// Resident memory in MB
    pub memory_mb: f64,
    /// Virtual memory in MB
    pub virtual_memory_mb: f64,
    /// Operating system the binary runs on
    pub platform: &'static str,
}

impl ProcessStats {
    pub fn sample() -> Self {
        let pid = std::process::id();
        let current = Pid::from_u32(pid);

        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[current]), true);

        let (memory_mb, virtual_memory_mb) = sys
            .process(current)
            .map(|p| (to_mb(p.memory()), to_mb(p.virtual_memory())))
            .unwrap_or((0.0, 0.0));

        Self {
            pid,
            memory_mb,
            virtual_memory_mb,
            platform: std::env::consts::OS,
        }
    }

    pub fn format_for_log(&self) -> String {
        format!(
            "PID: {} | Memory: {:.2} MB | Virtual: {:.2} MB | Platform: {}",
            self.pid, self.memory_mb, self.virtual_memory_mb, self.platform
        )
    }
}

fn to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
