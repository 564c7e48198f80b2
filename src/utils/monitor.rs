use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct StageStats {
    pub stage: String,
    pub stage_time: Duration,
    pub elapsed_time: Duration,
    pub memory_usage_mb: Option<u64>,
}

/// 記錄每個 ETL 階段的耗時與記憶體用量
pub struct StageMonitor {
    enabled: bool,
    start_time: Instant,
    last_mark: Instant,
    stages: Vec<StageStats>,
    #[cfg(feature = "cli")]
    system: System,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
}

impl StageMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start_time: now,
            last_mark: now,
            stages: Vec::new(),
            #[cfg(feature = "cli")]
            system: System::new(),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(feature = "cli")]
    fn memory_mb(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.system
            .process(pid)
            .map(|process| process.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_mb(&mut self) -> Option<u64> {
        None
    }

    /// 結束一個階段；未啟用時不做任何事
    pub fn finish_stage(&mut self, stage: &str) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let stats = StageStats {
            stage: stage.to_string(),
            stage_time: now.duration_since(self.last_mark),
            elapsed_time: now.duration_since(self.start_time),
            memory_usage_mb: self.memory_mb(),
        };
        self.last_mark = now;

        match stats.memory_usage_mb {
            Some(memory) => tracing::info!(
                "📊 {} - took {:?}, memory {}MB, total {:?}",
                stats.stage,
                stats.stage_time,
                memory,
                stats.elapsed_time
            ),
            None => tracing::info!(
                "📊 {} - took {:?}, total {:?}",
                stats.stage,
                stats.stage_time,
                stats.elapsed_time
            ),
        }
        self.stages.push(stats);
    }

    pub fn stages(&self) -> &[StageStats] {
        &self.stages
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let peak = self.stages.iter().filter_map(|s| s.memory_usage_mb).max();
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}",
            self.start_time.elapsed(),
            peak.map(|mb| format!("{}MB", mb))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }
}

impl Default for StageMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
