use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub monitoring: MonitoringConfig,
    pub sampling: SamplingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub sample_interval_ms: u64,
    /// How often to log worker stats (ticks, series count) at INFO level.
    pub stats_log_interval_secs: u64,
    /// Max number of snapshots kept in the broadcast channel (slow display
    /// consumers may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    /// Samples kept per history series (120 = 2 minutes at 1 Hz).
    #[serde(default = "default_history_length")]
    pub history_length: usize,
    /// Rates below this threshold display as zero; smoothing policy only.
    #[serde(default = "default_noise_floor_mbps")]
    pub noise_floor_mbps: f64,
    /// Mounts whose I/O rates are forced to zero (firmware/boot partitions).
    #[serde(default = "default_zero_io_mounts")]
    pub zero_io_mounts: Vec<String>,
}

fn default_history_length() -> usize {
    120
}

fn default_noise_floor_mbps() -> f64 {
    0.01
}

fn default_zero_io_mounts() -> Vec<String> {
    vec!["/boot".into(), "/boot/efi".into()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub graph_width: usize,
    pub graph_height: usize,
    pub gauge_width: usize,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.broadcast_capacity > 0,
            "monitoring.broadcast_capacity must be > 0, got {}",
            self.monitoring.broadcast_capacity
        );
        anyhow::ensure!(
            self.sampling.history_length > 0,
            "sampling.history_length must be > 0, got {}",
            self.sampling.history_length
        );
        anyhow::ensure!(
            self.sampling.noise_floor_mbps >= 0.0,
            "sampling.noise_floor_mbps must be >= 0, got {}",
            self.sampling.noise_floor_mbps
        );
        anyhow::ensure!(
            self.display.graph_width > 0,
            "display.graph_width must be > 0, got {}",
            self.display.graph_width
        );
        anyhow::ensure!(
            self.display.graph_height > 0,
            "display.graph_height must be > 0, got {}",
            self.display.graph_height
        );
        anyhow::ensure!(
            self.display.gauge_width > 0,
            "display.gauge_width must be > 0, got {}",
            self.display.gauge_width
        );
        Ok(())
    }
}
