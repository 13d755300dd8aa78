//! 信号发射指标收集模块
//!
//! 全局指标通过 `metrics` facade 记录 (由 Prometheus exporter 导出)，
//! `EmissionStats` 在内存中聚合，便于输出摘要。

use metrics::{counter, gauge, histogram};

/// 记录一次发射开始
pub fn record_emission_started(signal: &str) {
    counter!("sigslot_emissions_total", "signal" => signal.to_string()).increment(1);
}

/// 记录一次发射结束 (结果已交付给回调)
pub fn record_emission_completed(signal: &str, success: bool, latency_ms: f64) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "sigslot_emissions_completed_total",
        "signal" => signal.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("sigslot_emission_latency_ms", "signal" => signal.to_string()).record(latency_ms);
}

/// 记录 slot 失败 (包括短路之后才到达的错误)
pub fn record_slot_failure(signal: &str) {
    counter!("sigslot_slot_failures_total", "signal" => signal.to_string()).increment(1);
}

/// 记录当前已注册 slot 数量
pub fn record_slot_count(signal: &str, count: usize) {
    gauge!("sigslot_slots", "signal" => signal.to_string()).set(count as f64);
}

/// 发射统计聚合器
#[derive(Debug, Clone, Default)]
pub struct EmissionStats {
    /// 成功次数
    pub succeeded: u64,

    /// 失败次数
    pub failed: u64,

    /// 延迟统计 (毫秒)
    pub latency_ms: RunningStats,
}

impl EmissionStats {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, success: bool, latency_ms: f64) {
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.latency_ms.push(latency_ms);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> EmissionSummary {
        let total = self.succeeded + self.failed;
        EmissionSummary {
            total,
            succeeded: self.succeeded,
            failed: self.failed,
            failure_rate: if total > 0 {
                self.failed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_ms),
        }
    }
}

/// 发射摘要
#[derive(Debug, Clone, Default)]
pub struct EmissionSummary {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for EmissionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Emission Summary ===")?;
        writeln!(f, "Total emissions: {}", self.total)?;
        writeln!(f, "Succeeded: {}", self.succeeded)?;
        writeln!(
            f,
            "Failed: {} ({:.2}%)",
            self.failed, self.failure_rate
        )?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 标准差 (样本)
    pub fn std_dev(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }
}
