// ==========================================
// 设施预测性维护 - 排程阈值配置
// ==========================================
// 默认值即业务口径，可由 config_kv 覆写
// ==========================================

use serde::{Deserialize, Serialize};

/// 排程阈值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// 负荷上限（%）：运行开始时 >= 该值不入池；运行中超过该值即置为不可用
    pub availability_workload_cap: f64,
    /// 一个工作日的分钟数
    pub workday_minutes: u32,
    /// 负荷换算延后天数的步长（%/天）
    pub workload_delay_step: f64,
    /// 临近失效窗口（天）
    pub imminent_failure_days: u32,
}

impl SchedulerConfig {
    pub const DEFAULT_AVAILABILITY_WORKLOAD_CAP: f64 = 80.0;
    pub const DEFAULT_WORKDAY_MINUTES: u32 = 8 * 60;
    pub const DEFAULT_WORKLOAD_DELAY_STEP: f64 = 20.0;
    pub const DEFAULT_IMMINENT_FAILURE_DAYS: u32 = 7;
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            availability_workload_cap: Self::DEFAULT_AVAILABILITY_WORKLOAD_CAP,
            workday_minutes: Self::DEFAULT_WORKDAY_MINUTES,
            workload_delay_step: Self::DEFAULT_WORKLOAD_DELAY_STEP,
            imminent_failure_days: Self::DEFAULT_IMMINENT_FAILURE_DAYS,
        }
    }
}
