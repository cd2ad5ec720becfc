// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use predictive_maintenance::config::{MaintenanceConfigReader, SchedulerConfig};
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub scheduler: SchedulerConfig,
}

impl MockConfig {
    /// 默认阈值 (80 / 480 / 20 / 7)
    pub fn new() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
        }
    }

    /// 自定义负荷上限
    pub fn with_workload_cap(cap: f64) -> Self {
        let mut config = Self::new();
        config.scheduler.availability_workload_cap = cap;
        config
    }
}

#[async_trait]
impl MaintenanceConfigReader for MockConfig {
    async fn get_availability_workload_cap(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.scheduler.availability_workload_cap)
    }

    async fn get_workday_minutes(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.scheduler.workday_minutes)
    }

    async fn get_workload_delay_step(&self) -> Result<f64, Box<dyn Error>> {
        Ok(self.scheduler.workload_delay_step)
    }

    async fn get_imminent_failure_days(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.scheduler.imminent_failure_days)
    }
}
