// ==========================================
// 设施预测性维护 - 排程配置读取 Trait
// ==========================================
// 职责: 定义排程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::scheduler_config::SchedulerConfig;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// MaintenanceConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait MaintenanceConfigReader: Send + Sync {
    /// 获取技术员负荷上限（%）
    ///
    /// # 默认值
    /// - 80
    async fn get_availability_workload_cap(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取工作日分钟数
    ///
    /// # 默认值
    /// - 480
    async fn get_workday_minutes(&self) -> Result<u32, Box<dyn Error>>;

    /// 获取负荷延后步长（%/天）
    ///
    /// # 默认值
    /// - 20
    async fn get_workload_delay_step(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取临近失效窗口（天）
    ///
    /// # 默认值
    /// - 7
    async fn get_imminent_failure_days(&self) -> Result<u32, Box<dyn Error>>;

    /// 汇总为一次排程运行使用的配置
    async fn load_scheduler_config(&self) -> Result<SchedulerConfig, Box<dyn Error>> {
        let availability_workload_cap = self.get_availability_workload_cap().await?;
        let workday_minutes = self.get_workday_minutes().await?;
        let workload_delay_step = self.get_workload_delay_step().await?;
        let imminent_failure_days = self.get_imminent_failure_days().await?;

        Ok(SchedulerConfig {
            availability_workload_cap,
            workday_minutes,
            workload_delay_step,
            imminent_failure_days,
        })
    }
}
