// ==========================================
// 设施预测性维护 - 配置层
// ==========================================
// 职责: 排程阈值配置，支持 config_kv 覆写
// ==========================================

pub mod config_manager;
pub mod maintenance_config_trait;
pub mod scheduler_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use maintenance_config_trait::MaintenanceConfigReader;
pub use scheduler_config::SchedulerConfig;
