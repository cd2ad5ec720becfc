// ==========================================
// 设施预测性维护 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 传感器风险分析 → 维修任务生成 → 技术员排程 → 驾驶舱指标
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Criticality, RiskLevel, SensorStatus, TaskPriority, TaskStatus};

// 领域实体
pub use domain::{
    Equipment, InventoryItem, MaintenanceLog, MaintenanceTask, NormalRange, RiskAnalysis,
    SensorReading, Technician, WorkloadUpdate,
};

// 引擎
pub use engine::{
    AnalyticsAggregator, AnalyticsReport, MaintenanceOrchestrator, MaintenanceSchedule,
    MaintenanceScheduler, RiskAnalyzer, TaskFactory, TechnicianScorer,
};

// API
pub use api::{ApiError, ApiResult, MaintenanceApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设施预测性维护";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
