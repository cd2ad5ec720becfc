// ==========================================
// 设施预测性维护 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod equipment;
pub mod risk;
pub mod sensor;
pub mod task;
pub mod technician;
pub mod types;

// 重导出核心类型
pub use equipment::{Equipment, InventoryItem};
pub use risk::RiskAnalysis;
pub use sensor::{NormalRange, SensorReading};
pub use task::{MaintenanceLog, MaintenanceTask};
pub use technician::{Technician, WorkloadUpdate};
pub use types::{Criticality, RiskLevel, SensorStatus, TaskPriority, TaskStatus};
