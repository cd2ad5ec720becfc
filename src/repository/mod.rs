// ==========================================
// 设施预测性维护 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod db_utils;
pub mod equipment_repo;
pub mod error;
pub mod maintenance_log_repo;
pub mod task_repo;
pub mod technician_repo;

// 重导出核心仓储
pub use equipment_repo::{EquipmentRepository, InventoryRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use maintenance_log_repo::MaintenanceLogRepository;
pub use task_repo::{MaintenanceTaskRepository, TaskFilter};
pub use technician_repo::TechnicianRepository;
