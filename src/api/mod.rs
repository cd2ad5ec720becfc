// ==========================================
// 设施预测性维护 - API 层
// ==========================================
// 职责: 输入校验 + 数据加载 + 调用引擎 + 落库
// ==========================================

pub mod error;
pub mod maintenance_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use maintenance_api::MaintenanceApi;
