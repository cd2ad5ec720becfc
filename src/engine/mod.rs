// ==========================================
// 设施预测性维护 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不做 I/O, 所有判定必须可解释
// ==========================================

pub mod analytics;
pub mod orchestrator;
pub mod risk_analyzer;
pub mod scheduler;
pub mod task_factory;
pub mod technician_scorer;

// 重导出核心引擎
pub use analytics::{AnalyticsAggregator, AnalyticsReport, MaintenanceInsights, TaskCounts};
pub use orchestrator::{MaintenanceOrchestrator, PipelineResult};
pub use risk_analyzer::RiskAnalyzer;
pub use scheduler::{MaintenanceSchedule, MaintenanceScheduler};
pub use task_factory::TaskFactory;
pub use technician_scorer::TechnicianScorer;
