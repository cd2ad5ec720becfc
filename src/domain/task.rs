// ==========================================
// 设施预测性维护 - 维修任务与维修记录领域模型
// ==========================================
// MaintenanceTask: TaskFactory 生成草稿，Scheduler 落位
// MaintenanceLog: 外部完工记录，AnalyticsAggregator 只读
// ==========================================

use crate::domain::types::{TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// MaintenanceTask - 维修任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: String,
    pub equipment_id: String,
    pub equipment_name: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigned_to: Option<String>, // 技术员ID，未分配为 None
    pub estimated_duration: u32,     // 分钟
    pub scheduled_date: DateTime<Utc>,
    pub predicted_failure_in_days: u32,
    pub required_parts: Vec<String>,
    pub notes: String,
}

// ==========================================
// MaintenanceLog - 维修完工记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceLog {
    pub id: String,
    pub task_id: String,
    pub equipment_id: String,
    pub technician_id: Option<String>,
    pub actual_duration: Option<u32>, // 分钟，未记录为 None
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
}
