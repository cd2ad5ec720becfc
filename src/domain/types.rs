// ==========================================
// 设施预测性维护 - 领域类型定义
// ==========================================
// 风险等级 / 任务优先级 / 设备关键度 / 传感器状态 / 任务状态
// 序列化格式: 小写 (与存储层、外部接口一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 风险等级 (Risk Level)
// ==========================================
// 顺序: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,      // 低风险，不生成任务
    Medium,   // 中风险
    High,     // 高风险
    Critical, // 危险
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl RiskLevel {
    /// 从字符串解析风险等级（大小写不敏感）
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

// ==========================================
// 任务优先级 (Task Priority)
// ==========================================
// 由风险等级一一映射
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl From<RiskLevel> for TaskPriority {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => TaskPriority::Low,
            RiskLevel::Medium => TaskPriority::Medium,
            RiskLevel::High => TaskPriority::High,
            RiskLevel::Critical => TaskPriority::Critical,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl TaskPriority {
    pub fn from_db_str(s: &str) -> Option<Self> {
        RiskLevel::from_db_str(s).map(TaskPriority::from)
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }

    /// 优先级决定的最短排程延后天数
    ///
    /// - critical: 0 天
    /// - high: 1 天
    /// - 其他: 2 天
    pub fn min_delay_days(&self) -> i64 {
        match self {
            TaskPriority::Critical => 0,
            TaskPriority::High => 1,
            TaskPriority::Medium | TaskPriority::Low => 2,
        }
    }
}

// ==========================================
// 设备关键度 (Equipment Criticality)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl Criticality {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Criticality::Low),
            "medium" => Some(Criticality::Medium),
            "high" => Some(Criticality::High),
            "critical" => Some(Criticality::Critical),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Criticality::Low => "low",
            Criticality::Medium => "medium",
            Criticality::High => "high",
            Criticality::Critical => "critical",
        }
    }
}

// ==========================================
// 传感器状态 (Sensor Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Normal,
    Warning,
    Critical,
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorStatus::Normal => write!(f, "normal"),
            SensorStatus::Warning => write!(f, "warning"),
            SensorStatus::Critical => write!(f, "critical"),
        }
    }
}

impl SensorStatus {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Some(SensorStatus::Normal),
            "warning" => Some(SensorStatus::Warning),
            "critical" => Some(SensorStatus::Critical),
            _ => None,
        }
    }
}

// ==========================================
// 维修任务状态 (Task Status)
// ==========================================
// 生命周期: pending → scheduled → in-progress → completed
// 序列化格式: kebab-case ("in-progress")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,    // 待排程
    Scheduled,  // 已排程
    InProgress, // 执行中
    Completed,  // 已完成
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl TaskStatus {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(TaskStatus::Pending),
            "scheduled" => Some(TaskStatus::Scheduled),
            "in-progress" | "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// 判断状态迁移是否合法
    ///
    /// 规则:
    /// - 只允许沿生命周期前进一步
    /// - 同状态重复写入视为合法（幂等）
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Scheduled)
                | (TaskStatus::Scheduled, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::Completed)
        ) || *self == next
    }
}
