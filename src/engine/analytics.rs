// ==========================================
// 设施预测性维护 - 维修驾驶舱指标聚合引擎
// ==========================================
// 职责: 由已落库的任务/完工记录窗口派生驾驶舱指标
// 输入: 任务窗口 + 维修记录窗口
// 输出: 计数 + 洞察 + 建议（建议列表永不为空）
// ==========================================
// 红线: 纯只读计算，同一输入多次聚合结果一致
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::task::{MaintenanceLog, MaintenanceTask};
use crate::domain::types::{TaskPriority, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 无可用完工记录时的效率值
pub const DEFAULT_EFFICIENCY: f64 = 100.0;

// ==========================================
// 输出结构
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub by_status: BTreeMap<TaskStatus, usize>,
    pub by_priority: BTreeMap<TaskPriority, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceInsights {
    /// critical 优先级任务涉及的设备数（去重）
    pub critical_risk_equipment: usize,
    /// high 优先级任务涉及的设备数（去重）
    pub high_risk_equipment: usize,
    /// 预测失效天数在窗口内的任务数
    pub imminent_failures: usize,
    /// 工时效率 = 平均估算工时 / 平均实际工时 * 100，上限 100
    pub efficiency: f64,
    /// 参与效率计算的已完成任务数
    pub completed_with_actual_duration: usize,
    pub average_estimated_duration: Option<f64>,
    pub average_actual_duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub counts: TaskCounts,
    pub insights: MaintenanceInsights,
    pub recommendations: Vec<String>,
}

// ==========================================
// AnalyticsAggregator - 指标聚合引擎
// ==========================================
pub struct AnalyticsAggregator {
    imminent_failure_days: u32,
}

impl AnalyticsAggregator {
    /// 构造函数
    ///
    /// # 参数
    /// - `imminent_failure_days`: 临近失效窗口（天）
    pub fn new(imminent_failure_days: u32) -> Self {
        Self {
            imminent_failure_days,
        }
    }

    /// 聚合驾驶舱指标
    pub fn aggregate(&self, tasks: &[MaintenanceTask], logs: &[MaintenanceLog]) -> AnalyticsReport {
        let counts = Self::count(tasks);
        let insights = self.derive_insights(tasks, logs);
        let recommendations = self.recommend(&insights);

        tracing::debug!(
            total = counts.total,
            critical_risk_equipment = insights.critical_risk_equipment,
            high_risk_equipment = insights.high_risk_equipment,
            imminent_failures = insights.imminent_failures,
            efficiency = insights.efficiency,
            "驾驶舱指标聚合完成"
        );

        AnalyticsReport {
            counts,
            insights,
            recommendations,
        }
    }

    // ==========================================
    // 计数
    // ==========================================

    fn count(tasks: &[MaintenanceTask]) -> TaskCounts {
        let mut by_status: BTreeMap<TaskStatus, usize> = [
            TaskStatus::Pending,
            TaskStatus::Scheduled,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ]
        .into_iter()
        .map(|s| (s, 0))
        .collect();

        let mut by_priority: BTreeMap<TaskPriority, usize> = [
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Critical,
        ]
        .into_iter()
        .map(|p| (p, 0))
        .collect();

        for task in tasks {
            *by_status.entry(task.status).or_insert(0) += 1;
            *by_priority.entry(task.priority).or_insert(0) += 1;
        }

        TaskCounts {
            total: tasks.len(),
            by_status,
            by_priority,
        }
    }

    // ==========================================
    // 洞察
    // ==========================================

    fn derive_insights(&self, tasks: &[MaintenanceTask], logs: &[MaintenanceLog]) -> MaintenanceInsights {
        let critical_risk_equipment = Self::distinct_equipment(tasks, TaskPriority::Critical);
        let high_risk_equipment = Self::distinct_equipment(tasks, TaskPriority::High);
        let imminent_failures = tasks
            .iter()
            .filter(|t| t.predicted_failure_in_days <= self.imminent_failure_days)
            .count();

        // 任务ID → 实际工时（同一任务多条记录时以后出现者为准）
        let mut actual_by_task: HashMap<&str, u32> = HashMap::new();
        for log in logs {
            if let Some(actual) = log.actual_duration.filter(|d| *d > 0) {
                actual_by_task.insert(log.task_id.as_str(), actual);
            }
        }

        let pairs: Vec<(u32, u32)> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .filter_map(|t| {
                actual_by_task
                    .get(t.id.as_str())
                    .map(|actual| (t.estimated_duration, *actual))
            })
            .collect();

        let (efficiency, average_estimated_duration, average_actual_duration) = if pairs.is_empty() {
            (DEFAULT_EFFICIENCY, None, None)
        } else {
            let n = pairs.len() as f64;
            let avg_estimated = pairs.iter().map(|(e, _)| *e as f64).sum::<f64>() / n;
            let avg_actual = pairs.iter().map(|(_, a)| *a as f64).sum::<f64>() / n;
            let efficiency = (avg_estimated / avg_actual * 100.0).min(DEFAULT_EFFICIENCY);
            (efficiency, Some(avg_estimated), Some(avg_actual))
        };

        MaintenanceInsights {
            critical_risk_equipment,
            high_risk_equipment,
            imminent_failures,
            efficiency,
            completed_with_actual_duration: pairs.len(),
            average_estimated_duration,
            average_actual_duration,
        }
    }

    fn distinct_equipment(tasks: &[MaintenanceTask], priority: TaskPriority) -> usize {
        tasks
            .iter()
            .filter(|t| t.priority == priority)
            .map(|t| t.equipment_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    // ==========================================
    // 建议
    // ==========================================

    /// 阈值驱动的建议，列表永不为空
    fn recommend(&self, insights: &MaintenanceInsights) -> Vec<String> {
        let mut recommendations = Vec::new();

        if insights.critical_risk_equipment > 0 {
            recommendations.push(format!(
                "{} equipment unit(s) at critical risk: immediate action required",
                insights.critical_risk_equipment
            ));
        }
        if insights.high_risk_equipment > 0 {
            recommendations.push(format!(
                "{} equipment unit(s) at high risk: schedule maintenance within 48 hours",
                insights.high_risk_equipment
            ));
        }
        if insights.imminent_failures > 0 {
            recommendations.push(format!(
                "{} failure(s) predicted within {} days: prioritize scheduling",
                insights.imminent_failures, self.imminent_failure_days
            ));
        }
        if recommendations.is_empty() {
            recommendations.push(
                "All equipment operating within normal parameters: maintenance status normal".to_string(),
            );
        }

        recommendations
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for AnalyticsAggregator {
    fn default() -> Self {
        Self::new(SchedulerConfig::DEFAULT_IMMINENT_FAILURE_DAYS)
    }
}
