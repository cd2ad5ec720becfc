// ==========================================
// 设施预测性维护 - 维修任务生成引擎
// ==========================================
// 职责: 风险分析 → 维修任务草稿
// 输入: RiskAnalysis + 设备台账(可缺失) + 库存快照
// 输出: MaintenanceTask (pending / 未分配)
// ==========================================
// 红线: LOW 风险不生成任务
// 红线: 配件只取有库存的部分，不回退到全量清单
// ==========================================

use crate::domain::equipment::{Equipment, InventoryItem};
use crate::domain::risk::RiskAnalysis;
use crate::domain::task::MaintenanceTask;
use crate::domain::types::{Criticality, RiskLevel, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 基础工时（分钟）
pub const BASE_DURATION_MINUTES: u32 = 120;

// ==========================================
// TaskFactory - 维修任务生成引擎
// ==========================================
pub struct TaskFactory {
    // 无状态引擎,不需要注入依赖
}

impl TaskFactory {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 由风险分析生成维修任务草稿
    ///
    /// # 参数
    /// - `analysis`: 风险分析
    /// - `equipment`: 设备台账（缺失时跳过设备相关的工时/配件调整）
    /// - `inventory`: 库存快照
    /// - `now`: 排程时间（scheduled_date 占位值）
    ///
    /// # 返回
    /// - None: LOW 风险，不生成任务
    /// - Some(task): pending 状态的任务草稿
    pub fn build_task(
        &self,
        analysis: &RiskAnalysis,
        equipment: Option<&Equipment>,
        inventory: &[InventoryItem],
        now: DateTime<Utc>,
    ) -> Option<MaintenanceTask> {
        if !analysis.requires_maintenance() {
            return None;
        }

        let description = Self::build_description(analysis, equipment);
        let estimated_duration = Self::estimate_duration(
            analysis.risk_level,
            equipment.map(|e| e.criticality),
        );
        let required_parts = equipment
            .map(|e| Self::required_parts(&e.equipment_type, inventory))
            .unwrap_or_default();

        Some(MaintenanceTask {
            id: Uuid::new_v4().to_string(),
            equipment_id: analysis.equipment_id.clone(),
            equipment_name: analysis.equipment_name.clone(),
            description,
            priority: TaskPriority::from(analysis.risk_level),
            status: TaskStatus::Pending,
            assigned_to: None,
            estimated_duration,
            scheduled_date: now,
            predicted_failure_in_days: analysis.predicted_failure_in_days,
            required_parts,
            notes: Self::build_notes(analysis),
        })
    }

    /// 批量生成（LOW 风险被跳过，保持输入顺序）
    pub fn build_tasks<'a, F>(
        &self,
        analyses: &[RiskAnalysis],
        equipment_lookup: F,
        inventory: &[InventoryItem],
        now: DateTime<Utc>,
    ) -> Vec<MaintenanceTask>
    where
        F: Fn(&str) -> Option<&'a Equipment>,
    {
        analyses
            .iter()
            .filter_map(|a| self.build_task(a, equipment_lookup(&a.equipment_id), inventory, now))
            .collect()
    }

    // ==========================================
    // 规则
    // ==========================================

    /// 任务描述
    ///
    /// 格式: "{设备名}[ ({类型})] predictive maintenance — {处置建议首句}"
    fn build_description(analysis: &RiskAnalysis, equipment: Option<&Equipment>) -> String {
        let subject = match equipment {
            Some(e) if !e.equipment_type.trim().is_empty() => {
                format!("{} ({})", analysis.equipment_name, e.equipment_type)
            }
            _ => analysis.equipment_name.clone(),
        };
        format!(
            "{} predictive maintenance — {}",
            subject,
            analysis.first_action_clause()
        )
    }

    /// 工时估算（分钟）
    ///
    /// - 风险基础: critical 240 / high 180 / 其他 120
    /// - 设备关键度加成: critical +60 / high +30（与风险基础叠加）
    pub fn estimate_duration(risk_level: RiskLevel, criticality: Option<Criticality>) -> u32 {
        let base = match risk_level {
            RiskLevel::Critical => 240,
            RiskLevel::High => 180,
            RiskLevel::Medium | RiskLevel::Low => BASE_DURATION_MINUTES,
        };
        let bonus = match criticality {
            Some(Criticality::Critical) => 60,
            Some(Criticality::High) => 30,
            _ => 0,
        };
        base + bonus
    }

    /// 按设备类型查找候选配件
    pub fn candidate_parts(equipment_type: &str) -> &'static [&'static str] {
        match equipment_type.trim().to_lowercase().as_str() {
            "generator" => &["Fuel Filter", "Oil Filter", "Air Filter"],
            "ac_unit" => &["Refrigerant", "Air Filter", "Thermostat"],
            "pump" => &["Seal Kit", "Bearings", "Gaskets"],
            "compressor" => &["Air Filter", "Oil", "Belts"],
            _ => &[],
        }
    }

    /// 候选配件按库存过滤（保持候选顺序）
    pub fn required_parts(equipment_type: &str, inventory: &[InventoryItem]) -> Vec<String> {
        Self::candidate_parts(equipment_type)
            .iter()
            .filter(|part| inventory.iter().any(|item| item.supplies(part)))
            .map(|part| part.to_string())
            .collect()
    }

    fn build_notes(analysis: &RiskAnalysis) -> String {
        let mut notes = format!(
            "Risk {} (confidence {:.0}%), predicted failure in {} days",
            analysis.risk_level,
            analysis.confidence * 100.0,
            analysis.predicted_failure_in_days
        );
        if !analysis.contributing_factors.is_empty() {
            notes.push_str("; factors: ");
            notes.push_str(&analysis.contributing_factors.join(", "));
        }
        notes
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for TaskFactory {
    fn default() -> Self {
        Self::new()
    }
}
