// ==========================================
// 设施预测性维护 - 技术员适配评分引擎
// ==========================================
// 职责: 评估技术员对单个维修任务的适配度
// 输出: 0 ~ 100+ 的评分，> 0 才可分配
// ==========================================

use crate::domain::equipment::Equipment;
use crate::domain::task::MaintenanceTask;
use crate::domain::technician::Technician;
use crate::domain::types::TaskPriority;

/// 可用基础分
pub const AVAILABILITY_SCORE: f64 = 40.0;
/// 负荷分上限（负荷每 1% 扣 0.3 分，扣至 0 为止）
pub const WORKLOAD_SCORE_MAX: f64 = 30.0;
pub const WORKLOAD_PENALTY_PER_PERCENT: f64 = 0.3;
/// 技能匹配加分
pub const SKILL_MATCH_SCORE: f64 = 20.0;
/// critical 任务加分
pub const CRITICAL_PRIORITY_SCORE: f64 = 10.0;

// ==========================================
// TechnicianScorer - 技术员适配评分引擎
// ==========================================
pub struct TechnicianScorer {
    // 无状态引擎,不需要注入依赖
}

impl TechnicianScorer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 计算适配评分
    ///
    /// 规则:
    /// - 不可用 → 0（直接短路）
    /// - 可用 +40
    /// - 负荷分 max(0, 30 - workload * 0.3)
    /// - 技能与设备类型匹配 +20（设备台账缺失时不加分）
    /// - 任务优先级 critical +10
    pub fn score(
        &self,
        technician: &Technician,
        task: &MaintenanceTask,
        equipment: Option<&Equipment>,
    ) -> f64 {
        if !technician.is_available {
            return 0.0;
        }

        let mut score = AVAILABILITY_SCORE;

        score += (WORKLOAD_SCORE_MAX - technician.current_workload * WORKLOAD_PENALTY_PER_PERCENT)
            .max(0.0);

        if let Some(equipment) = equipment {
            if technician.has_skill_for(&equipment.equipment_type) {
                score += SKILL_MATCH_SCORE;
            }
        }

        if task.priority == TaskPriority::Critical {
            score += CRITICAL_PRIORITY_SCORE;
        }

        score
    }

    /// 评分 > 0 才可分配
    pub fn is_usable(score: f64) -> bool {
        score > 0.0
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for TechnicianScorer {
    fn default() -> Self {
        Self::new()
    }
}
