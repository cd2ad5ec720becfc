// ==========================================
// 设施预测性维护 - 技术员领域模型
// ==========================================
// 排程期间的负荷变化只作用于运行内工作副本，
// 以 WorkloadUpdate 差异列表交还调用方落库
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Technician - 技术员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub current_workload: f64, // 已占用产能百分比，可超过 100
    pub is_available: bool,
}

impl Technician {
    pub fn new(id: &str, name: &str, skills: &[&str], current_workload: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            current_workload,
            is_available: true,
        }
    }

    /// 技能与设备类型是否匹配（双向子串，大小写不敏感）
    pub fn has_skill_for(&self, equipment_type: &str) -> bool {
        let equipment_type = equipment_type.trim().to_lowercase();
        if equipment_type.is_empty() {
            return false;
        }
        self.skills.iter().any(|skill| {
            let skill = skill.trim().to_lowercase();
            !skill.is_empty() && (skill.contains(&equipment_type) || equipment_type.contains(&skill))
        })
    }
}

// ==========================================
// WorkloadUpdate - 单次排程运行的负荷变更
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadUpdate {
    pub technician_id: String,
    pub previous_workload: f64,
    pub new_workload: f64,
    pub is_available: bool,
    pub assigned_task_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_skill_for_both_directions() {
        let tech = Technician::new("T1", "Alice", &["Generator Repair", "hvac"], 0.0);
        assert!(tech.has_skill_for("generator"));
        assert!(!tech.has_skill_for("pump"));

        let tech = Technician::new("T2", "Bob", &["pump"], 0.0);
        assert!(tech.has_skill_for("Pump_Station"));
    }

    #[test]
    fn test_blank_skill_never_matches() {
        let tech = Technician::new("T3", "Eve", &["  "], 0.0);
        assert!(!tech.has_skill_for("generator"));
        assert!(!tech.has_skill_for(""));
    }
}
