// ==========================================
// 设施预测性维护 - 风险分析领域模型
// ==========================================
// 用途: RiskAnalyzer 的输出，Scheduler 只读引用
// 约束: 生成后不可变
// ==========================================

use crate::domain::types::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RiskAnalysis - 单台设备风险分析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub equipment_id: String,
    pub equipment_name: String,
    pub risk_level: RiskLevel,
    pub predicted_failure_in_days: u32, // 预测失效窗口（天），>= 1
    pub confidence: f64,                // 置信度 [0, 1]
    pub recommended_action: String,     // 以 ';' 分句的处置建议
    pub contributing_factors: Vec<String>,
    pub last_analysis: DateTime<Utc>,
}

impl RiskAnalysis {
    /// 是否需要生成维修任务
    pub fn requires_maintenance(&self) -> bool {
        self.risk_level != RiskLevel::Low
    }

    /// 处置建议的第一句
    ///
    /// 以第一个 ';' 或 '.' 截断，两端去空白
    pub fn first_action_clause(&self) -> &str {
        self.recommended_action
            .split(|c| c == ';' || c == '.')
            .next()
            .unwrap_or("")
            .trim()
    }
}
