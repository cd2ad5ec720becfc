// ==========================================
// 设施预测性维护 - 风险分析引擎
// ==========================================
// 职责: 传感器读数 → 单台设备风险分级
// 输入: 单台设备的有序读数列表
// 输出: RiskAnalysis (风险等级 + 预测失效窗口 + 可解释因素)
// ==========================================
// 红线: 空读数不是错误，返回低风险
// ==========================================

use crate::domain::risk::RiskAnalysis;
use crate::domain::sensor::SensorReading;
use crate::domain::types::{RiskLevel, SensorStatus};
use chrono::{DateTime, Utc};

/// 危险带：超出正常区间边界 20%
pub const CRITICAL_BAND: f64 = 0.2;
/// 预警带：超出正常区间边界 10%
pub const WARNING_BAND: f64 = 0.1;

// ==========================================
// 读数分桶结果
// ==========================================
#[derive(Debug, Default)]
struct ReadingBuckets<'a> {
    critical: Vec<&'a SensorReading>,
    warning: Vec<&'a SensorReading>,
}

// ==========================================
// RiskAnalyzer - 风险分析引擎
// ==========================================
pub struct RiskAnalyzer {
    // 无状态引擎,不需要注入依赖
}

impl RiskAnalyzer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分析单台设备的风险
    ///
    /// 判定顺序（首个命中即返回）:
    /// 1) critical >= 2 → CRITICAL, 失效窗口 max(1, 7 - critical), 置信度 0.95
    /// 2) critical >= 1 或 warning >= 3 → HIGH, 失效窗口 max(7, 30 - warning), 置信度 0.88
    /// 3) warning >= 1 → MEDIUM, 45 天, 置信度 0.82
    /// 4) 其余 → LOW, 90 天, 置信度 0.85
    ///
    /// # 参数
    /// - `equipment_id`: 设备ID
    /// - `equipment_name`: 设备名称（台账缺失时由调用方传入ID）
    /// - `readings`: 有序读数列表
    /// - `now`: 分析时间
    pub fn analyze(
        &self,
        equipment_id: &str,
        equipment_name: &str,
        readings: &[SensorReading],
        now: DateTime<Utc>,
    ) -> RiskAnalysis {
        let buckets = self.partition(readings);
        let critical_count = buckets.critical.len() as i64;
        let warning_count = buckets.warning.len() as i64;

        let (risk_level, predicted_failure_in_days, confidence) =
            Self::classify(critical_count, warning_count);

        let recommended_action = self.build_recommended_action(risk_level, &buckets);
        let contributing_factors = self.build_contributing_factors(&buckets);

        tracing::debug!(
            equipment_id,
            critical_count,
            warning_count,
            risk_level = %risk_level,
            predicted_failure_in_days,
            "风险分析完成"
        );

        RiskAnalysis {
            equipment_id: equipment_id.to_string(),
            equipment_name: equipment_name.to_string(),
            risk_level,
            predicted_failure_in_days,
            confidence,
            recommended_action,
            contributing_factors,
            last_analysis: now,
        }
    }

    /// 分级规则
    ///
    /// # 返回
    /// (风险等级, 预测失效天数, 置信度)
    pub fn classify(critical_count: i64, warning_count: i64) -> (RiskLevel, u32, f64) {
        if critical_count >= 2 {
            let days = (7 - critical_count).max(1);
            (RiskLevel::Critical, days as u32, 0.95)
        } else if critical_count >= 1 || warning_count >= 3 {
            let days = (30 - warning_count).max(7);
            (RiskLevel::High, days as u32, 0.88)
        } else if warning_count >= 1 {
            (RiskLevel::Medium, 45, 0.82)
        } else {
            (RiskLevel::Low, 90, 0.85)
        }
    }

    // ==========================================
    // 读数分桶
    // ==========================================

    /// 读数分桶，每条读数至多进入一个桶
    ///
    /// - critical: status=critical 或超出 20% 危险带
    /// - warning: status=warning 或超出 10% 预警带
    fn partition<'a>(&self, readings: &'a [SensorReading]) -> ReadingBuckets<'a> {
        let mut buckets = ReadingBuckets::default();

        for reading in readings {
            if Self::is_critical(reading) {
                buckets.critical.push(reading);
            } else if Self::is_warning(reading) {
                buckets.warning.push(reading);
            }
        }

        buckets
    }

    fn is_critical(reading: &SensorReading) -> bool {
        reading.status == SensorStatus::Critical
            || reading.normal_range.is_outside(reading.value, CRITICAL_BAND)
    }

    fn is_warning(reading: &SensorReading) -> bool {
        reading.status == SensorStatus::Warning
            || reading.normal_range.is_outside(reading.value, WARNING_BAND)
    }

    // ==========================================
    // 可解释输出
    // ==========================================

    /// 生成处置建议（以 ';' 分句，首句用于任务描述）
    fn build_recommended_action(&self, level: RiskLevel, buckets: &ReadingBuckets<'_>) -> String {
        let summary = Self::describe_buckets(buckets);
        match level {
            RiskLevel::Critical => format!(
                "Immediate inspection required ({}); shut down if safe and replace failing components",
                summary
            ),
            RiskLevel::High => format!(
                "Schedule maintenance within 7 days ({}); monitor closely until serviced",
                summary
            ),
            RiskLevel::Medium => format!(
                "Plan preventive maintenance within 30 days ({}); continue monitoring",
                summary
            ),
            RiskLevel::Low => "Continue routine monitoring; no anomalies detected".to_string(),
        }
    }

    /// 按桶列出去重后的读数类型（保持首次出现顺序）
    fn describe_buckets(buckets: &ReadingBuckets<'_>) -> String {
        let mut parts = Vec::new();
        let critical_types = Self::distinct_types(&buckets.critical);
        if !critical_types.is_empty() {
            parts.push(format!("critical: {}", critical_types.join(", ")));
        }
        let warning_types = Self::distinct_types(&buckets.warning);
        if !warning_types.is_empty() {
            parts.push(format!("warning: {}", warning_types.join(", ")));
        }
        parts.join(" / ")
    }

    fn distinct_types<'a>(readings: &[&'a SensorReading]) -> Vec<&'a str> {
        let mut types: Vec<&str> = Vec::new();
        for reading in readings {
            if !types.contains(&reading.reading_type.as_str()) {
                types.push(reading.reading_type.as_str());
            }
        }
        types
    }

    /// 每条被标记的读数一条因素，critical 在前，桶内保持输入顺序
    fn build_contributing_factors(&self, buckets: &ReadingBuckets<'_>) -> Vec<String> {
        let critical = buckets
            .critical
            .iter()
            .map(|r| Self::describe_reading(r, "critical"));
        let warning = buckets
            .warning
            .iter()
            .map(|r| Self::describe_reading(r, "warning"));
        critical.chain(warning).collect()
    }

    fn describe_reading(reading: &SensorReading, severity: &str) -> String {
        format!(
            "{}: {} (normal {}-{}) - {}",
            reading.reading_type,
            reading.value,
            reading.normal_range.min,
            reading.normal_range.max,
            severity
        )
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for RiskAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
