// ==========================================
// 设施预测性维护 - 传感器读数领域模型
// ==========================================
// 用途: RiskAnalyzer 的输入，不落库
// ==========================================

use crate::domain::types::SensorStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// NormalRange - 正常区间
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    pub min: f64,
    pub max: f64,
}

impl NormalRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// 判断读数是否落在按比例放宽后的区间之外
    ///
    /// 放宽幅度按各自边界绝对值计算，负数边界同样适用:
    /// - 下界: min - |min| * tolerance
    /// - 上界: max + |max| * tolerance
    pub fn is_outside(&self, value: f64, tolerance: f64) -> bool {
        let lower = self.min - self.min.abs() * tolerance;
        let upper = self.max + self.max.abs() * tolerance;
        value < lower || value > upper
    }
}

// ==========================================
// SensorReading - 传感器读数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "type")]
    pub reading_type: String, // 读数类型 (temperature / vibration / ...)
    pub value: f64,
    pub normal_range: NormalRange,
    pub status: SensorStatus,
}

impl SensorReading {
    pub fn new(reading_type: &str, value: f64, min: f64, max: f64, status: SensorStatus) -> Self {
        Self {
            reading_type: reading_type.to_string(),
            value,
            normal_range: NormalRange::new(min, max),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_outside_positive_bounds() {
        let range = NormalRange::new(50.0, 100.0);
        assert!(!range.is_outside(105.0, 0.1));
        assert!(range.is_outside(111.0, 0.1));
        assert!(!range.is_outside(119.0, 0.2));
        assert!(range.is_outside(121.0, 0.2));
        assert!(range.is_outside(39.0, 0.2));
    }

    #[test]
    fn test_is_outside_negative_lower_bound() {
        let range = NormalRange::new(-10.0, 10.0);
        assert!(!range.is_outside(-11.0, 0.2));
        assert!(range.is_outside(-12.5, 0.2));
    }
}
