// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, TimeZone, Utc};
use predictive_maintenance::domain::{
    Criticality, Equipment, RiskAnalysis, RiskLevel, SensorReading, SensorStatus, Technician,
};

/// 固定的排程时间，保证断言可复现
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
}

// ==========================================
// Equipment 构建器
// ==========================================

pub struct EquipmentBuilder {
    id: String,
    name: String,
    equipment_type: String,
    location: String,
    criticality: Criticality,
}

impl EquipmentBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Unit {}", id),
            equipment_type: "generator".to_string(),
            location: "Building A".to_string(),
            criticality: Criticality::Medium,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn equipment_type(mut self, equipment_type: &str) -> Self {
        self.equipment_type = equipment_type.to_string();
        self
    }

    pub fn criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = criticality;
        self
    }

    pub fn build(self) -> Equipment {
        Equipment {
            id: self.id,
            name: self.name,
            equipment_type: self.equipment_type,
            location: self.location,
            criticality: self.criticality,
            status: "operational".to_string(),
            last_maintenance: None,
            next_scheduled_maintenance: None,
        }
    }
}

// ==========================================
// Technician 构建器
// ==========================================

pub struct TechnicianBuilder {
    id: String,
    skills: Vec<String>,
    workload: f64,
    available: bool,
}

impl TechnicianBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            skills: Vec::new(),
            workload: 0.0,
            available: true,
        }
    }

    pub fn skill(mut self, skill: &str) -> Self {
        self.skills.push(skill.to_string());
        self
    }

    pub fn workload(mut self, workload: f64) -> Self {
        self.workload = workload;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn build(self) -> Technician {
        Technician {
            name: format!("Tech {}", self.id),
            id: self.id,
            skills: self.skills,
            current_workload: self.workload,
            is_available: self.available,
        }
    }
}

// ==========================================
// RiskAnalysis 构建
// ==========================================

pub fn analysis(equipment_id: &str, name: &str, level: RiskLevel, days: u32) -> RiskAnalysis {
    RiskAnalysis {
        equipment_id: equipment_id.to_string(),
        equipment_name: name.to_string(),
        risk_level: level,
        predicted_failure_in_days: days,
        confidence: 0.95,
        recommended_action: "Immediate inspection required; replace failing components".to_string(),
        contributing_factors: vec!["temperature: 130 (normal 20-80) - critical".to_string()],
        last_analysis: fixed_now(),
    }
}

// ==========================================
// 读数构建
// ==========================================

pub fn normal(reading_type: &str, value: f64) -> SensorReading {
    SensorReading::new(reading_type, value, 20.0, 80.0, SensorStatus::Normal)
}

pub fn flagged(reading_type: &str, status: SensorStatus) -> SensorReading {
    SensorReading::new(reading_type, 50.0, 20.0, 80.0, status)
}
