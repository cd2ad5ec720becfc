// ==========================================
// 设施预测性维护 - 设备与库存领域模型
// ==========================================
// 设备台账与库存快照均由外部目录提供，核心只读
// ==========================================

use crate::domain::types::Criticality;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Equipment - 设备台账
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String, // generator / ac_unit / pump / compressor / ...
    pub location: String,
    pub criticality: Criticality,
    pub status: String,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub next_scheduled_maintenance: Option<DateTime<Utc>>,
}

// ==========================================
// InventoryItem - 库存快照条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: i64,
}

impl InventoryItem {
    pub fn new(name: &str, quantity: i64) -> Self {
        Self {
            name: name.to_string(),
            quantity,
        }
    }

    /// 有库存且名称包含配件名（大小写不敏感）
    pub fn supplies(&self, part_name: &str) -> bool {
        self.quantity > 0 && self.name.to_lowercase().contains(&part_name.to_lowercase())
    }
}
