// ==========================================
// 设施预测性维护 - 设备台账数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::equipment::{Equipment, InventoryItem};
use crate::domain::types::Criticality;
use crate::repository::db_utils::{format_ts, parse_enum, parse_opt_ts};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const EQUIPMENT_COLUMNS: &str = "equipment_id, name, equipment_type, location, criticality, status, \
                                 last_maintenance, next_scheduled_maintenance";

// ==========================================
// EquipmentRepository - 设备台账仓储
// ==========================================
pub struct EquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentRepository {
    /// 创建新的 EquipmentRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新设备
    pub fn upsert(&self, equipment: &Equipment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO equipment (
                equipment_id, name, equipment_type, location, criticality, status,
                last_maintenance, next_scheduled_maintenance
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(equipment_id) DO UPDATE SET
                name = excluded.name,
                equipment_type = excluded.equipment_type,
                location = excluded.location,
                criticality = excluded.criticality,
                status = excluded.status,
                last_maintenance = excluded.last_maintenance,
                next_scheduled_maintenance = excluded.next_scheduled_maintenance
            "#,
            params![
                equipment.id,
                equipment.name,
                equipment.equipment_type,
                equipment.location,
                equipment.criticality.to_db_str(),
                equipment.status,
                equipment.last_maintenance.as_ref().map(format_ts),
                equipment.next_scheduled_maintenance.as_ref().map(format_ts),
            ],
        )?;
        Ok(())
    }

    /// 查询全部设备（按写入顺序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Equipment>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM equipment ORDER BY rowid", EQUIPMENT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_equipment_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// 按ID查询设备
    pub fn find_by_id(&self, equipment_id: &str) -> RepositoryResult<Option<Equipment>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM equipment WHERE equipment_id = ?1", EQUIPMENT_COLUMNS);
        conn.query_row(&sql, params![equipment_id], map_equipment_row)
            .optional()
            .map_err(Into::into)
    }
}

fn map_equipment_row(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        id: row.get(0)?,
        name: row.get(1)?,
        equipment_type: row.get(2)?,
        location: row.get(3)?,
        criticality: parse_enum(4, &row.get::<_, String>(4)?, Criticality::from_db_str)?,
        status: row.get(5)?,
        last_maintenance: parse_opt_ts(6, row.get(6)?)?,
        next_scheduled_maintenance: parse_opt_ts(7, row.get(7)?)?,
    })
}

// ==========================================
// InventoryRepository - 库存仓储
// ==========================================
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新库存数量
    pub fn upsert(&self, item: &InventoryItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO inventory_item (name, quantity) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET quantity = excluded.quantity",
            params![item.name, item.quantity],
        )?;
        Ok(())
    }

    /// 当前库存快照
    pub fn snapshot(&self) -> RepositoryResult<Vec<InventoryItem>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT name, quantity FROM inventory_item ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(InventoryItem {
                name: row.get(0)?,
                quantity: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
