// ==========================================
// 设施预测性维护 - 维修完工记录数据仓储
// ==========================================
// 完工记录由现场回填，统计聚合只读
// ==========================================

use crate::domain::task::MaintenanceLog;
use crate::repository::db_utils::{format_ts, parse_ts};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct MaintenanceLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceLogRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入完工记录（task_id 必须存在，否则外键违反）
    pub fn create(&self, log: &MaintenanceLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO maintenance_log (
                log_id, task_id, equipment_id, technician_id, actual_duration, completed_at, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                log.id,
                log.task_id,
                log.equipment_id,
                log.technician_id,
                log.actual_duration,
                format_ts(&log.completed_at),
                log.notes,
            ],
        )?;
        Ok(())
    }

    /// 查询时间窗口 [start, end) 内完成的记录
    pub fn find_by_window(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<MaintenanceLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT log_id, task_id, equipment_id, technician_id, actual_duration, completed_at, notes
             FROM maintenance_log
             WHERE completed_at >= ?1 AND completed_at < ?2
             ORDER BY completed_at, rowid",
        )?;
        let rows = stmt
            .query_map(
                params![format_ts(&window_start), format_ts(&window_end)],
                map_log_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 查询某任务的全部记录
    pub fn find_by_task(&self, task_id: &str) -> RepositoryResult<Vec<MaintenanceLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT log_id, task_id, equipment_id, technician_id, actual_duration, completed_at, notes
             FROM maintenance_log WHERE task_id = ?1 ORDER BY completed_at, rowid",
        )?;
        let rows = stmt
            .query_map(params![task_id], map_log_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn map_log_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceLog> {
    Ok(MaintenanceLog {
        id: row.get(0)?,
        task_id: row.get(1)?,
        equipment_id: row.get(2)?,
        technician_id: row.get(3)?,
        actual_duration: row.get(4)?,
        completed_at: parse_ts(5, &row.get::<_, String>(5)?)?,
        notes: row.get(6)?,
    })
}
