// ==========================================
// 设施预测性维护 - 技术员目录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 排程运行前整表加载（池顺序 = 写入顺序），运行后按差异列表回写负荷
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::technician::{Technician, WorkloadUpdate};
use crate::repository::db_utils::parse_string_list;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// TechnicianRepository - 技术员仓储
// ==========================================
pub struct TechnicianRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TechnicianRepository {
    /// 创建新的 TechnicianRepository 实例
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

    /// 新增或更新技术员
    pub fn upsert(&self, technician: &Technician) -> RepositoryResult<()> {
        let skills_json = serde_json::to_string(&technician.skills)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO technician (technician_id, name, skills_json, current_workload, is_available)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(technician_id) DO UPDATE SET
                name = excluded.name,
                skills_json = excluded.skills_json,
                current_workload = excluded.current_workload,
                is_available = excluded.is_available,
                updated_at = datetime('now')
            "#,
            params![
                technician.id,
                technician.name,
                skills_json,
                technician.current_workload,
                technician.is_available,
            ],
        )?;
        Ok(())
    }

    /// 加载全部技术员（按写入顺序）
    pub fn find_all(&self) -> RepositoryResult<Vec<Technician>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT technician_id, name, skills_json, current_workload, is_available
             FROM technician ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], map_technician_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// 按ID查询技术员
    pub fn find_by_id(&self, technician_id: &str) -> RepositoryResult<Option<Technician>> {
        let conn = self.get_conn()?;
        conn.query_row(
            "SELECT technician_id, name, skills_json, current_workload, is_available
             FROM technician WHERE technician_id = ?1",
            params![technician_id],
            map_technician_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// 回写一次排程运行的负荷差异（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 更新的记录数（未知技术员被忽略）
    pub fn apply_workload_updates(&self, updates: &[WorkloadUpdate]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let count = write_workload_updates(&tx, updates)?;

        tx.commit()?;
        Ok(count)
    }
}

/// 在调用方事务内逐条回写负荷差异
///
/// # 返回
/// - Ok(usize): 命中的技术员数
pub(crate) fn write_workload_updates(
    conn: &Connection,
    updates: &[WorkloadUpdate],
) -> RepositoryResult<usize> {
    let mut count = 0;
    for update in updates {
        count += conn.execute(
            "UPDATE technician
             SET current_workload = ?1, is_available = ?2, updated_at = datetime('now')
             WHERE technician_id = ?3",
            params![update.new_workload, update.is_available, update.technician_id],
        )?;
    }
    Ok(count)
}

fn map_technician_row(row: &Row<'_>) -> rusqlite::Result<Technician> {
    Ok(Technician {
        id: row.get(0)?,
        name: row.get(1)?,
        skills: parse_string_list(2, &row.get::<_, String>(2)?)?,
        current_workload: row.get(3)?,
        is_available: row.get(4)?,
    })
}
