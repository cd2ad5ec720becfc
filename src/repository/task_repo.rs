// ==========================================
// 设施预测性维护 - 维修任务数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 状态迁移合法性由 TaskStatus::can_transition_to 判定，仓储只负责拒绝写入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::task::MaintenanceTask;
use crate::domain::technician::WorkloadUpdate;
use crate::domain::types::{TaskPriority, TaskStatus};
use crate::repository::db_utils::{format_ts, parse_enum, parse_string_list, parse_ts};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::technician_repo::write_workload_updates;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const TASK_COLUMNS: &str = "task_id, equipment_id, equipment_name, description, priority, status, \
                            assigned_to, estimated_duration, scheduled_date, predicted_failure_in_days, \
                            required_parts_json, notes";

// ==========================================
// TaskFilter - 任务查询条件
// ==========================================
// 所有条件为 AND 组合；None 表示不过滤
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub equipment_id: Option<String>,
    pub assigned_to: Option<String>,
    pub scheduled_from: Option<DateTime<Utc>>, // 含
    pub scheduled_to: Option<DateTime<Utc>>,   // 不含
}

impl TaskFilter {
    /// 按排程时间窗口过滤 [from, to)
    pub fn window(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            scheduled_from: Some(from),
            scheduled_to: Some(to),
            ..Default::default()
        }
    }
}

// ==========================================
// MaintenanceTaskRepository - 维修任务仓储
// ==========================================
pub struct MaintenanceTaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaintenanceTaskRepository {
    /// 创建新的 MaintenanceTaskRepository 实例
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

    /// 新增单个任务
    pub fn create(&self, task: &MaintenanceTask) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_task(&conn, task)
    }

    /// 批量新增任务（单事务，任一失败整体回滚）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn batch_create(&self, tasks: &[MaintenanceTask]) -> RepositoryResult<usize> {
        if tasks.is_empty() {
            return Ok(0);
        }

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for task in tasks {
            insert_task(&tx, task)?;
        }
        tx.commit()?;

        debug!(count = tasks.len(), "批量写入维修任务");
        Ok(tasks.len())
    }

    /// 落库一次排程运行: 全部任务 + 技术员负荷差异（同一事务）
    ///
    /// 要求技术员表与任务表位于同一连接；任一写入失败整体回滚，
    /// 不会留下已分配任务而负荷未增加的记录
    ///
    /// # 返回
    /// - Ok((usize, usize)): (写入任务数, 更新技术员数)
    pub fn persist_schedule_run(
        &self,
        tasks: &[MaintenanceTask],
        updates: &[WorkloadUpdate],
    ) -> RepositoryResult<(usize, usize)> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        for task in tasks {
            insert_task(&tx, task)?;
        }
        let updated = write_workload_updates(&tx, updates)?;
        tx.commit()?;

        debug!(tasks = tasks.len(), technicians = updated, "排程运行结果写入");
        Ok((tasks.len(), updated))
    }

    /// 按ID查询任务
    pub fn find_by_id(&self, task_id: &str) -> RepositoryResult<Option<MaintenanceTask>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM maintenance_task WHERE task_id = ?1", TASK_COLUMNS);
        conn.query_row(&sql, params![task_id], map_task_row)
            .optional()
            .map_err(Into::into)
    }

    /// 按条件查询任务（按排程时间、写入顺序排序）
    pub fn find_by_filter(&self, filter: &TaskFilter) -> RepositoryResult<Vec<MaintenanceTask>> {
        let mut sql = format!("SELECT {} FROM maintenance_task WHERE 1 = 1", TASK_COLUMNS);
        let mut values: Vec<Value> = Vec::new();

        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            values.push(Value::from(status.to_db_str().to_string()));
        }
        if let Some(priority) = filter.priority {
            sql.push_str(" AND priority = ?");
            values.push(Value::from(priority.to_db_str().to_string()));
        }
        if let Some(equipment_id) = &filter.equipment_id {
            sql.push_str(" AND equipment_id = ?");
            values.push(Value::from(equipment_id.clone()));
        }
        if let Some(assigned_to) = &filter.assigned_to {
            sql.push_str(" AND assigned_to = ?");
            values.push(Value::from(assigned_to.clone()));
        }
        if let Some(from) = &filter.scheduled_from {
            sql.push_str(" AND scheduled_date >= ?");
            values.push(Value::from(format_ts(from)));
        }
        if let Some(to) = &filter.scheduled_to {
            sql.push_str(" AND scheduled_date < ?");
            values.push(Value::from(format_ts(to)));
        }
        sql.push_str(" ORDER BY scheduled_date, rowid");

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), map_task_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 更新任务状态
    ///
    /// # 返回
    /// - Ok(MaintenanceTask): 更新后的任务
    /// - Err(NotFound): 任务不存在
    /// - Err(InvalidStateTransition): 迁移不合法
    pub fn update_status(
        &self,
        task_id: &str,
        next: TaskStatus,
    ) -> RepositoryResult<MaintenanceTask> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let sql = format!("SELECT {} FROM maintenance_task WHERE task_id = ?1", TASK_COLUMNS);
        let mut task = tx
            .query_row(&sql, params![task_id], map_task_row)
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "MaintenanceTask".to_string(),
                id: task_id.to_string(),
            })?;

        if !task.status.can_transition_to(next) {
            return Err(RepositoryError::InvalidStateTransition {
                from: task.status.to_string(),
                to: next.to_string(),
            });
        }

        tx.execute(
            "UPDATE maintenance_task SET status = ?1 WHERE task_id = ?2",
            params![next.to_db_str(), task_id],
        )?;
        tx.commit()?;

        task.status = next;
        Ok(task)
    }
}

fn insert_task(conn: &Connection, task: &MaintenanceTask) -> RepositoryResult<()> {
    let parts_json = serde_json::to_string(&task.required_parts)?;
    conn.execute(
        r#"
        INSERT INTO maintenance_task (
            task_id, equipment_id, equipment_name, description, priority, status,
            assigned_to, estimated_duration, scheduled_date, predicted_failure_in_days,
            required_parts_json, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            task.id,
            task.equipment_id,
            task.equipment_name,
            task.description,
            task.priority.to_db_str(),
            task.status.to_db_str(),
            task.assigned_to,
            task.estimated_duration,
            format_ts(&task.scheduled_date),
            task.predicted_failure_in_days,
            parts_json,
            task.notes,
        ],
    )?;
    Ok(())
}

fn map_task_row(row: &Row<'_>) -> rusqlite::Result<MaintenanceTask> {
    Ok(MaintenanceTask {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        equipment_name: row.get(2)?,
        description: row.get(3)?,
        priority: parse_enum(4, &row.get::<_, String>(4)?, TaskPriority::from_db_str)?,
        status: parse_enum(5, &row.get::<_, String>(5)?, TaskStatus::from_db_str)?,
        assigned_to: row.get(6)?,
        estimated_duration: row.get(7)?,
        scheduled_date: parse_ts(8, &row.get::<_, String>(8)?)?,
        predicted_failure_in_days: row.get(9)?,
        required_parts: parse_string_list(10, &row.get::<_, String>(10)?)?,
        notes: row.get(11)?,
    })
}
