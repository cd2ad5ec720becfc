// ==========================================
// 设施预测性维护 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::maintenance_config_trait::MaintenanceConfigReader;
use crate::config::scheduler_config::SchedulerConfig;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const AVAILABILITY_WORKLOAD_CAP: &str = "scheduler/availability_workload_cap";
    pub const WORKDAY_MINUTES: &str = "scheduler/workday_minutes";
    pub const WORKLOAD_DELAY_STEP: &str = "scheduler/workload_delay_step";
    pub const IMMINENT_FAILURE_DAYS: &str = "analytics/imminent_failure_days";
}

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取数值配置，缺失或格式错误时回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        default_value = %default,
                        "配置格式错误，使用默认值"
                    );
                    Ok(default)
                }
            },
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式，按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }
}

// ==========================================
// MaintenanceConfigReader Trait 实现
// ==========================================
#[async_trait]
impl MaintenanceConfigReader for ConfigManager {
    async fn get_availability_workload_cap(&self) -> Result<f64, Box<dyn Error>> {
        let cap = self.get_parsed_or_default(
            config_keys::AVAILABILITY_WORKLOAD_CAP,
            SchedulerConfig::DEFAULT_AVAILABILITY_WORKLOAD_CAP,
        )?;
        // 无穷上限会放入任意负荷的技术员，延后天数溢出
        if cap <= 0.0 || !cap.is_finite() {
            tracing::warn!(
                config_key = config_keys::AVAILABILITY_WORKLOAD_CAP,
                cap,
                "负荷上限无效，使用默认值"
            );
            return Ok(SchedulerConfig::DEFAULT_AVAILABILITY_WORKLOAD_CAP);
        }
        Ok(cap)
    }

    async fn get_workday_minutes(&self) -> Result<u32, Box<dyn Error>> {
        let minutes = self.get_parsed_or_default(
            config_keys::WORKDAY_MINUTES,
            SchedulerConfig::DEFAULT_WORKDAY_MINUTES,
        )?;
        // 0 分钟会导致负荷换算除零
        if minutes == 0 {
            return Ok(SchedulerConfig::DEFAULT_WORKDAY_MINUTES);
        }
        Ok(minutes)
    }

    async fn get_workload_delay_step(&self) -> Result<f64, Box<dyn Error>> {
        let step = self.get_parsed_or_default(
            config_keys::WORKLOAD_DELAY_STEP,
            SchedulerConfig::DEFAULT_WORKLOAD_DELAY_STEP,
        )?;
        if step <= 0.0 || !step.is_finite() {
            return Ok(SchedulerConfig::DEFAULT_WORKLOAD_DELAY_STEP);
        }
        Ok(step)
    }

    async fn get_imminent_failure_days(&self) -> Result<u32, Box<dyn Error>> {
        self.get_parsed_or_default(
            config_keys::IMMINENT_FAILURE_DAYS,
            SchedulerConfig::DEFAULT_IMMINENT_FAILURE_DAYS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn create_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_table_empty() {
        let manager = create_manager();
        let config = manager.load_scheduler_config().await.unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[tokio::test]
    async fn test_override_and_malformed_fallback() {
        let manager = create_manager();
        manager
            .set_global_config_value(config_keys::AVAILABILITY_WORKLOAD_CAP, "90")
            .unwrap();
        manager
            .set_global_config_value(config_keys::WORKDAY_MINUTES, "not-a-number")
            .unwrap();

        let config = manager.load_scheduler_config().await.unwrap();
        assert_eq!(config.availability_workload_cap, 90.0);
        assert_eq!(config.workday_minutes, 480);
    }

    #[tokio::test]
    async fn test_zero_workday_minutes_falls_back() {
        let manager = create_manager();
        manager
            .set_global_config_value(config_keys::WORKDAY_MINUTES, "0")
            .unwrap();
        assert_eq!(manager.get_workday_minutes().await.unwrap(), 480);
    }

    #[tokio::test]
    async fn test_invalid_workload_cap_falls_back() {
        let manager = create_manager();
        for raw in ["inf", "NaN", "0", "-10"] {
            manager
                .set_global_config_value(config_keys::AVAILABILITY_WORKLOAD_CAP, raw)
                .unwrap();
            assert_eq!(manager.get_availability_workload_cap().await.unwrap(), 80.0);
        }
    }

    #[test]
    fn test_config_snapshot_sorted() {
        let manager = create_manager();
        manager.set_global_config_value("b", "2").unwrap();
        manager.set_global_config_value("a", "1").unwrap();
        assert_eq!(manager.get_config_snapshot().unwrap(), r#"{"a":"1","b":"2"}"#);
    }
}
