// ==========================================
// 设施预测性维护 - 维修业务 API
// ==========================================
// 职责: 封装 风险分析 / 排程运行 / 指标聚合 / 任务状态迁移
// 架构: API 层 → Engine 层（纯计算） + Repository 层（持久化）
// 并发: 排程运行通过运行锁串行化，同一时刻只有一次运行在读写技术员负荷
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, MaintenanceConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::risk::RiskAnalysis;
use crate::domain::sensor::SensorReading;
use crate::domain::task::{MaintenanceLog, MaintenanceTask};
use crate::domain::types::TaskStatus;
use crate::engine::{AnalyticsAggregator, AnalyticsReport, MaintenanceSchedule, MaintenanceScheduler, RiskAnalyzer};
use crate::repository::{
    EquipmentRepository, InventoryRepository, MaintenanceLogRepository,
    MaintenanceTaskRepository, TaskFilter, TechnicianRepository,
};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

// ==========================================
// MaintenanceApi - 维修业务 API
// ==========================================
pub struct MaintenanceApi {
    equipment_repo: Arc<EquipmentRepository>,
    technician_repo: Arc<TechnicianRepository>,
    inventory_repo: Arc<InventoryRepository>,
    task_repo: Arc<MaintenanceTaskRepository>,
    log_repo: Arc<MaintenanceLogRepository>,
    config: Arc<ConfigManager>,
    analyzer: RiskAnalyzer,
    run_lock: tokio::sync::Mutex<()>,
}

impl MaintenanceApi {
    /// 打开数据库文件并初始化表结构
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从共享连接构造（所有仓储共用同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(Self {
            equipment_repo: Arc::new(EquipmentRepository::from_connection(conn.clone())),
            technician_repo: Arc::new(TechnicianRepository::from_connection(conn.clone())),
            inventory_repo: Arc::new(InventoryRepository::from_connection(conn.clone())),
            task_repo: Arc::new(MaintenanceTaskRepository::from_connection(conn.clone())),
            log_repo: Arc::new(MaintenanceLogRepository::from_connection(conn)),
            config: Arc::new(config),
            analyzer: RiskAnalyzer::new(),
            run_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn equipment_repo(&self) -> &Arc<EquipmentRepository> {
        &self.equipment_repo
    }

    pub fn technician_repo(&self) -> &Arc<TechnicianRepository> {
        &self.technician_repo
    }

    pub fn inventory_repo(&self) -> &Arc<InventoryRepository> {
        &self.inventory_repo
    }

    pub fn task_repo(&self) -> &Arc<MaintenanceTaskRepository> {
        &self.task_repo
    }

    pub fn config(&self) -> &Arc<ConfigManager> {
        &self.config
    }

    // ==========================================
    // 风险分析
    // ==========================================

    /// 分析单台设备的传感器读数
    ///
    /// # 参数
    /// - equipment_id: 设备ID（不能为空）
    /// - readings: 读数列表；None 视为缺失输入，空列表合法（结果为 LOW）
    ///
    /// # 返回
    /// - Ok(RiskAnalysis): 分析结果（设备未登记时名称使用设备ID）
    /// - Err(ApiError::InvalidInput): 输入校验失败
    pub fn analyze_equipment(
        &self,
        equipment_id: &str,
        readings: Option<&[SensorReading]>,
    ) -> ApiResult<RiskAnalysis> {
        self.analyze_equipment_at(equipment_id, readings, Utc::now())
    }

    /// 同 analyze_equipment，显式指定分析时间
    pub fn analyze_equipment_at(
        &self,
        equipment_id: &str,
        readings: Option<&[SensorReading]>,
        now: DateTime<Utc>,
    ) -> ApiResult<RiskAnalysis> {
        if equipment_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("设备ID不能为空".to_string()));
        }
        let readings = readings
            .ok_or_else(|| ApiError::InvalidInput("传感器读数不能为空".to_string()))?;

        let name = self
            .equipment_repo
            .find_by_id(equipment_id)?
            .map(|e| e.name)
            .unwrap_or_else(|| equipment_id.to_string());

        Ok(self.analyzer.analyze(equipment_id, &name, readings, now))
    }

    // ==========================================
    // 排程运行
    // ==========================================

    /// 执行一次排程运行并落库
    pub async fn run_schedule(&self, analyses: &[RiskAnalysis]) -> ApiResult<MaintenanceSchedule> {
        self.run_schedule_at(analyses, Utc::now()).await
    }

    /// 同 run_schedule，显式指定排程时间
    ///
    /// 流程:
    /// 1) 获取运行锁
    /// 2) 重新加载技术员池、设备台账、库存快照
    /// 3) 读取排程配置并执行排程
    /// 4) 落库: 全部任务（已排程 + 未排程） + 技术员负荷差异，单事务
    #[instrument(skip_all, fields(analyses_count = analyses.len()))]
    pub async fn run_schedule_at(
        &self,
        analyses: &[RiskAnalysis],
        now: DateTime<Utc>,
    ) -> ApiResult<MaintenanceSchedule> {
        let _guard = self.run_lock.lock().await;

        let technicians = self.technician_repo.find_all()?;
        let equipment = self.equipment_repo.find_all()?;
        let inventory = self.inventory_repo.snapshot()?;

        let scheduler_config = self
            .config
            .load_scheduler_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let scheduler = MaintenanceScheduler::new(scheduler_config);

        let schedule = scheduler.schedule(analyses, &technicians, &equipment, &inventory, now);

        let mut tasks: Vec<MaintenanceTask> =
            Vec::with_capacity(schedule.scheduled_tasks.len() + schedule.unscheduled_tasks.len());
        tasks.extend(schedule.scheduled_tasks.iter().cloned());
        tasks.extend(schedule.unscheduled_tasks.iter().cloned());
        let (persisted, updated) = self
            .task_repo
            .persist_schedule_run(&tasks, &schedule.workload_updates)?;

        if !schedule.conflicts.is_empty() {
            warn!(conflicts_count = schedule.conflicts.len(), "排程存在未分配任务");
        }
        info!(
            persisted_tasks = persisted,
            updated_technicians = updated,
            "排程结果已落库"
        );

        Ok(schedule)
    }

    // ==========================================
    // 指标聚合
    // ==========================================

    /// 聚合时间窗口 [start, end) 内的任务与完工记录
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 窗口起点不早于终点
    pub async fn aggregate(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> ApiResult<AnalyticsReport> {
        if window_start >= window_end {
            return Err(ApiError::InvalidInput(format!(
                "统计窗口无效: start={} end={}",
                window_start, window_end
            )));
        }

        let imminent_failure_days = self
            .config
            .get_imminent_failure_days()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let tasks = self
            .task_repo
            .find_by_filter(&TaskFilter::window(window_start, window_end))?;
        let logs = self.log_repo.find_by_window(window_start, window_end)?;

        Ok(AnalyticsAggregator::new(imminent_failure_days).aggregate(&tasks, &logs))
    }

    // ==========================================
    // 任务生命周期
    // ==========================================

    /// 外部状态迁移（仅允许沿生命周期前进一步）
    pub fn update_task_status(&self, task_id: &str, status: TaskStatus) -> ApiResult<MaintenanceTask> {
        if task_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("任务ID不能为空".to_string()));
        }
        let task = self.task_repo.update_status(task_id, status)?;
        info!(task_id = %task.id, status = %task.status, "任务状态已更新");
        Ok(task)
    }

    /// 登记完工记录
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 任务不存在
    /// - Err(ApiError::InvalidInput): 实际工时为 0
    pub fn record_maintenance_log(&self, log: &MaintenanceLog) -> ApiResult<()> {
        if log.actual_duration == Some(0) {
            return Err(ApiError::InvalidInput("实际工时必须大于0".to_string()));
        }
        if self.task_repo.find_by_id(&log.task_id)?.is_none() {
            return Err(ApiError::NotFound(format!("MaintenanceTask(id={})不存在", log.task_id)));
        }
        self.log_repo.create(log)?;
        Ok(())
    }
}
