// ==========================================
// 设施预测性维护 - 引擎编排器
// ==========================================
// 用途: 协调 风险分析 → 任务生成 → 排程 的执行顺序
// 说明: 纯内存流程，数据加载与落库由 API 层负责
// ==========================================

use crate::config::MaintenanceConfigReader;
use crate::domain::equipment::{Equipment, InventoryItem};
use crate::domain::risk::RiskAnalysis;
use crate::domain::sensor::SensorReading;
use crate::domain::technician::Technician;
use crate::engine::{MaintenanceSchedule, MaintenanceScheduler, RiskAnalyzer};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// PipelineResult - 端到端结果
// ==========================================

#[derive(Debug, Clone)]
pub struct PipelineResult {
    // RiskAnalyzer 输出（与输入设备顺序一致）
    pub analyses: Vec<RiskAnalysis>,

    // Scheduler 输出
    pub schedule: MaintenanceSchedule,
}

// ==========================================
// MaintenanceOrchestrator - 引擎编排器
// ==========================================

pub struct MaintenanceOrchestrator<C>
where
    C: MaintenanceConfigReader,
{
    config: Arc<C>,
    analyzer: RiskAnalyzer,
}

impl<C> MaintenanceOrchestrator<C>
where
    C: MaintenanceConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self {
            config,
            analyzer: RiskAnalyzer::new(),
        }
    }

    /// 分析多台设备的读数
    ///
    /// 设备名称取自台账，台账缺失时使用设备ID
    pub fn analyze_all(
        &self,
        readings_by_equipment: &[(String, Vec<SensorReading>)],
        equipment: &[Equipment],
        now: DateTime<Utc>,
    ) -> Vec<RiskAnalysis> {
        let names: HashMap<&str, &str> = equipment
            .iter()
            .map(|e| (e.id.as_str(), e.name.as_str()))
            .collect();

        readings_by_equipment
            .iter()
            .map(|(equipment_id, readings)| {
                let name = names
                    .get(equipment_id.as_str())
                    .copied()
                    .unwrap_or(equipment_id.as_str());
                self.analyzer.analyze(equipment_id, name, readings, now)
            })
            .collect()
    }

    /// 执行完整流程: 读数 → 风险分析 → 排程
    ///
    /// # 参数
    /// - readings_by_equipment: (设备ID, 读数列表)
    /// - technicians: 本次运行加载的技术员快照
    /// - equipment: 设备台账
    /// - inventory: 库存快照
    /// - now: 排程时间
    pub async fn execute_pipeline(
        &self,
        readings_by_equipment: &[(String, Vec<SensorReading>)],
        technicians: &[Technician],
        equipment: &[Equipment],
        inventory: &[InventoryItem],
        now: DateTime<Utc>,
    ) -> Result<PipelineResult, Box<dyn Error>> {
        info!(
            equipment_count = readings_by_equipment.len(),
            technicians_count = technicians.len(),
            "开始执行预测性维护流程"
        );

        // ==========================================
        // 步骤1: RiskAnalyzer - 风险分析
        // ==========================================
        debug!("步骤1: 执行风险分析");
        let analyses = self.analyze_all(readings_by_equipment, equipment, now);

        // ==========================================
        // 步骤2: Scheduler - 任务生成与排程
        // ==========================================
        debug!("步骤2: 读取排程配置并执行排程");
        let scheduler_config = self.config.load_scheduler_config().await?;
        let scheduler = MaintenanceScheduler::new(scheduler_config);
        let schedule = scheduler.schedule(&analyses, technicians, equipment, inventory, now);

        info!(
            analyses_count = analyses.len(),
            scheduled_count = schedule.scheduled_tasks.len(),
            unscheduled_count = schedule.unscheduled_tasks.len(),
            "预测性维护流程完成"
        );

        Ok(PipelineResult { analyses, schedule })
    }
}
