// ==========================================
// 设施预测性维护 - 维修排程引擎
// ==========================================
// 职责: 风险排序 → 技术员选择 → 负荷跟踪 → 排程日期计算
// 输入: 风险分析列表 + 技术员池 + 设备台账 + 库存快照
// 输出: 已排程 / 未排程任务 + 冲突说明 + 技术员分配 + 负荷差异
// ==========================================
// 红线: 单次遍历，不回溯，不重试；已排程任务不可再调整
// 红线: 技术员负荷只修改运行内工作副本，以差异列表交还调用方
// 红线: 无可用技术员不是错误，落入未排程并记录冲突
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::equipment::{Equipment, InventoryItem};
use crate::domain::risk::RiskAnalysis;
use crate::domain::task::MaintenanceTask;
use crate::domain::technician::{Technician, WorkloadUpdate};
use crate::domain::types::{RiskLevel, TaskStatus};
use crate::engine::task_factory::TaskFactory;
use crate::engine::technician_scorer::TechnicianScorer;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument, warn};

// ==========================================
// MaintenanceSchedule - 一次排程运行的结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub scheduled_tasks: Vec<MaintenanceTask>,
    pub unscheduled_tasks: Vec<MaintenanceTask>,
    /// 技术员ID → 按分配顺序排列的任务
    pub technician_assignments: BTreeMap<String, Vec<MaintenanceTask>>,
    pub conflicts: Vec<String>,
    /// 本次运行中被分配过任务的技术员负荷变更（池内顺序）
    pub workload_updates: Vec<WorkloadUpdate>,
}

// ==========================================
// TechnicianArena - 运行内技术员工作副本
// ==========================================
// 只收录运行开始时可用且负荷低于上限的技术员
#[derive(Debug)]
struct TechnicianArena {
    slots: Vec<TechnicianSlot>,
}

#[derive(Debug)]
struct TechnicianSlot {
    technician: Technician,
    initial_workload: f64,
    assigned_task_count: usize,
}

impl TechnicianArena {
    fn load(technicians: &[Technician], workload_cap: f64) -> Self {
        let slots = technicians
            .iter()
            .filter(|t| t.is_available && t.current_workload < workload_cap)
            .map(|t| TechnicianSlot {
                technician: t.clone(),
                initial_workload: t.current_workload,
                assigned_task_count: 0,
            })
            .collect();
        Self { slots }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    /// 导出负荷差异（仅包含被分配过任务的技术员）
    fn into_updates(self) -> Vec<WorkloadUpdate> {
        self.slots
            .into_iter()
            .filter(|slot| slot.assigned_task_count > 0)
            .map(|slot| WorkloadUpdate {
                technician_id: slot.technician.id,
                previous_workload: slot.initial_workload,
                new_workload: slot.technician.current_workload,
                is_available: slot.technician.is_available,
                assigned_task_count: slot.assigned_task_count,
            })
            .collect()
    }
}

// ==========================================
// MaintenanceScheduler - 维修排程引擎
// ==========================================
pub struct MaintenanceScheduler {
    config: SchedulerConfig,
    factory: TaskFactory,
    scorer: TechnicianScorer,
}

impl MaintenanceScheduler {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 排程阈值
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            factory: TaskFactory::new(),
            scorer: TechnicianScorer::new(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次排程运行
    ///
    /// 流程:
    /// 1) 过滤 LOW 风险
    /// 2) 排序: critical 优先（稳定划分），同层按预测失效天数升序
    /// 3) 逐条: 生成草稿 → 对池内技术员评分 → 取最高分（并列取先出现者）
    ///    → 无人可用则记未排程 + 冲突；否则落位并回写工作副本负荷
    ///
    /// # 参数
    /// - `analyses`: 待处理的风险分析
    /// - `technicians`: 技术员目录（每次运行重新加载的快照）
    /// - `equipment`: 设备台账
    /// - `inventory`: 库存快照
    /// - `now`: 排程时间
    #[instrument(skip_all, fields(
        analyses_count = analyses.len(),
        technicians_count = technicians.len()
    ))]
    pub fn schedule(
        &self,
        analyses: &[RiskAnalysis],
        technicians: &[Technician],
        equipment: &[Equipment],
        inventory: &[InventoryItem],
        now: DateTime<Utc>,
    ) -> MaintenanceSchedule {
        let equipment_by_id: HashMap<&str, &Equipment> =
            equipment.iter().map(|e| (e.id.as_str(), e)).collect();

        let mut arena = TechnicianArena::load(technicians, self.config.availability_workload_cap);
        let ranked = self.rank(analyses);

        info!(
            ranked_count = ranked.len(),
            pool_size = arena.len(),
            "开始维修排程"
        );

        let mut result = MaintenanceSchedule::default();

        for analysis in ranked {
            let equipment = equipment_by_id.get(analysis.equipment_id.as_str()).copied();

            // a. 生成任务草稿
            let Some(mut task) = self.factory.build_task(analysis, equipment, inventory, now) else {
                continue;
            };

            // b. 池内评分，取最高分
            let Some(slot_index) = self.select_technician(&arena, &task, equipment) else {
                // c. 无可用技术员
                let conflict = format!("No available technician for {}", task.equipment_name);
                warn!(
                    equipment_id = %task.equipment_id,
                    priority = %task.priority,
                    "无可用技术员，任务未排程"
                );
                result.unscheduled_tasks.push(task);
                result.conflicts.push(conflict);
                continue;
            };

            // d. 落位
            let slot = &mut arena.slots[slot_index];
            let delay_days = self.delay_days(slot.technician.current_workload, &task);
            task.assigned_to = Some(slot.technician.id.clone());
            task.status = TaskStatus::Scheduled;
            task.scheduled_date = now + Duration::days(delay_days);

            // e. 回写工作副本负荷
            let previous_workload = slot.technician.current_workload;
            slot.technician.current_workload += self.workload_increment(task.estimated_duration);
            slot.assigned_task_count += 1;
            if slot.technician.current_workload > self.config.availability_workload_cap {
                slot.technician.is_available = false;
            }

            debug!(
                task_id = %task.id,
                equipment_id = %task.equipment_id,
                technician_id = %slot.technician.id,
                delay_days,
                previous_workload,
                new_workload = slot.technician.current_workload,
                is_available = slot.technician.is_available,
                "任务已分配"
            );

            result
                .technician_assignments
                .entry(slot.technician.id.clone())
                .or_default()
                .push(task.clone());
            result.scheduled_tasks.push(task);
        }

        result.workload_updates = arena.into_updates();

        info!(
            scheduled_count = result.scheduled_tasks.len(),
            unscheduled_count = result.unscheduled_tasks.len(),
            conflicts_count = result.conflicts.len(),
            "维修排程完成"
        );

        result
    }

    // ==========================================
    // 排序
    // ==========================================

    /// 过滤 LOW 风险并按紧急程度排序
    ///
    /// 排序键:
    /// 1) critical 在前
    /// 2) predicted_failure_in_days 升序
    /// 同键保持输入顺序（稳定排序）
    pub fn rank<'a>(&self, analyses: &'a [RiskAnalysis]) -> Vec<&'a RiskAnalysis> {
        let mut ranked: Vec<&RiskAnalysis> =
            analyses.iter().filter(|a| a.requires_maintenance()).collect();
        ranked.sort_by_key(|a| (a.risk_level != RiskLevel::Critical, a.predicted_failure_in_days));
        ranked
    }

    // ==========================================
    // 技术员选择
    // ==========================================

    /// 返回最高分技术员在工作副本中的下标
    ///
    /// 并列时取池内先出现者；最高分 <= 0 时返回 None
    fn select_technician(
        &self,
        arena: &TechnicianArena,
        task: &MaintenanceTask,
        equipment: Option<&Equipment>,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (index, slot) in arena.slots.iter().enumerate() {
            let score = self.scorer.score(&slot.technician, task, equipment);
            if !TechnicianScorer::is_usable(score) {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((index, score)),
            }
        }

        best.map(|(index, _)| index)
    }

    // ==========================================
    // 日期与负荷换算
    // ==========================================

    /// 排程延后天数 = max(ceil(负荷 / 步长), 优先级最短延后)
    pub fn delay_days(&self, current_workload: f64, task: &MaintenanceTask) -> i64 {
        let workload_delay = (current_workload.max(0.0) / self.config.workload_delay_step).ceil() as i64;
        workload_delay.max(task.priority.min_delay_days())
    }

    /// 任务工时占一个工作日的百分比
    pub fn workload_increment(&self, estimated_duration: u32) -> f64 {
        (estimated_duration as f64 / self.config.workday_minutes as f64) * 100.0
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for MaintenanceScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
