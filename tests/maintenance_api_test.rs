// ==========================================
// MaintenanceApi 集成测试
// ==========================================
// 职责: 验证 API 层输入校验、排程落库、指标聚合与状态迁移
// ==========================================

mod helpers;

use chrono::Duration;
use helpers::test_data_builder::{
    analysis, fixed_now, flagged, EquipmentBuilder, TechnicianBuilder,
};
use predictive_maintenance::config::config_keys;
use predictive_maintenance::domain::{
    Criticality, InventoryItem, MaintenanceLog, RiskLevel, SensorReading, SensorStatus, TaskStatus,
};
use predictive_maintenance::repository::TaskFilter;
use predictive_maintenance::ApiError;
use test_helpers::create_test_api;

// ==========================================
// 风险分析
// ==========================================

#[test]
fn test_analyze_equipment_validation() {
    let (_temp_file, _conn, api) = create_test_api();
    let no_readings: Vec<SensorReading> = Vec::new();

    let blank = api.analyze_equipment("  ", Some(no_readings.as_slice()));
    assert!(matches!(blank, Err(ApiError::InvalidInput(_))));

    let missing = api.analyze_equipment("GEN-1", None);
    assert!(matches!(missing, Err(ApiError::InvalidInput(_))));

    // 空列表合法，结果为 LOW
    let empty = api.analyze_equipment("GEN-1", Some(no_readings.as_slice())).unwrap();
    assert_eq!(empty.risk_level, RiskLevel::Low);
    assert_eq!(empty.predicted_failure_in_days, 90);
    assert_eq!(empty.equipment_name, "GEN-1");
}

#[test]
fn test_analyze_equipment_uses_registered_name() {
    let (_temp_file, _conn, api) = create_test_api();
    api.equipment_repo()
        .upsert(&EquipmentBuilder::new("GEN-1").name("Rooftop Generator").build())
        .unwrap();

    let readings = vec![
        flagged("temperature", SensorStatus::Warning),
        flagged("vibration", SensorStatus::Warning),
        flagged("pressure", SensorStatus::Warning),
    ];
    let result = api
        .analyze_equipment_at("GEN-1", Some(readings.as_slice()), fixed_now())
        .unwrap();

    assert_eq!(result.equipment_name, "Rooftop Generator");
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.predicted_failure_in_days, 27);
    assert_eq!(result.last_analysis, fixed_now());
}

// ==========================================
// 排程运行
// ==========================================

#[tokio::test]
async fn test_run_schedule_persists_tasks_and_workload() {
    let (_temp_file, _conn, api) = create_test_api();
    api.equipment_repo()
        .upsert(
            &EquipmentBuilder::new("GEN-1")
                .name("Generator North")
                .criticality(Criticality::Critical)
                .build(),
        )
        .unwrap();
    api.equipment_repo()
        .upsert(
            &EquipmentBuilder::new("GEN-2")
                .name("Generator South")
                .criticality(Criticality::Critical)
                .build(),
        )
        .unwrap();
    api.technician_repo()
        .upsert(&TechnicianBuilder::new("T1").skill("generator").workload(30.0).build())
        .unwrap();
    api.inventory_repo()
        .upsert(&InventoryItem::new("Fuel Filter", 5))
        .unwrap();

    let analyses = vec![
        analysis("GEN-1", "Generator North", RiskLevel::Critical, 3),
        analysis("GEN-2", "Generator South", RiskLevel::Critical, 4),
        analysis("GEN-3", "Generator East", RiskLevel::Low, 90),
    ];
    let now = fixed_now();
    let schedule = api.run_schedule_at(&analyses, now).await.unwrap();

    assert_eq!(schedule.scheduled_tasks.len(), 1);
    assert_eq!(schedule.unscheduled_tasks.len(), 1);
    assert_eq!(
        schedule.conflicts,
        vec!["No available technician for Generator South".to_string()]
    );
    assert_eq!(schedule.scheduled_tasks[0].required_parts, vec!["Fuel Filter".to_string()]);

    // 任务全部落库
    let stored = api.task_repo().find_by_filter(&TaskFilter::default()).unwrap();
    assert_eq!(stored.len(), 2);
    let pending = api
        .task_repo()
        .find_by_filter(&TaskFilter {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].equipment_id, "GEN-2");

    // 负荷差异已回写
    let t1 = api.technician_repo().find_by_id("T1").unwrap().unwrap();
    assert!((t1.current_workload - 92.5).abs() < 1e-9);
    assert!(!t1.is_available);

    // 第二次运行时技术员已不可用
    let again = api
        .run_schedule_at(&[analysis("GEN-1", "Generator North", RiskLevel::High, 10)], now)
        .await
        .unwrap();
    assert!(again.scheduled_tasks.is_empty());
    assert_eq!(again.unscheduled_tasks.len(), 1);
}

#[tokio::test]
async fn test_run_schedule_reads_workload_cap_from_config() {
    let (_temp_file, _conn, api) = create_test_api();
    api.config()
        .set_global_config_value(config_keys::AVAILABILITY_WORKLOAD_CAP, "20")
        .unwrap();
    api.technician_repo()
        .upsert(&TechnicianBuilder::new("T1").workload(25.0).build())
        .unwrap();

    let schedule = api
        .run_schedule_at(&[analysis("P1", "Pump 1", RiskLevel::High, 10)], fixed_now())
        .await
        .unwrap();

    assert!(schedule.scheduled_tasks.is_empty());
    assert_eq!(schedule.conflicts.len(), 1);
}

#[tokio::test]
async fn test_run_schedule_rolls_back_tasks_when_workload_write_fails() {
    let (_temp_file, conn, api) = create_test_api();
    api.technician_repo()
        .upsert(&TechnicianBuilder::new("T1").skill("generator").build())
        .unwrap();
    // 技术员表拒绝更新，模拟负荷回写失败
    conn.lock()
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER reject_workload BEFORE UPDATE ON technician
             BEGIN SELECT RAISE(ABORT, 'technician locked'); END;",
        )
        .unwrap();

    let result = api
        .run_schedule_at(
            &[analysis("GEN-1", "Generator North", RiskLevel::Critical, 3)],
            fixed_now(),
        )
        .await;
    assert!(result.is_err());

    // 任务与负荷同时回滚
    let stored = api.task_repo().find_by_filter(&TaskFilter::default()).unwrap();
    assert!(stored.is_empty());
    let t1 = api.technician_repo().find_by_id("T1").unwrap().unwrap();
    assert_eq!(t1.current_workload, 0.0);
    assert!(t1.is_available);
}

#[tokio::test]
async fn test_concurrent_runs_book_technician_once() {
    let (_temp_file, _conn, api) = create_test_api();
    for id in ["GEN-1", "GEN-2"] {
        api.equipment_repo()
            .upsert(
                &EquipmentBuilder::new(id)
                    .criticality(Criticality::Critical)
                    .build(),
            )
            .unwrap();
    }
    // 30 + 62.5 > 80: 一个 critical 任务即占满
    api.technician_repo()
        .upsert(&TechnicianBuilder::new("T1").workload(30.0).build())
        .unwrap();

    let now = fixed_now();
    let first = [analysis("GEN-1", "Generator North", RiskLevel::Critical, 3)];
    let second = [analysis("GEN-2", "Generator South", RiskLevel::Critical, 4)];
    let (a, b) = tokio::join!(
        api.run_schedule_at(&first, now),
        api.run_schedule_at(&second, now)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.scheduled_tasks.len() + b.scheduled_tasks.len(), 1);
    assert_eq!(a.unscheduled_tasks.len() + b.unscheduled_tasks.len(), 1);

    let booked = api
        .task_repo()
        .find_by_filter(&TaskFilter {
            assigned_to: Some("T1".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(booked.len(), 1);

    // 落库负荷 = 初始负荷 + 已分配任务的工时占比之和
    let contribution: f64 = booked
        .iter()
        .map(|t| t.estimated_duration as f64 / 480.0 * 100.0)
        .sum();
    let t1 = api.technician_repo().find_by_id("T1").unwrap().unwrap();
    assert!((t1.current_workload - (30.0 + contribution)).abs() < 1e-9);
    assert!((t1.current_workload - 92.5).abs() < 1e-9);
    assert!(!t1.is_available);
}

// ==========================================
// 指标聚合
// ==========================================

#[tokio::test]
async fn test_aggregate_window() {
    let (_temp_file, _conn, api) = create_test_api();
    api.technician_repo()
        .upsert(&TechnicianBuilder::new("T1").build())
        .unwrap();

    let now = fixed_now();
    let schedule = api
        .run_schedule_at(
            &[
                analysis("GEN-1", "Generator North", RiskLevel::Critical, 3),
                analysis("P1", "Pump 1", RiskLevel::High, 20),
            ],
            now,
        )
        .await
        .unwrap();
    assert_eq!(schedule.scheduled_tasks.len(), 2);

    // 完成 critical 任务，实际工时 = 估算工时的 2 倍
    let critical_task = &schedule.scheduled_tasks[0];
    api.update_task_status(&critical_task.id, TaskStatus::InProgress).unwrap();
    api.update_task_status(&critical_task.id, TaskStatus::Completed).unwrap();
    api.record_maintenance_log(&MaintenanceLog {
        id: "L-1".to_string(),
        task_id: critical_task.id.clone(),
        equipment_id: critical_task.equipment_id.clone(),
        technician_id: critical_task.assigned_to.clone(),
        actual_duration: Some(critical_task.estimated_duration * 2),
        completed_at: now + Duration::hours(6),
        notes: None,
    })
    .unwrap();

    let window_start = now - Duration::days(1);
    let window_end = now + Duration::days(30);
    let report = api.aggregate(window_start, window_end).await.unwrap();

    assert_eq!(report.counts.total, 2);
    assert_eq!(report.counts.by_status[&TaskStatus::Completed], 1);
    assert_eq!(report.counts.by_status[&TaskStatus::Scheduled], 1);
    assert_eq!(report.insights.critical_risk_equipment, 1);
    assert_eq!(report.insights.high_risk_equipment, 1);
    assert_eq!(report.insights.imminent_failures, 1);
    assert!((report.insights.efficiency - 50.0).abs() < 1e-9);
    assert_eq!(report.recommendations.len(), 3);

    // 同一窗口重复聚合结果一致
    let again = api.aggregate(window_start, window_end).await.unwrap();
    assert_eq!(report, again);
}

#[tokio::test]
async fn test_aggregate_rejects_inverted_window() {
    let (_temp_file, _conn, api) = create_test_api();
    let now = fixed_now();
    let result = api.aggregate(now, now - Duration::days(1)).await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_aggregate_empty_store_reports_normal_status() {
    let (_temp_file, _conn, api) = create_test_api();
    let now = fixed_now();
    let report = api.aggregate(now, now + Duration::days(7)).await.unwrap();

    assert_eq!(report.counts.total, 0);
    assert!((report.insights.efficiency - 100.0).abs() < 1e-9);
    assert_eq!(report.recommendations.len(), 1);
}

// ==========================================
// 状态迁移 / 完工记录
// ==========================================

#[tokio::test]
async fn test_update_task_status_rejects_invalid_transition() {
    let (_temp_file, _conn, api) = create_test_api();
    let schedule = api
        .run_schedule_at(&[analysis("P1", "Pump 1", RiskLevel::Medium, 45)], fixed_now())
        .await
        .unwrap();
    // 空技术员池: 任务保持 pending
    let task = &schedule.unscheduled_tasks[0];

    let err = api.update_task_status(&task.id, TaskStatus::Completed).unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    let updated = api.update_task_status(&task.id, TaskStatus::Scheduled).unwrap();
    assert_eq!(updated.status, TaskStatus::Scheduled);

    let missing = api.update_task_status("unknown", TaskStatus::Scheduled).unwrap_err();
    assert!(matches!(missing, ApiError::NotFound(_)));
}

#[test]
fn test_record_log_for_unknown_task() {
    let (_temp_file, _conn, api) = create_test_api();
    let err = api
        .record_maintenance_log(&MaintenanceLog {
            id: "L-1".to_string(),
            task_id: "missing".to_string(),
            equipment_id: "P1".to_string(),
            technician_id: None,
            actual_duration: Some(60),
            completed_at: fixed_now(),
            notes: None,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
