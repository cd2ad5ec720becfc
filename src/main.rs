// ==========================================
// 设施预测性维护 - 命令行入口
// ==========================================
// 用法:
//   predictive-maintenance analyze <readings.csv>
//   predictive-maintenance schedule <analyses.json>
//   predictive-maintenance run <readings.csv>
//   predictive-maintenance aggregate [days]
//
// 数据库路径: PREDICTIVE_MAINTENANCE_DB_PATH，缺省为用户数据目录
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Duration, Utc};
use predictive_maintenance::db::get_default_db_path;
use predictive_maintenance::importer::SensorCsvParser;
use predictive_maintenance::{logging, MaintenanceApi, RiskAnalysis};
use serde::Serialize;
use std::path::Path;

/// aggregate 默认统计窗口（当前时间前后各 N 天）
const DEFAULT_AGGREGATE_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();

    let db_path = get_default_db_path();
    tracing::info!(
        version = predictive_maintenance::VERSION,
        db_path = %db_path,
        command = %command,
        "{}",
        predictive_maintenance::APP_NAME
    );

    let api = MaintenanceApi::open(&db_path)?;

    match command.as_str() {
        "analyze" => {
            let path = args.next().ok_or_else(|| anyhow!("缺少参数: <readings.csv>"))?;
            let analyses = analyze_file(&api, Path::new(&path))?;
            print_json(&analyses)
        }
        "schedule" => {
            let path = args.next().ok_or_else(|| anyhow!("缺少参数: <analyses.json>"))?;
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("读取文件失败: {}", path))?;
            let analyses: Vec<RiskAnalysis> =
                serde_json::from_str(&raw).context("风险分析 JSON 解析失败")?;
            let schedule = api.run_schedule(&analyses).await?;
            print_json(&schedule)
        }
        "run" => {
            let path = args.next().ok_or_else(|| anyhow!("缺少参数: <readings.csv>"))?;
            let analyses = analyze_file(&api, Path::new(&path))?;
            let schedule = api.run_schedule(&analyses).await?;
            print_json(&schedule)
        }
        "aggregate" => {
            let days = match args.next() {
                Some(raw) => raw
                    .parse::<i64>()
                    .with_context(|| format!("天数参数无效: {}", raw))?,
                None => DEFAULT_AGGREGATE_DAYS,
            };
            let now = Utc::now();
            let report = api
                .aggregate(now - Duration::days(days), now + Duration::days(days))
                .await?;
            print_json(&report)
        }
        other => bail!(
            "未知命令: '{}'（可用: analyze <csv> | schedule <json> | run <csv> | aggregate [days]）",
            other
        ),
    }
}

fn analyze_file(api: &MaintenanceApi, path: &Path) -> Result<Vec<RiskAnalysis>> {
    let grouped = SensorCsvParser.parse_file(path)?;
    grouped
        .iter()
        .map(|(equipment_id, readings)| {
            api.analyze_equipment(equipment_id, Some(readings.as_slice()))
                .map_err(Into::into)
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
