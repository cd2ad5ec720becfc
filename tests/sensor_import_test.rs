// ==========================================
// 传感器读数导入集成测试
// ==========================================
// 场景: CSV 文件 → SensorCsvParser → RiskAnalyzer
// ==========================================

mod helpers;

use helpers::test_data_builder::fixed_now;
use predictive_maintenance::domain::RiskLevel;
use predictive_maintenance::engine::RiskAnalyzer;
use predictive_maintenance::importer::{ImportError, SensorCsvParser};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_file_to_risk_analysis() {
    let file = write_csv(
        "equipment_id,type,value,min,max,status\n\
         GEN-1,temperature,130,20,80,normal\n\
         GEN-1,vibration,12,0,5,normal\n\
         AC-1,temperature,85,20,80,normal\n\
         AC-1,humidity,50,30,60,normal\n\
         \n\
         PUMP-1,pressure,45,30,60,normal\n",
    );

    let grouped = SensorCsvParser.parse_file(file.path()).unwrap();
    assert_eq!(
        grouped.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
        vec!["GEN-1", "AC-1", "PUMP-1"]
    );

    let analyzer = RiskAnalyzer::new();
    let levels: Vec<RiskLevel> = grouped
        .iter()
        .map(|(id, readings)| analyzer.analyze(id, id, readings, fixed_now()).risk_level)
        .collect();

    // 130 > 80 * 1.2 且 12 > 5 * 1.2 → 2 条 critical
    // 85 介于 80 * 1.1 之内 → 不计
    assert_eq!(levels, vec![RiskLevel::Critical, RiskLevel::Low, RiskLevel::Low]);
}

#[test]
fn test_missing_file() {
    let err = SensorCsvParser
        .parse_file(std::path::Path::new("/nonexistent/readings.csv"))
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));
}

#[test]
fn test_unsupported_extension() {
    let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
    let err = SensorCsvParser.parse_file(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
