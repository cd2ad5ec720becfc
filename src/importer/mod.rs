// ==========================================
// 设施预测性维护 - 数据导入模块
// ==========================================
// 职责: 将传感器读数文件解析为按设备分组的读数
// ==========================================

pub mod error;
pub mod sensor_csv;

pub use error::{ImportError, ImportResult};
pub use sensor_csv::SensorCsvParser;
