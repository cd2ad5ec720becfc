// ==========================================
// 设施预测性维护 - 传感器读数 CSV 解析器
// ==========================================
// 列: equipment_id, type, value, min, max, status
// - 表头大小写不敏感，列顺序任意
// - status 列可省略（默认 normal）
// - 输出按设备分组，设备顺序与读数顺序均保持文件顺序
// ==========================================

use crate::domain::sensor::SensorReading;
use crate::domain::types::SensorStatus;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// 按设备分组的读数
pub type ReadingsByEquipment = Vec<(String, Vec<SensorReading>)>;

// ==========================================
// SensorCsvParser
// ==========================================
pub struct SensorCsvParser;

impl SensorCsvParser {
    /// 解析 CSV 文件
    pub fn parse_file(&self, path: &Path) -> ImportResult<ReadingsByEquipment> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        self.parse_reader(file)
    }

    /// 从任意输入流解析
    pub fn parse_reader<R: Read>(&self, input: R) -> ImportResult<ReadingsByEquipment> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let columns = ColumnIndex::resolve(&headers)?;

        let mut grouped: ReadingsByEquipment = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // 表头为第 1 行
            let row = idx + 2;

            if record.iter().all(|v| v.is_empty()) {
                continue;
            }

            let (equipment_id, reading) = columns.read_row(&record, row)?;
            match positions.get(&equipment_id) {
                Some(&pos) => grouped[pos].1.push(reading),
                None => {
                    positions.insert(equipment_id.clone(), grouped.len());
                    grouped.push((equipment_id, vec![reading]));
                }
            }
        }

        debug!(equipment_count = grouped.len(), "传感器读数解析完成");
        Ok(grouped)
    }
}

// ==========================================
// ColumnIndex - 表头 → 列下标
// ==========================================
struct ColumnIndex {
    equipment_id: usize,
    reading_type: usize,
    value: usize,
    min: usize,
    max: usize,
    status: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> ImportResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| ImportError::MissingColumn(name.to_string()));

        Ok(Self {
            equipment_id: require("equipment_id")?,
            reading_type: require("type")?,
            value: require("value")?,
            min: require("min")?,
            max: require("max")?,
            status: find("status"),
        })
    }

    fn read_row(&self, record: &StringRecord, row: usize) -> ImportResult<(String, SensorReading)> {
        let equipment_id = record.get(self.equipment_id).unwrap_or("").to_string();
        if equipment_id.is_empty() {
            return Err(ImportError::PrimaryKeyMissing(row));
        }

        let reading_type = record.get(self.reading_type).unwrap_or("");
        let value = parse_number(record, self.value, "value", row)?;
        let min = parse_number(record, self.min, "min", row)?;
        let max = parse_number(record, self.max, "max", row)?;

        let status = match self.status.and_then(|i| record.get(i)).filter(|s| !s.is_empty()) {
            Some(raw) => SensorStatus::from_db_str(raw).ok_or_else(|| ImportError::TypeConversionError {
                row,
                field: "status".to_string(),
                message: format!("无法识别的状态: {}", raw),
            })?,
            None => SensorStatus::Normal,
        };

        Ok((
            equipment_id,
            SensorReading::new(reading_type, value, min, max, status),
        ))
    }
}

fn parse_number(record: &StringRecord, idx: usize, field: &str, row: usize) -> ImportResult<f64> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .map_err(|e| ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("{} ({})", e, raw),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_equipment_in_file_order() {
        let data = "\
equipment_id,type,value,min,max,status
EQ-2,temperature,95,20,80,warning
EQ-1,vibration,3.1,0,5,normal
EQ-2,pressure,40,30,60,normal
";
        let grouped = SensorCsvParser.parse_reader(data.as_bytes()).unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "EQ-2");
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[0].1[1].reading_type, "pressure");
        assert_eq!(grouped[1].0, "EQ-1");
        assert_eq!(grouped[0].1[0].status, SensorStatus::Warning);
    }

    #[test]
    fn test_status_column_optional() {
        let data = "Equipment_ID,Type,Value,Min,Max\nEQ-1,temperature,50,20,80\n";
        let grouped = SensorCsvParser.parse_reader(data.as_bytes()).unwrap();
        assert_eq!(grouped[0].1[0].status, SensorStatus::Normal);
    }

    #[test]
    fn test_missing_column() {
        let data = "equipment_id,type,value,min\nEQ-1,temperature,50,20\n";
        let err = SensorCsvParser.parse_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(ref c) if c == "max"));
    }

    #[test]
    fn test_invalid_number_reports_row() {
        let data = "equipment_id,type,value,min,max\nEQ-1,temperature,50,20,80\nEQ-1,temperature,hot,20,80\n";
        let err = SensorCsvParser.parse_reader(data.as_bytes()).unwrap_err();
        match err {
            ImportError::TypeConversionError { row, field, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, "value");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_blank_equipment_id() {
        let data = "equipment_id,type,value,min,max\n,temperature,50,20,80\n";
        let err = SensorCsvParser.parse_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::PrimaryKeyMissing(2)));
    }
}
