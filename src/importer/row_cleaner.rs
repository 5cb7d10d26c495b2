// ==========================================
// 清洁炉灶安装档案系统 - 行清洗器实现
// ==========================================
// 职责: 表头别名解析 / TRIM / 缺失值默认 / 序列号兜底
// ==========================================

use crate::domain::entry::RawEntryRow;
use std::collections::HashMap;

// 表头别名（源表列名不统一，按先后顺序取第一个非空命中）
const SERIAL_ALIASES: &[&str] = &["Sr.", "Serial Number", "Serial"];
const NAME_ALIASES: &[&str] = &["Name"];
const FATHER_NAME_ALIASES: &[&str] = &["Father Name"];
const CNIC_ALIASES: &[&str] = &["CNIC"];
const VILLAGE_ALIASES: &[&str] = &["Village Name"];
const UC_ALIASES: &[&str] = &["UC", "uc"];
const TEHSIL_ALIASES: &[&str] = &["Tehsil"];
const LOCATION_ALIASES: &[&str] = &["Location"];
const COMMISSIONING_DATE_ALIASES: &[&str] = &["Commissioning Date", "Date of Commissioning"];

/// 描述字段缺失时的占位值
const MISSING_PLACEHOLDER: &str = "N/A";
/// UC 缺失时的占位值（缺失行归入同一分组）
const UNKNOWN_UC: &str = "Unknown";

pub struct RowCleaner;

impl RowCleaner {
    pub fn new() -> Self {
        Self
    }

    /// 按别名表取值（TRIM 后非空才算命中）
    fn field(&self, row: &HashMap<String, String>, aliases: &[&str]) -> Option<String> {
        for alias in aliases {
            if let Some(value) = row.get(*alias) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 取描述字段，缺失时回落占位值
    fn field_or(&self, row: &HashMap<String, String>, aliases: &[&str], default: &str) -> String {
        self.field(row, aliases)
            .unwrap_or_else(|| default.to_string())
    }

    /// 清洗单行为导入中间结构
    ///
    /// # 参数
    /// - row: 表头 → 值映射（解析层输出）
    /// - row_number: 原始文件行号（从 1 起，不含表头）
    ///
    /// # 兜底规则
    /// - 序列号缺失 → `AUTO_{row_number}`
    /// - 描述字段缺失 → "N/A"，UC 缺失 → "Unknown"
    pub fn clean_row(&self, row: &HashMap<String, String>, row_number: usize) -> RawEntryRow {
        let serial_number = self
            .field(row, SERIAL_ALIASES)
            .unwrap_or_else(|| format!("AUTO_{}", row_number));

        RawEntryRow {
            serial_number,
            name: self.field_or(row, NAME_ALIASES, MISSING_PLACEHOLDER),
            father_name: self.field_or(row, FATHER_NAME_ALIASES, MISSING_PLACEHOLDER),
            cnic: self.field_or(row, CNIC_ALIASES, MISSING_PLACEHOLDER),
            village_name: self.field_or(row, VILLAGE_ALIASES, MISSING_PLACEHOLDER),
            uc: self.field_or(row, UC_ALIASES, UNKNOWN_UC),
            tehsil: self.field_or(row, TEHSIL_ALIASES, MISSING_PLACEHOLDER),
            location: self.field_or(row, LOCATION_ALIASES, MISSING_PLACEHOLDER),
            commissioning_date_raw: self.field(row, COMMISSIONING_DATE_ALIASES),
            row_number,
        }
    }
}

impl Default for RowCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_clean_row_full() {
        let cleaner = RowCleaner::new();
        let raw = cleaner.clean_row(
            &row(&[
                ("Sr.", " 12 "),
                ("Name", "Ali Khan"),
                ("Father Name", "Karim Khan"),
                ("CNIC", "12345-6789012-3"),
                ("Village Name", "Basti Noor"),
                ("UC", "UC-4"),
                ("Tehsil", "Liaquatpur"),
                ("Location", "Near school"),
            ]),
            1,
        );

        assert_eq!(raw.serial_number, "12");
        assert_eq!(raw.name, "Ali Khan");
        assert_eq!(raw.uc, "UC-4");
        assert_eq!(raw.commissioning_date_raw, None);
    }

    #[test]
    fn test_clean_row_serial_fallback() {
        let cleaner = RowCleaner::new();
        let raw = cleaner.clean_row(&row(&[("Name", "Ali Khan")]), 7);
        assert_eq!(raw.serial_number, "AUTO_7");
    }

    #[test]
    fn test_clean_row_serial_alias() {
        let cleaner = RowCleaner::new();
        let raw = cleaner.clean_row(&row(&[("Serial Number", "SN-9")]), 1);
        assert_eq!(raw.serial_number, "SN-9");
    }

    #[test]
    fn test_clean_row_defaults() {
        let cleaner = RowCleaner::new();
        let raw = cleaner.clean_row(&row(&[("Sr.", "1")]), 1);

        assert_eq!(raw.name, "N/A");
        assert_eq!(raw.uc, "Unknown");
        assert_eq!(raw.tehsil, "N/A");
    }

    #[test]
    fn test_clean_row_uc_lowercase_alias() {
        let cleaner = RowCleaner::new();
        let raw = cleaner.clean_row(&row(&[("Sr.", "1"), ("uc", "UC-9")]), 1);
        assert_eq!(raw.uc, "UC-9");
    }

    #[test]
    fn test_clean_row_picks_up_date_column() {
        let cleaner = RowCleaner::new();
        let raw = cleaner.clean_row(
            &row(&[("Sr.", "1"), ("Commissioning Date", "2025-06-25")]),
            1,
        );
        assert_eq!(
            raw.commissioning_date_raw,
            Some("2025-06-25".to_string())
        );
    }
}
