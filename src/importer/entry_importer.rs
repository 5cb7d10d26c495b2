// ==========================================
// 清洁炉灶安装档案系统 - 档案导入器
// ==========================================
// 职责: 文件解析 → 行清洗 → UC 分组 → 投运日期分配 → 整表替换入库
// 管道: 整表替换（与源系统一致），批次审计单独落 import_batch 表
// ==========================================

use crate::config::ConfigManager;
use crate::domain::entry::{Entry, EntryImportResult, ImportBatch, RawEntryRow, UcGroupSummary};
use crate::engine::elapsed::parse_commissioning_date;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use crate::importer::row_cleaner::RowCleaner;
use crate::repository::EntryRepository;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

// ==========================================
// EntryImporter - 导入接口
// ==========================================
#[async_trait]
pub trait EntryImporter {
    /// 从文件导入档案（整表替换）
    async fn import_from_file(&self, file_path: &Path) -> ImportResult<EntryImportResult>;
}

// ==========================================
// EntryImporterImpl - 导入器实现
// ==========================================
pub struct EntryImporterImpl {
    entry_repo: Arc<EntryRepository>,
    config: Arc<ConfigManager>,
    file_parser: Box<dyn FileParser + Send + Sync>,
    row_cleaner: RowCleaner,
}

impl EntryImporterImpl {
    /// 创建新的导入器实例
    pub fn new(entry_repo: Arc<EntryRepository>, config: Arc<ConfigManager>) -> Self {
        Self {
            entry_repo,
            config,
            file_parser: Box::new(UniversalFileParser),
            row_cleaner: RowCleaner::new(),
        }
    }

    /// 替换文件解析器（测试注入用）
    pub fn with_file_parser(mut self, parser: Box<dyn FileParser + Send + Sync>) -> Self {
        self.file_parser = parser;
        self
    }

    /// 按 UC 名称在种子窗口内确定分组投运日期
    ///
    /// 同一 UC 永远落在同一天（稳定哈希），重复导入结果可复现。
    fn group_date_for_uc(uc: &str, window: (NaiveDate, NaiveDate)) -> NaiveDate {
        let (start, end) = window;
        let span_days = (end - start).num_days() + 1; // end 含当日

        let hash = uc
            .bytes()
            .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(b as u64));
        start + Duration::days((hash % span_days as u64) as i64)
    }

    /// 按 UC 分组（保持首次出现顺序，与源表行序对齐）
    fn group_by_uc(rows: Vec<RawEntryRow>) -> Vec<(String, Vec<RawEntryRow>)> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: std::collections::HashMap<String, Vec<RawEntryRow>> =
            std::collections::HashMap::new();

        for row in rows {
            if !groups.contains_key(&row.uc) {
                order.push(row.uc.clone());
            }
            groups.entry(row.uc.clone()).or_default().push(row);
        }

        order
            .into_iter()
            .map(|uc| {
                let rows = groups.remove(&uc).unwrap_or_default();
                (uc, rows)
            })
            .collect()
    }
}

#[async_trait]
impl EntryImporter for EntryImporterImpl {
    async fn import_from_file(&self, file_path: &Path) -> ImportResult<EntryImportResult> {
        let started = Instant::now();

        tracing::info!("开始导入档案: {}", file_path.display());

        // 阶段 1: 文件解析
        let raw_rows = self.file_parser.parse_rows(file_path)?;
        if raw_rows.is_empty() {
            return Err(ImportError::EmptyFile(file_path.display().to_string()));
        }
        let total_rows = raw_rows.len();
        tracing::info!("解析完成: {} 行", total_rows);

        // 阶段 2: 行清洗（行号从 1 起，不含表头）
        let cleaned: Vec<RawEntryRow> = raw_rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.row_cleaner.clean_row(row, idx + 1))
            .collect();

        // 阶段 3: UC 分组
        let grouped = Self::group_by_uc(cleaned);
        tracing::info!("分组完成: {} 个 UC 分组", grouped.len());

        // 阶段 4: 投运日期分配 + 实体构造
        let window = self
            .config
            .get_import_window()
            .map_err(|e| ImportError::ConfigReadError {
                key: "import/window_*".to_string(),
                message: e.to_string(),
            })?;

        let mut entries: Vec<Entry> = Vec::new();
        let mut groups: Vec<UcGroupSummary> = Vec::new();
        let mut skipped_rows = 0usize;
        let now = Utc::now();

        for (uc, rows) in grouped {
            let group_date = Self::group_date_for_uc(&uc, window);
            let mut group_count = 0usize;

            for row in rows {
                // 源表自带投运日期的行优先用表内值；解析失败跳过该行（不阻断批次）
                let commissioning_date = match &row.commissioning_date_raw {
                    Some(raw) => match parse_commissioning_date(raw) {
                        Ok(date) => date,
                        Err(_) => {
                            tracing::warn!(
                                "投运日期解析失败，跳过行: row={}, value={}",
                                row.row_number,
                                raw
                            );
                            skipped_rows += 1;
                            continue;
                        }
                    },
                    None => group_date,
                };

                entries.push(Entry {
                    serial_number: row.serial_number,
                    name: row.name,
                    father_name: row.father_name,
                    cnic: row.cnic,
                    village_name: row.village_name,
                    uc: row.uc,
                    tehsil: row.tehsil,
                    location: row.location,
                    commissioning_date,
                    installation_date: commissioning_date,
                    created_at: now,
                    updated_at: now,
                });
                group_count += 1;
            }

            tracing::info!(
                "UC 分组: {} → 投运日期 {} ({} 条)",
                uc,
                group_date,
                group_count
            );
            groups.push(UcGroupSummary {
                uc,
                commissioning_date: group_date,
                entry_count: group_count,
            });
        }

        // 阶段 5: 整表替换入库（与源系统一致：先清空再批量插入）
        let cleared = self.entry_repo.delete_all()?;
        if cleared > 0 {
            tracing::info!("已清空既有档案: {} 条", cleared);
        }
        let imported_rows = self.entry_repo.insert_batch(&entries)?;

        // 阶段 6: 批次审计
        let batch = ImportBatch {
            batch_id: uuid::Uuid::new_v4().to_string(),
            file_name: file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string()),
            file_path: Some(file_path.display().to_string()),
            total_rows: total_rows as i32,
            imported_rows: imported_rows as i32,
            skipped_rows: skipped_rows as i32,
            group_count: groups.len() as i32,
            elapsed_ms: Some(started.elapsed().as_millis() as i32),
            imported_at: Some(now),
        };
        self.entry_repo.insert_import_batch(&batch)?;

        tracing::info!(
            "导入完成: 总行数={}, 成功={}, 跳过={}, 分组={}, 耗时={}ms",
            batch.total_rows,
            batch.imported_rows,
            batch.skipped_rows,
            batch.group_count,
            batch.elapsed_ms.unwrap_or(0)
        );

        Ok(EntryImportResult { batch, groups })
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2025, 6, 21).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        )
    }

    #[test]
    fn test_group_date_stable() {
        let a = EntryImporterImpl::group_date_for_uc("UC-4", window());
        let b = EntryImporterImpl::group_date_for_uc("UC-4", window());
        assert_eq!(a, b);
    }

    #[test]
    fn test_group_date_within_window() {
        let (start, end) = window();
        for uc in ["UC-1", "UC-2", "Unknown", "Basti Noor", ""] {
            let date = EntryImporterImpl::group_date_for_uc(uc, window());
            assert!(date >= start && date <= end, "uc={} date={}", uc, date);
        }
    }

    fn raw_row(serial: &str, uc: &str, row_number: usize) -> RawEntryRow {
        RawEntryRow {
            serial_number: serial.to_string(),
            name: String::new(),
            father_name: String::new(),
            cnic: String::new(),
            village_name: String::new(),
            uc: uc.to_string(),
            tehsil: String::new(),
            location: String::new(),
            commissioning_date_raw: None,
            row_number,
        }
    }

    #[test]
    fn test_group_by_uc_keeps_first_seen_order() {
        let grouped = EntryImporterImpl::group_by_uc(vec![
            raw_row("1", "UC-B", 1),
            raw_row("2", "UC-A", 2),
            raw_row("3", "UC-B", 3),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "UC-B");
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[1].0, "UC-A");
    }
}
