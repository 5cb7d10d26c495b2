// ==========================================
// 清洁炉灶安装档案系统 - 安装档案数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::domain::entry::{Entry, ImportBatch};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// EntryRepository - 安装档案仓储
// ==========================================

/// 安装档案仓储
/// 职责: 管理 entry / import_batch 表的 CRUD 操作
pub struct EntryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EntryRepository {
    /// 创建新的档案仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(EntryRepository): 仓储实例
    /// - Err: 数据库连接错误
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 行 → Entry 映射
    fn map_entry_row(row: &Row) -> SqliteResult<Entry> {
        Ok(Entry {
            serial_number: row.get(0)?,
            name: row.get(1)?,
            father_name: row.get(2)?,
            cnic: row.get(3)?,
            village_name: row.get(4)?,
            uc: row.get(5)?,
            tehsil: row.get(6)?,
            location: row.get(7)?,
            commissioning_date: NaiveDate::parse_from_str(&row.get::<_, String>(8)?, "%Y-%m-%d")
                .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            installation_date: NaiveDate::parse_from_str(&row.get::<_, String>(9)?, "%Y-%m-%d")
                .unwrap_or_else(|_| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
            created_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(10)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(11)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        })
    }

    const ENTRY_COLUMNS: &'static str = r#"
            serial_number, name, father_name, cnic, village_name, uc, tehsil,
            location, commissioning_date, installation_date, created_at, updated_at
    "#;

    // ==========================================
    // 查询接口
    // ==========================================

    /// 按序列号查询单条档案
    ///
    /// # 返回
    /// - Ok(Some(Entry)): 找到档案
    /// - Ok(None): 未找到
    /// - Err: 数据库错误
    pub fn find_by_serial_number(&self, serial_number: &str) -> RepositoryResult<Option<Entry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM entry WHERE serial_number = ?1",
            Self::ENTRY_COLUMNS
        ))?;

        let entry = stmt
            .query_row(params![serial_number], Self::map_entry_row)
            .optional()?;

        Ok(entry)
    }

    /// 查询全部档案（序列号稳定排序，供汇总统计折叠）
    pub fn find_all(&self) -> RepositoryResult<Vec<Entry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM entry ORDER BY serial_number",
            Self::ENTRY_COLUMNS
        ))?;

        let entries = stmt
            .query_map([], Self::map_entry_row)?
            .collect::<SqliteResult<Vec<Entry>>>()?;

        Ok(entries)
    }

    /// 档案总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entry", [], |row| row.get(0))?;
        Ok(count)
    }

    // ==========================================
    // 写入接口
    // ==========================================

    /// 批量插入档案（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    /// - Err: 数据库错误（事务回滚）
    pub fn insert_batch(&self, entries: &[Entry]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&format!(
                r#"
                INSERT INTO entry ({})
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                "#,
                Self::ENTRY_COLUMNS
            ))?;

            for entry in entries {
                inserted += stmt.execute(params![
                    entry.serial_number,
                    entry.name,
                    entry.father_name,
                    entry.cnic,
                    entry.village_name,
                    entry.uc,
                    entry.tehsil,
                    entry.location,
                    entry.commissioning_date.format("%Y-%m-%d").to_string(),
                    entry.installation_date.format("%Y-%m-%d").to_string(),
                    entry.created_at.to_rfc3339(),
                    entry.updated_at.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(inserted)
    }

    /// 清空全部档案（导入流程整表替换）
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM entry", [])?;
        Ok(deleted)
    }

    // ==========================================
    // 导入批次审计
    // ==========================================

    /// 写入导入批次审计记录
    pub fn insert_import_batch(&self, batch: &ImportBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, file_name, file_path, total_rows, imported_rows,
                skipped_rows, group_count, elapsed_ms, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                batch.batch_id,
                batch.file_name,
                batch.file_path,
                batch.total_rows,
                batch.imported_rows,
                batch.skipped_rows,
                batch.group_count,
                batch.elapsed_ms,
                batch.imported_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        Ok(())
    }

    /// 查询最近的导入批次（按导入时间倒序）
    pub fn find_recent_import_batches(&self, limit: i32) -> RepositoryResult<Vec<ImportBatch>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, file_name, file_path, total_rows, imported_rows,
                   skipped_rows, group_count, elapsed_ms, imported_at
            FROM import_batch
            ORDER BY imported_at DESC
            LIMIT ?1
            "#,
        )?;

        let batches = stmt
            .query_map(params![limit], |row| {
                Ok(ImportBatch {
                    batch_id: row.get(0)?,
                    file_name: row.get(1)?,
                    file_path: row.get(2)?,
                    total_rows: row.get(3)?,
                    imported_rows: row.get(4)?,
                    skipped_rows: row.get(5)?,
                    group_count: row.get(6)?,
                    elapsed_ms: row.get(7)?,
                    imported_at: row
                        .get::<_, Option<String>>(8)?
                        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })?
            .collect::<SqliteResult<Vec<ImportBatch>>>()?;

        Ok(batches)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_repo() -> EntryRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        EntryRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn make_entry(serial: &str, uc: &str, commissioning: NaiveDate) -> Entry {
        let mut entry = Entry::new(serial.to_string(), commissioning);
        entry.name = "Test Owner".to_string();
        entry.uc = uc.to_string();
        entry
    }

    #[test]
    fn test_insert_and_find_by_serial() {
        let repo = make_repo();
        let entries = vec![
            make_entry("SN-001", "UC-1", make_date(2025, 6, 21)),
            make_entry("SN-002", "UC-2", make_date(2025, 6, 25)),
        ];

        assert_eq!(repo.insert_batch(&entries).unwrap(), 2);

        let found = repo.find_by_serial_number("SN-001").unwrap().unwrap();
        assert_eq!(found.uc, "UC-1");
        assert_eq!(found.commissioning_date, make_date(2025, 6, 21));

        assert!(repo.find_by_serial_number("SN-999").unwrap().is_none());
    }

    #[test]
    fn test_find_all_ordered() {
        let repo = make_repo();
        let entries = vec![
            make_entry("SN-B", "UC-1", make_date(2025, 6, 21)),
            make_entry("SN-A", "UC-1", make_date(2025, 6, 21)),
        ];
        repo.insert_batch(&entries).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].serial_number, "SN-A");
    }

    #[test]
    fn test_delete_all_and_count() {
        let repo = make_repo();
        repo.insert_batch(&[make_entry("SN-001", "UC-1", make_date(2025, 6, 21))])
            .unwrap();
        assert_eq!(repo.count().unwrap(), 1);

        assert_eq!(repo.delete_all().unwrap(), 1);
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_serial_rejected() {
        let repo = make_repo();
        repo.insert_batch(&[make_entry("SN-001", "UC-1", make_date(2025, 6, 21))])
            .unwrap();

        let result = repo.insert_batch(&[make_entry("SN-001", "UC-2", make_date(2025, 6, 22))]);
        assert!(result.is_err());
    }

    #[test]
    fn test_import_batch_round_trip() {
        let repo = make_repo();
        let batch = ImportBatch {
            batch_id: "batch-001".to_string(),
            file_name: Some("data.xlsx".to_string()),
            file_path: None,
            total_rows: 10,
            imported_rows: 9,
            skipped_rows: 1,
            group_count: 3,
            elapsed_ms: Some(42),
            imported_at: Some(Utc::now()),
        };

        repo.insert_import_batch(&batch).unwrap();

        let batches = repo.find_recent_import_batches(5).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].imported_rows, 9);
        assert_eq!(batches[0].group_count, 3);
    }
}
