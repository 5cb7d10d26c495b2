// ==========================================
// 档案导入集成测试
// ==========================================
// 测试目标: 验证完整的解析 → 清洗 → 分组 → 入库流程
// ==========================================


use std::fs;
use std::path::PathBuf;

use entry_registry::app::AppState;
use entry_registry::importer::{EntryImporter, ImportError};
use test_helpers::create_test_db;

/// 写入测试 CSV 文件（需要 .csv 扩展名供通用解析器分发）
fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn build_app_state(db_path: &str) -> AppState {
    AppState::new(db_path.to_string()).expect("Failed to init AppState")
}

// ==========================================
// 测试1: 完整导入流程
// ==========================================
#[tokio::test]
async fn test_complete_import_flow() {
    entry_registry::logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let app_state = build_app_state(&db_path);
    let importer = app_state.create_importer();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(
        &dir,
        "entries.csv",
        "Sr.,Name,Father Name,CNIC,Village Name,UC,Tehsil,Location\n\
         1,Ali Khan,Karim Khan,12345-6789012-3,Basti Noor,UC-4,Liaquatpur,Near school\n\
         2,Ahmed Raza,Bashir Raza,12345-6789012-4,Basti Noor,UC-4,Liaquatpur,Main road\n\
         ,Sana Bibi,Rafiq Ahmed,12345-6789012-5,Chak 12,UC-7,Khanpur,Canal side\n",
    );

    let result = importer.import_from_file(&csv_path).await.unwrap();

    // 批次统计
    assert_eq!(result.batch.total_rows, 3);
    assert_eq!(result.batch.imported_rows, 3);
    assert_eq!(result.batch.skipped_rows, 0);
    assert_eq!(result.batch.group_count, 2);

    // 入库档案
    assert_eq!(app_state.entry_repo.count().unwrap(), 3);

    // 序列号兜底（第 3 行缺失）
    let auto = app_state
        .entry_repo
        .find_by_serial_number("AUTO_3")
        .unwrap();
    assert!(auto.is_some());
    assert_eq!(auto.unwrap().uc, "UC-7");

    // 同一 UC 分组共享同一投运日期
    let a = app_state
        .entry_repo
        .find_by_serial_number("1")
        .unwrap()
        .unwrap();
    let b = app_state
        .entry_repo
        .find_by_serial_number("2")
        .unwrap()
        .unwrap();
    assert_eq!(a.commissioning_date, b.commissioning_date);

    // 分组日期落在默认种子窗口内
    let (start, end) = app_state.config_manager.get_import_window().unwrap();
    for group in &result.groups {
        assert!(group.commissioning_date >= start && group.commissioning_date <= end);
    }

    // 批次审计落库
    let batches = app_state.entry_repo.find_recent_import_batches(5).unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].imported_rows, 3);
}

// ==========================================
// 测试2: 重复导入整表替换且结果可复现
// ==========================================
#[tokio::test]
async fn test_reimport_replaces_and_is_reproducible() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let app_state = build_app_state(&db_path);
    let importer = app_state.create_importer();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(
        &dir,
        "entries.csv",
        "Sr.,Name,UC\n1,Ali Khan,UC-4\n2,Ahmed Raza,UC-7\n",
    );

    let first = importer.import_from_file(&csv_path).await.unwrap();
    let first_date = app_state
        .entry_repo
        .find_by_serial_number("1")
        .unwrap()
        .unwrap()
        .commissioning_date;

    let second = importer.import_from_file(&csv_path).await.unwrap();
    let second_date = app_state
        .entry_repo
        .find_by_serial_number("1")
        .unwrap()
        .unwrap()
        .commissioning_date;

    // 整表替换：不累积
    assert_eq!(app_state.entry_repo.count().unwrap(), 2);
    // 稳定分组日期：重复导入结果一致
    assert_eq!(first_date, second_date);
    assert_eq!(first.groups.len(), second.groups.len());

    // 两个批次审计都保留
    let batches = app_state.entry_repo.find_recent_import_batches(10).unwrap();
    assert_eq!(batches.len(), 2);
}

// ==========================================
// 测试3: 表内自带投运日期列优先
// ==========================================
#[tokio::test]
async fn test_explicit_commissioning_date_column_wins() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let app_state = build_app_state(&db_path);
    let importer = app_state.create_importer();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(
        &dir,
        "entries.csv",
        "Sr.,Name,UC,Commissioning Date\n\
         1,Ali Khan,UC-4,2025-03-15\n\
         2,Ahmed Raza,UC-4,\n",
    );

    importer.import_from_file(&csv_path).await.unwrap();

    let explicit = app_state
        .entry_repo
        .find_by_serial_number("1")
        .unwrap()
        .unwrap();
    assert_eq!(
        explicit.commissioning_date,
        test_helpers::make_date(2025, 3, 15)
    );

    // 无日期值的行仍用分组日期（窗口内）
    let (start, end) = app_state.config_manager.get_import_window().unwrap();
    let fallback = app_state
        .entry_repo
        .find_by_serial_number("2")
        .unwrap()
        .unwrap();
    assert!(fallback.commissioning_date >= start && fallback.commissioning_date <= end);
}

// ==========================================
// 测试4: 非法日期行跳过不阻断批次
// ==========================================
#[tokio::test]
async fn test_invalid_date_row_skipped() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let app_state = build_app_state(&db_path);
    let importer = app_state.create_importer();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(
        &dir,
        "entries.csv",
        "Sr.,Name,UC,Commissioning Date\n\
         1,Ali Khan,UC-4,2025-03-15\n\
         2,Ahmed Raza,UC-4,not-a-date\n",
    );

    let result = importer.import_from_file(&csv_path).await.unwrap();

    assert_eq!(result.batch.total_rows, 2);
    assert_eq!(result.batch.imported_rows, 1);
    assert_eq!(result.batch.skipped_rows, 1);
    assert!(app_state
        .entry_repo
        .find_by_serial_number("2")
        .unwrap()
        .is_none());
}

// ==========================================
// 测试5: 文件级错误
// ==========================================
#[tokio::test]
async fn test_missing_file_aborts() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let app_state = build_app_state(&db_path);
    let importer = app_state.create_importer();

    let result = importer
        .import_from_file(std::path::Path::new("no_such_file.csv"))
        .await;
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[tokio::test]
async fn test_header_only_file_aborts() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let app_state = build_app_state(&db_path);
    let importer = app_state.create_importer();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_csv(&dir, "empty.csv", "Sr.,Name,UC\n");

    let result = importer.import_from_file(&csv_path).await;
    assert!(matches!(result, Err(ImportError::EmptyFile(_))));
}
