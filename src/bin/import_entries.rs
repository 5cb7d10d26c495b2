// ==========================================
// 清洁炉灶安装档案系统 - 档案导入工具
// ==========================================
// 用法: import-entries <数据文件.xlsx|.csv> [数据库路径]
// 行为: 整表替换导入 + 打印批次摘要
// ==========================================

use std::path::Path;

use entry_registry::app::{get_default_db_path, AppState};
use entry_registry::importer::EntryImporter;

#[tokio::main]
async fn main() {
    entry_registry::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let file_path = args
        .get(1)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "data.xlsx".to_string());
    let db_path = args
        .get(2)
        .map(|s| s.to_string())
        .unwrap_or_else(get_default_db_path);

    tracing::info!("==================================================");
    tracing::info!("{} - 档案导入工具", entry_registry::APP_NAME);
    tracing::info!("==================================================");
    tracing::info!("数据文件: {}", file_path);
    tracing::info!("数据库: {}", db_path);

    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    let importer = app_state.create_importer();
    let result = match importer.import_from_file(Path::new(&file_path)).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("导入失败: {}", e);
            std::process::exit(1);
        }
    };

    // 批次摘要
    tracing::info!("=== 导入摘要 ===");
    tracing::info!("批次 ID: {}", result.batch.batch_id);
    tracing::info!("总行数: {}", result.batch.total_rows);
    tracing::info!("成功导入: {}", result.batch.imported_rows);
    tracing::info!("跳过行数: {}", result.batch.skipped_rows);
    tracing::info!("UC 分组数: {}", result.batch.group_count);
    for group in &result.groups {
        tracing::info!(
            "- {}: {} ({} 条)",
            group.uc,
            group.commissioning_date,
            group.entry_count
        );
    }
}
