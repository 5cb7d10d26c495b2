// ==========================================
// 清洁炉灶安装档案系统 - 主入口
// ==========================================
// 技术栈: Rust + SQLite
// 运行方式: 无界面状态巡检（初始化 + 打印全量汇总统计）
// ==========================================

use entry_registry::app::{get_default_db_path, AppState};

fn main() {
    // 初始化日志系统
    entry_registry::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", entry_registry::APP_NAME);
    tracing::info!("系统版本: {}", entry_registry::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    tracing::info!("正在初始化AppState...");
    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("AppState初始化成功");

    // 打印全量汇总统计（评估日期 = 当天）
    match app_state.statistics_api.get_statistics() {
        Ok(stats) => {
            tracing::info!("档案总数: {}", stats.total_entries);
            tracing::info!(
                "平均投运天数: {}",
                stats.average_days_since_commissioning
            );
            tracing::info!("节约木柴合计: {}", stats.total_wood_saved);
            tracing::info!("减排CO2合计: {}", stats.total_co2_saved);
            tracing::info!("挽救树木合计: {}", stats.total_trees_saved);
            tracing::info!("保护林地合计: {} acres", stats.total_area_saved);
            tracing::info!("碳信用额合计: {}", stats.total_carbon_credits);

            // 完整响应输出到 stdout，便于脚本消费
            match serde_json::to_string_pretty(&stats) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::warn!("统计响应序列化失败: {}", e),
            }
        }
        Err(e) => {
            tracing::error!("汇总统计查询失败: {}", e);
            std::process::exit(1);
        }
    }
}
