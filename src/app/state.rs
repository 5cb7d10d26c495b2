// ==========================================
// 清洁炉灶安装档案系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{EntryApi, StatisticsApi};
use crate::config::ConfigManager;
use crate::engine::{ImpactEngine, StatisticsEngine};
use crate::importer::EntryImporterImpl;
use crate::repository::EntryRepository;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 档案查询API
    pub entry_api: Arc<EntryApi>,

    /// 汇总统计API
    pub statistics_api: Arc<StatisticsApi>,

    /// 档案仓储（导入器等直接数据访问方使用）
    pub entry_repo: Arc<EntryRepository>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库连接并自举 schema（幂等）
    /// 2. 从 config_kv 加载效益换算系数
    /// 3. 初始化 Repository / Engine / API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::init_schema(&conn).map_err(|e| format!("schema 初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层与配置
        // ==========================================
        let entry_repo = Arc::new(EntryRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Engine层（系数在构造期注入）
        // ==========================================
        let factors = config_manager
            .get_impact_factors()
            .map_err(|e| format!("效益系数加载失败: {}", e))?;
        tracing::info!("效益系数加载完成: {:?}", factors);

        let impact_engine = Arc::new(ImpactEngine::with_factors(factors));
        let statistics_engine = Arc::new(StatisticsEngine::new(ImpactEngine::with_factors(
            factors,
        )));

        // ==========================================
        // 初始化API层
        // ==========================================
        let entry_api = Arc::new(EntryApi::new(entry_repo.clone(), impact_engine));
        let statistics_api = Arc::new(StatisticsApi::new(entry_repo.clone(), statistics_engine));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            entry_api,
            statistics_api,
            entry_repo,
            config_manager,
        })
    }

    /// 基于共享仓储与配置构造档案导入器
    pub fn create_importer(&self) -> EntryImporterImpl {
        EntryImporterImpl::new(self.entry_repo.clone(), self.config_manager.clone())
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("ENTRY_REGISTRY_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 使用用户数据目录；拿不到 data_dir 时回退当前目录
    let mut path = PathBuf::from("./entry_registry.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("entry-registry-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("entry-registry");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("entry_registry.db");
    }

    path.to_string_lossy().to_string()
}
