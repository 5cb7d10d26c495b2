// ==========================================
// 清洁炉灶安装档案系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 安装档案登记 + 环保效益即时派生
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与值对象
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 效益派生与汇总
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/schema 自举统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{DerivedMetrics, Entry, EntryImportResult, ImpactStatistics, ImportBatch};

// 引擎
pub use engine::{ImpactEngine, ImpactFactors, StatisticsEngine};

// API
pub use api::{EntryApi, StatisticsApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "清洁炉灶安装档案系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
