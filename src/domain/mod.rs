// ==========================================
// 清洁炉灶安装档案系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod entry;
pub mod metrics;

// 重导出核心类型
pub use entry::{Entry, EntryImportResult, ImportBatch, RawEntryRow, UcGroupSummary};
pub use metrics::{DerivedMetrics, ImpactStatistics};
