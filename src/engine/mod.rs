// ==========================================
// 清洁炉灶安装档案系统 - 引擎层
// ==========================================
// 职责: 实现效益派生与汇总的业务规则
// 红线: 引擎不拼 SQL,不读系统时钟,纯函数可重复求值
// ==========================================

pub mod elapsed;
pub mod error;
pub mod impact;
pub mod statistics;

// 重导出核心引擎
pub use elapsed::{elapsed_days, parse_commissioning_date};
pub use error::{EngineError, EngineResult};
pub use impact::{ImpactEngine, ImpactFactors};
pub use statistics::StatisticsEngine;
