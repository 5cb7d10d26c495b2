// ==========================================
// 清洁炉灶安装档案系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 投运日期无法解析为有效日历日期
    #[error("投运日期无法解析: {value}")]
    InvalidDate { value: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
