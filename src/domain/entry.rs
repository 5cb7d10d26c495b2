// ==========================================
// 清洁炉灶安装档案系统 - 安装档案领域模型
// ==========================================
// 职责: 定义安装档案实体与导入中间结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Entry - 安装档案主数据
// ==========================================
// 用途: 导入层写入,引擎层只读
// 对齐: entry 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    // ===== 主键 =====
    pub serial_number: String, // 装置序列号（唯一标识）

    // ===== 受益人信息 =====
    pub name: String,        // 户主姓名
    pub father_name: String, // 父名
    pub cnic: String,        // 身份证号

    // ===== 地理信息 =====
    pub village_name: String, // 村庄名称
    pub uc: String,           // 联合议会（Union Council，导入分组单位）
    pub tehsil: String,       // 县区
    pub location: String,     // 详细位置

    // ===== 时间信息 =====
    pub commissioning_date: NaiveDate, // 投运日期（效益计算锚点）
    pub installation_date: NaiveDate,  // 安装日期（源系统单独保留）

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

impl Entry {
    /// 以投运日期构造一条新档案，其余描述字段由调用方填充
    pub fn new(serial_number: String, commissioning_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            serial_number,
            name: String::new(),
            father_name: String::new(),
            cnic: String::new(),
            village_name: String::new(),
            uc: String::new(),
            tehsil: String::new(),
            location: String::new(),
            commissioning_date,
            installation_date: commissioning_date,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// RawEntryRow - 导入中间结构体
// ==========================================
// 用途: 导入管道中间产物（文件解析 → 清洗 → 此结构）
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntryRow {
    pub serial_number: String,
    pub name: String,
    pub father_name: String,
    pub cnic: String,
    pub village_name: String,
    pub uc: String,
    pub tehsil: String,
    pub location: String,
    pub commissioning_date_raw: Option<String>, // 源表自带投运日期（可选列）

    // 元信息
    pub row_number: usize, // 原始文件行号（从 1 起，不含表头）
}

// ==========================================
// ImportBatch - 导入批次
// ==========================================
// 用途: 记录导入批次元信息
// 对齐: import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,                   // 批次 ID（UUID）
    pub file_name: Option<String>,          // 源文件名
    pub file_path: Option<String>,          // 源文件路径
    pub total_rows: i32,                    // 总行数
    pub imported_rows: i32,                 // 成功导入行数
    pub skipped_rows: i32,                  // 跳过行数（日期解析失败等）
    pub group_count: i32,                   // UC 分组数
    pub elapsed_ms: Option<i32>,            // 导入耗时（毫秒）
    pub imported_at: Option<DateTime<Utc>>, // 导入时间
}

// ==========================================
// UcGroupSummary - UC 分组摘要
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UcGroupSummary {
    pub uc: String,                     // 联合议会名称
    pub commissioning_date: NaiveDate,  // 该组分配的投运日期
    pub entry_count: usize,             // 组内档案数
}

// ==========================================
// EntryImportResult - 导入结果
// ==========================================
// 用途: 导入接口返回值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryImportResult {
    pub batch: ImportBatch,          // 批次信息
    pub groups: Vec<UcGroupSummary>, // UC 分组摘要
}
