// ==========================================
// 清洁炉灶安装档案系统 - 档案查询 API
// ==========================================
// 职责: 按序列号查询档案,合并派生效益后返回响应
// 红线: 派生效益即算即走，不回写档案
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::entry::Entry;
use crate::domain::metrics::DerivedMetrics;
use crate::engine::impact::ImpactEngine;
use crate::repository::EntryRepository;
use chrono::NaiveDate;

// ==========================================
// 展示格式化（仅 API 层；引擎输出保持全精度）
// ==========================================

/// kg → 吨，保留两位小数
fn format_tons(kg: f64) -> String {
    format!("{:.2} tons", kg / 1000.0)
}

// ==========================================
// CalculatedValues - 派生效益展示块
// ==========================================
/// 响应中与档案字段并列的格式化效益值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatedValues {
    pub days_since_commissioning: i64,
    pub wood_saved: String,     // 吨，2 位小数
    pub co2_saved: String,      // 吨，2 位小数
    pub trees_saved: String,    // 2 位小数
    pub area_saved: String,     // 5 位小数
    pub carbon_credits: String, // 2 位小数
}

impl CalculatedValues {
    fn from_metrics(metrics: &DerivedMetrics) -> Self {
        Self {
            days_since_commissioning: metrics.days_elapsed,
            wood_saved: format_tons(metrics.wood_saved_kg),
            co2_saved: format_tons(metrics.co2_saved_kg),
            trees_saved: format!("{:.2}", metrics.trees_saved),
            area_saved: format!("{:.5}", metrics.area_saved_acres),
            carbon_credits: format!("{:.2}", metrics.carbon_credits),
        }
    }
}

// ==========================================
// EntryDetailResponse - 档案详情响应
// ==========================================
/// 档案原始字段 + 格式化效益 + 全精度效益
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDetailResponse {
    pub serial_number: String,
    pub name: String,
    pub father_name: String,
    pub cnic: String,
    pub village_name: String,
    pub uc: String,
    pub tehsil: String,
    pub location: String,
    pub commissioning_date: NaiveDate,
    pub installation_date: NaiveDate,

    pub calculated_values: CalculatedValues,
    pub metrics: DerivedMetrics, // 全精度，供需要原值的调用方使用
}

// ==========================================
// EntryApi - 档案查询 API
// ==========================================

/// 档案API
///
/// 职责：
/// 1. 按序列号查询档案
/// 2. 调用效益引擎派生指标并格式化
pub struct EntryApi {
    entry_repo: Arc<EntryRepository>,
    impact_engine: Arc<ImpactEngine>,
}

impl EntryApi {
    /// 创建新的EntryApi实例
    ///
    /// # 参数
    /// - entry_repo: 档案仓储
    /// - impact_engine: 效益派生引擎
    pub fn new(entry_repo: Arc<EntryRepository>, impact_engine: Arc<ImpactEngine>) -> Self {
        Self {
            entry_repo,
            impact_engine,
        }
    }

    /// 按序列号查询档案（简化版本，评估日期取当天）
    ///
    /// # 参数
    /// - serial_number: 装置序列号
    ///
    /// # 返回
    /// - Ok(EntryDetailResponse): 档案详情 + 派生效益
    /// - Err(ApiError): API错误
    pub fn get_entry(&self, serial_number: &str) -> ApiResult<EntryDetailResponse> {
        let today = chrono::Local::now().date_naive();
        self.get_entry_at(serial_number, today)
    }

    /// 按序列号查询档案（完整参数版本，评估日期显式传入）
    ///
    /// # 参数
    /// - serial_number: 装置序列号
    /// - evaluation_date: 评估日期（测试可注入固定值）
    ///
    /// # 返回
    /// - Ok(EntryDetailResponse): 档案详情 + 派生效益
    /// - Err(ApiError::NotFound): 序列号不存在
    pub fn get_entry_at(
        &self,
        serial_number: &str,
        evaluation_date: NaiveDate,
    ) -> ApiResult<EntryDetailResponse> {
        if serial_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("序列号不能为空".to_string()));
        }

        debug!(
            "查询档案: serial_number={}, evaluation_date={}",
            serial_number, evaluation_date
        );

        let entry = self
            .entry_repo
            .find_by_serial_number(serial_number)?
            .ok_or_else(|| ApiError::NotFound(format!("档案不存在: {}", serial_number)))?;

        Ok(self.build_response(entry, evaluation_date))
    }

    fn build_response(&self, entry: Entry, evaluation_date: NaiveDate) -> EntryDetailResponse {
        let metrics = self
            .impact_engine
            .derive(entry.commissioning_date, evaluation_date);

        EntryDetailResponse {
            serial_number: entry.serial_number,
            name: entry.name,
            father_name: entry.father_name,
            cnic: entry.cnic,
            village_name: entry.village_name,
            uc: entry.uc,
            tehsil: entry.tehsil,
            location: entry.location,
            commissioning_date: entry.commissioning_date,
            installation_date: entry.installation_date,
            calculated_values: CalculatedValues::from_metrics(&metrics),
            metrics,
        }
    }
}
