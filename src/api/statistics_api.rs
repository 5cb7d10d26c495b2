// ==========================================
// 清洁炉灶安装档案系统 - 汇总统计 API
// ==========================================
// 职责: 全量档案的效益汇总查询
// 红线: 逐条现算后折叠，不读任何缓存列
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::error::ApiResult;
use crate::domain::metrics::ImpactStatistics;
use crate::engine::statistics::StatisticsEngine;
use crate::repository::EntryRepository;
use chrono::NaiveDate;

// ==========================================
// StatisticsResponse - 汇总统计响应
// ==========================================
/// 格式化汇总 + 全精度汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub total_entries: usize,
    pub average_days_since_commissioning: String, // 1 位小数
    pub total_wood_saved: String,                 // 吨，2 位小数
    pub total_co2_saved: String,                  // 吨，2 位小数
    pub total_trees_saved: String,                // 2 位小数
    pub total_area_saved: String,                 // 5 位小数
    pub total_carbon_credits: String,             // 2 位小数

    pub statistics: ImpactStatistics, // 全精度，供需要原值的调用方使用
}

impl StatisticsResponse {
    fn from_statistics(stats: ImpactStatistics) -> Self {
        Self {
            total_entries: stats.total_entries,
            average_days_since_commissioning: format!("{:.1}", stats.average_days_elapsed),
            total_wood_saved: format!("{:.2} tons", stats.total_wood_saved_kg / 1000.0),
            total_co2_saved: format!("{:.2} tons", stats.total_co2_saved_kg / 1000.0),
            total_trees_saved: format!("{:.2}", stats.total_trees_saved),
            total_area_saved: format!("{:.5}", stats.total_area_saved_acres),
            total_carbon_credits: format!("{:.2}", stats.total_carbon_credits),
            statistics: stats,
        }
    }
}

// ==========================================
// StatisticsApi - 汇总统计 API
// ==========================================

/// 汇总统计API
///
/// 职责：
/// 1. 拉取全部档案
/// 2. 调用统计引擎折叠派生效益
pub struct StatisticsApi {
    entry_repo: Arc<EntryRepository>,
    statistics_engine: Arc<StatisticsEngine>,
}

impl StatisticsApi {
    /// 创建新的StatisticsApi实例
    ///
    /// # 参数
    /// - entry_repo: 档案仓储
    /// - statistics_engine: 汇总统计引擎
    pub fn new(entry_repo: Arc<EntryRepository>, statistics_engine: Arc<StatisticsEngine>) -> Self {
        Self {
            entry_repo,
            statistics_engine,
        }
    }

    /// 查询全量汇总统计（简化版本，评估日期取当天）
    pub fn get_statistics(&self) -> ApiResult<StatisticsResponse> {
        let today = chrono::Local::now().date_naive();
        self.get_statistics_at(today)
    }

    /// 查询全量汇总统计（完整参数版本，评估日期显式传入）
    ///
    /// # 参数
    /// - evaluation_date: 评估日期（测试可注入固定值）
    ///
    /// # 返回
    /// 汇总统计响应；空档案表返回全零统计（不报错）
    pub fn get_statistics_at(&self, evaluation_date: NaiveDate) -> ApiResult<StatisticsResponse> {
        let entries = self.entry_repo.find_all()?;

        debug!(
            "汇总统计: entries={}, evaluation_date={}",
            entries.len(),
            evaluation_date
        );

        let stats = self.statistics_engine.summarize(&entries, evaluation_date);
        Ok(StatisticsResponse::from_statistics(stats))
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_statistics_formatting() {
        let response = StatisticsResponse::from_statistics(ImpactStatistics::empty());

        assert_eq!(response.total_entries, 0);
        assert_eq!(response.average_days_since_commissioning, "0.0");
        assert_eq!(response.total_wood_saved, "0.00 tons");
        assert_eq!(response.total_carbon_credits, "0.00");
    }

    #[test]
    fn test_statistics_formatting() {
        let stats = ImpactStatistics {
            total_entries: 2,
            average_days_elapsed: 15.0,
            total_wood_saved_kg: 450.0,
            total_co2_saved_kg: 742.5,
            total_trees_saved: 0.9,
            total_area_saved_acres: 0.0018,
            total_carbon_credits: 0.7425,
        };

        let response = StatisticsResponse::from_statistics(stats);

        assert_eq!(response.average_days_since_commissioning, "15.0");
        assert_eq!(response.total_wood_saved, "0.45 tons");
        assert_eq!(response.total_co2_saved, "0.74 tons");
        assert_eq!(response.total_trees_saved, "0.90");
        assert_eq!(response.total_area_saved, "0.00180");
        assert_eq!(response.total_carbon_credits, "0.74");
    }
}
