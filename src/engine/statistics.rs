// ==========================================
// 清洁炉灶安装档案系统 - 汇总统计引擎
// ==========================================
// 职责: 对全部档案逐条派生效益并线性累加
// 红线: 无状态引擎,空集合返回全零而非报错
// ==========================================

use crate::domain::entry::Entry;
use crate::domain::metrics::ImpactStatistics;
use crate::engine::impact::ImpactEngine;
use chrono::NaiveDate;

// ==========================================
// StatisticsEngine - 汇总统计引擎
// ==========================================
// 按集合自然顺序折叠；不加权、不过滤、不分组
pub struct StatisticsEngine {
    impact: ImpactEngine,
}

impl StatisticsEngine {
    /// 以给定效益引擎创建统计引擎
    pub fn new(impact: ImpactEngine) -> Self {
        Self { impact }
    }

    /// 汇总全部档案的派生效益
    ///
    /// # 参数
    /// - entries: 档案集合（自然顺序折叠）
    /// - evaluation: 评估日期（调用方时钟，测试可注入固定值）
    ///
    /// # 返回
    /// 汇总统计；空集合返回全零（平均天数除零显式守卫）
    pub fn summarize(&self, entries: &[Entry], evaluation: NaiveDate) -> ImpactStatistics {
        if entries.is_empty() {
            return ImpactStatistics::empty();
        }

        let mut total_days: i64 = 0;
        let mut stats = ImpactStatistics::empty();
        stats.total_entries = entries.len();

        for entry in entries {
            let metrics = self.impact.derive(entry.commissioning_date, evaluation);
            total_days += metrics.days_elapsed;
            stats.total_wood_saved_kg += metrics.wood_saved_kg;
            stats.total_co2_saved_kg += metrics.co2_saved_kg;
            stats.total_trees_saved += metrics.trees_saved;
            stats.total_area_saved_acres += metrics.area_saved_acres;
            stats.total_carbon_credits += metrics.carbon_credits;
        }

        stats.average_days_elapsed = total_days as f64 / entries.len() as f64;
        stats
    }
}
