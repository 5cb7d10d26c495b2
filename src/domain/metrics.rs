// ==========================================
// 清洁炉灶安装档案系统 - 效益指标值对象
// ==========================================
// 职责: 承载引擎输出,不含计算逻辑
// 红线: 按需构造、即用即弃,禁止回写档案
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DerivedMetrics - 单档案派生效益
// ==========================================
// 不变量: (投运日期, 评估日期) 的纯函数输出
/// 单条档案的派生环保效益（全精度，格式化由 API 层负责）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub days_elapsed: i64,      // 投运至评估日的整天数（≥0）
    pub wood_saved_kg: f64,     // 节约木柴（kg）
    pub co2_saved_kg: f64,      // 减排二氧化碳（kg）
    pub trees_saved: f64,       // 挽救树木（棵）
    pub area_saved_acres: f64,  // 保护林地（英亩）
    pub carbon_credits: f64,    // 碳信用额
}

impl DerivedMetrics {
    /// 全零效益（投运日期在未来时使用）
    pub fn zero() -> Self {
        Self {
            days_elapsed: 0,
            wood_saved_kg: 0.0,
            co2_saved_kg: 0.0,
            trees_saved: 0.0,
            area_saved_acres: 0.0,
            carbon_credits: 0.0,
        }
    }
}

// ==========================================
// ImpactStatistics - 全量汇总统计
// ==========================================
/// 全部档案的效益汇总（聚合引擎输出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactStatistics {
    pub total_entries: usize,        // 档案总数
    pub average_days_elapsed: f64,   // 平均投运天数（空集合为 0）
    pub total_wood_saved_kg: f64,    // 节约木柴合计（kg）
    pub total_co2_saved_kg: f64,     // 减排二氧化碳合计（kg）
    pub total_trees_saved: f64,      // 挽救树木合计（棵）
    pub total_area_saved_acres: f64, // 保护林地合计（英亩）
    pub total_carbon_credits: f64,   // 碳信用额合计
}

impl ImpactStatistics {
    /// 空集合统计（全零，显式守卫除零）
    pub fn empty() -> Self {
        Self {
            total_entries: 0,
            average_days_elapsed: 0.0,
            total_wood_saved_kg: 0.0,
            total_co2_saved_kg: 0.0,
            total_trees_saved: 0.0,
            total_area_saved_acres: 0.0,
            total_carbon_credits: 0.0,
        }
    }
}
