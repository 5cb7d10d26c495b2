// ==========================================
// 清洁炉灶安装档案系统 - 效益派生引擎
// ==========================================
// 职责: 投运天数 → 五项环保效益的链式派生
// 输入: (投运日期, 评估日期)
// 输出: DerivedMetrics（全精度，格式化归 API 层）
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
// 红线: 引擎不读系统时钟,评估日期由调用方传入
// ==========================================

use crate::domain::metrics::DerivedMetrics;
use crate::engine::elapsed::{elapsed_days, parse_commissioning_date};
use crate::engine::error::EngineResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ImpactFactors - 效益换算系数
// ==========================================
// 业务常数，非测算值；经 config_kv 可覆写（impact/ 前缀）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactFactors {
    pub wood_kg_per_day: f64,   // 每天节约木柴（kg/天）
    pub co2_per_wood_kg: f64,   // 木柴→CO2 换算比
    pub wood_kg_per_tree: f64,  // 每棵树折合木柴（kg/棵）
    pub trees_per_acre: f64,    // 每英亩林地折合树木（棵/英亩）
    pub co2_kg_per_credit: f64, // 每碳信用额折合 CO2（kg/额度）
}

impl Default for ImpactFactors {
    fn default() -> Self {
        Self {
            wood_kg_per_day: 15.0,
            co2_per_wood_kg: 1.65,
            wood_kg_per_tree: 500.0,
            trees_per_acre: 500.0,
            co2_kg_per_credit: 1000.0,
        }
    }
}

// ==========================================
// ImpactEngine - 效益派生引擎
// ==========================================
// 管道（严格顺序，后级依赖前级输出而非天数本身）:
//   天数 → 木柴 → CO2 → 碳信用额
//              ↘ 树木 → 林地
pub struct ImpactEngine {
    factors: ImpactFactors,
}

impl ImpactEngine {
    /// 以默认系数创建引擎
    pub fn new() -> Self {
        Self {
            factors: ImpactFactors::default(),
        }
    }

    /// 以指定系数创建引擎（系数在构造期注入，管道内不出现字面量）
    pub fn with_factors(factors: ImpactFactors) -> Self {
        Self { factors }
    }

    /// 当前生效的换算系数
    pub fn factors(&self) -> &ImpactFactors {
        &self.factors
    }

    // ==========================================
    // 管道分级（每级纯函数，可独立调用）
    // ==========================================

    /// 第一级: 节约木柴（kg）= 天数 × 系数
    pub fn wood_saved_kg(&self, days: i64) -> f64 {
        days as f64 * self.factors.wood_kg_per_day
    }

    /// 第二级: 减排 CO2（kg）= 木柴 × 系数
    pub fn co2_saved_kg(&self, wood_kg: f64) -> f64 {
        wood_kg * self.factors.co2_per_wood_kg
    }

    /// 第三级: 挽救树木（棵）= 木柴 / 系数（由木柴分支）
    pub fn trees_saved(&self, wood_kg: f64) -> f64 {
        wood_kg / self.factors.wood_kg_per_tree
    }

    /// 第四级: 保护林地（英亩）= 树木 / 系数（依赖第三级）
    pub fn area_saved_acres(&self, trees: f64) -> f64 {
        trees / self.factors.trees_per_acre
    }

    /// 第五级: 碳信用额 = CO2 / 系数（由 CO2 分支）
    pub fn carbon_credits(&self, co2_kg: f64) -> f64 {
        co2_kg / self.factors.co2_kg_per_credit
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按天数派生全部效益（链式执行五级管道）
    pub fn derive_for_days(&self, days: i64) -> DerivedMetrics {
        let days = days.max(0);
        let wood_saved_kg = self.wood_saved_kg(days);
        let co2_saved_kg = self.co2_saved_kg(wood_saved_kg);
        let trees_saved = self.trees_saved(wood_saved_kg);
        let area_saved_acres = self.area_saved_acres(trees_saved);
        let carbon_credits = self.carbon_credits(co2_saved_kg);

        DerivedMetrics {
            days_elapsed: days,
            wood_saved_kg,
            co2_saved_kg,
            trees_saved,
            area_saved_acres,
            carbon_credits,
        }
    }

    /// 按 (投运日期, 评估日期) 派生全部效益
    ///
    /// # 参数
    /// - commissioning: 投运日期
    /// - evaluation: 评估日期（调用方时钟，测试可注入固定值）
    pub fn derive(&self, commissioning: NaiveDate, evaluation: NaiveDate) -> DerivedMetrics {
        self.derive_for_days(elapsed_days(commissioning, evaluation))
    }

    /// 按投运日期字符串派生全部效益
    ///
    /// # 返回
    /// - Err(EngineError::InvalidDate): 日期字符串无法解析，直接上抛
    pub fn derive_from_str(
        &self,
        commissioning: &str,
        evaluation: NaiveDate,
    ) -> EngineResult<DerivedMetrics> {
        let date = parse_commissioning_date(commissioning)?;
        Ok(self.derive(date, evaluation))
    }
}

impl Default for ImpactEngine {
    fn default() -> Self {
        Self::new()
    }
}
