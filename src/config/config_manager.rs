// ==========================================
// 清洁炉灶安装档案系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::impact::ImpactFactors;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 效益换算系数（impact/ 前缀，缺省取编码默认值）
    pub const IMPACT_WOOD_KG_PER_DAY: &str = "impact/wood_kg_per_day";
    pub const IMPACT_CO2_PER_WOOD_KG: &str = "impact/co2_per_wood_kg";
    pub const IMPACT_WOOD_KG_PER_TREE: &str = "impact/wood_kg_per_tree";
    pub const IMPACT_TREES_PER_ACRE: &str = "impact/trees_per_acre";
    pub const IMPACT_CO2_KG_PER_CREDIT: &str = "impact/co2_kg_per_credit";

    // 导入投运日期种子窗口
    pub const IMPORT_WINDOW_START: &str = "import/window_start_date";
    pub const IMPORT_WINDOW_END: &str = "import/window_end_date";
}

/// 导入日期种子窗口默认值（含首尾）
const DEFAULT_IMPORT_WINDOW_START: &str = "2025-06-21";
const DEFAULT_IMPORT_WINDOW_END: &str = "2025-06-30";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        Ok(())
    }

    /// 读取浮点配置值，缺省或格式非法时取默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!("配置值格式非法，回退默认值: key={}, value={}", key, raw);
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 读取日期配置值（YYYY-MM-DD），缺省或格式非法时取默认值
    fn get_date_or_default(&self, key: &str, default: &str) -> Result<NaiveDate, Box<dyn Error>> {
        let raw = self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string());

        match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(d) => Ok(d),
            Err(_) => {
                tracing::warn!("配置值格式非法，回退默认值: key={}, value={}", key, raw);
                Ok(NaiveDate::parse_from_str(default, "%Y-%m-%d")?)
            }
        }
    }

    // ==========================================
    // 业务配置读取
    // ==========================================

    /// 读取效益换算系数（构造 ImpactEngine 时调用一次）
    pub fn get_impact_factors(&self) -> Result<ImpactFactors, Box<dyn Error>> {
        let defaults = ImpactFactors::default();

        Ok(ImpactFactors {
            wood_kg_per_day: self.get_f64_or_default(
                config_keys::IMPACT_WOOD_KG_PER_DAY,
                defaults.wood_kg_per_day,
            )?,
            co2_per_wood_kg: self.get_f64_or_default(
                config_keys::IMPACT_CO2_PER_WOOD_KG,
                defaults.co2_per_wood_kg,
            )?,
            wood_kg_per_tree: self.get_f64_or_default(
                config_keys::IMPACT_WOOD_KG_PER_TREE,
                defaults.wood_kg_per_tree,
            )?,
            trees_per_acre: self.get_f64_or_default(
                config_keys::IMPACT_TREES_PER_ACRE,
                defaults.trees_per_acre,
            )?,
            co2_kg_per_credit: self.get_f64_or_default(
                config_keys::IMPACT_CO2_KG_PER_CREDIT,
                defaults.co2_kg_per_credit,
            )?,
        })
    }

    /// 读取导入投运日期种子窗口（start, end），end 含当日
    pub fn get_import_window(&self) -> Result<(NaiveDate, NaiveDate), Box<dyn Error>> {
        let start = self.get_date_or_default(
            config_keys::IMPORT_WINDOW_START,
            DEFAULT_IMPORT_WINDOW_START,
        )?;
        let end =
            self.get_date_or_default(config_keys::IMPORT_WINDOW_END, DEFAULT_IMPORT_WINDOW_END)?;

        if end < start {
            return Err(format!("导入日期窗口非法: start={}, end={}", start, end).into());
        }

        Ok((start, end))
    }
}
