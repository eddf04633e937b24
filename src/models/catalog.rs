//! 车型目录：零件编号 → 车型名称

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// 页面目录表中的一行（原始文本）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelRow {
    /// 车型名称
    pub name: String,
    /// 零件编号
    pub part: String,
}

/// 车型目录
///
/// 每次运行构建一次，之后只读
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<u32, String>,
}

impl Catalog {
    /// 从页面表格行构建目录
    pub fn from_rows(rows: &[ModelRow]) -> AppResult<Self> {
        if rows.is_empty() {
            return Err(AppError::CatalogUnavailable("目录表为空".to_string()));
        }

        let mut entries = BTreeMap::new();
        for row in rows {
            let name = row.name.trim();
            if name.is_empty() {
                return Err(AppError::CatalogUnavailable(format!(
                    "零件 {} 缺少车型名称",
                    row.part
                )));
            }
            let part: u32 = row.part.trim().parse().map_err(|_| {
                AppError::CatalogUnavailable(format!("零件编号不是数字: '{}'", row.part))
            })?;
            entries.insert(part, name.to_string());
        }

        Ok(Self { entries })
    }

    pub fn name_of(&self, part_id: u32) -> Option<&str> {
        self.entries.get(&part_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
