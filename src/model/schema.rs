// ==========================================
// SNAC 数据上传工具 - Schema（列映射）
// ==========================================
// 职责: schemaType + columnMappings 的加载、迁移
// 迁移: 将历史字段名改写为当前字段名
// ==========================================

use crate::domain::types::ModelType;
use crate::model::constellation_model::ConstellationModel;
use crate::model::error::{SchemaError, SchemaResult};
use crate::model::field::ModelFieldType;
use crate::model::relation_model::RelationModel;
use crate::model::resource_model::ResourceModel;
use crate::model::snac_model::SnacModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

// ==========================================
// SnacSchema
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnacSchema {
    #[serde(rename = "schemaType")]
    pub schema_type: String,

    /// 列名 -> SNAC 字段名（有序，保证构建顺序确定）
    #[serde(rename = "columnMappings", default)]
    pub column_mappings: BTreeMap<String, String>,
}

/// 单个字段改名记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRename {
    pub column: String,
    pub from: String,
    pub to: String,
}

impl SnacSchema {
    pub fn new(model_type: ModelType, column_mappings: BTreeMap<String, String>) -> Self {
        Self {
            schema_type: model_type.as_str().to_string(),
            column_mappings,
        }
    }

    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SchemaResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> SchemaResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn model_type(&self) -> SchemaResult<ModelType> {
        self.schema_type
            .parse::<ModelType>()
            .map_err(|_| SchemaError::UnrecognizedSchemaType(self.schema_type.clone()))
    }

    /// 将历史字段名迁移为当前字段名
    ///
    /// # 返回
    /// - Ok(renames): 改名列表（为空表示已是最新）
    /// - Err: schema 类型或字段名无法识别（此时不做任何修改）
    pub fn migrate(&mut self) -> SchemaResult<Vec<FieldRename>> {
        let renames = match self.model_type()? {
            ModelType::Constellation => plan_renames(&ConstellationModel::new(), &self.column_mappings)?,
            ModelType::Resource => plan_renames(&ResourceModel::new(), &self.column_mappings)?,
            ModelType::Relation => plan_renames(&RelationModel::new(), &self.column_mappings)?,
        };

        for rename in &renames {
            info!(column = %rename.column, from = %rename.from, to = %rename.to, "迁移字段名");
            self.column_mappings
                .insert(rename.column.clone(), rename.to.clone());
        }

        if renames.is_empty() {
            info!("SNAC schema 已是最新");
        }

        Ok(renames)
    }
}

fn plan_renames<F: ModelFieldType>(
    model: &SnacModel<F>,
    column_mappings: &BTreeMap<String, String>,
) -> SchemaResult<Vec<FieldRename>> {
    let mut renames = Vec::new();

    for (column, snac_field) in column_mappings {
        let field = model
            .model_field_by_name(snac_field)
            .ok_or_else(|| SchemaError::UnrecognizedField {
                column: column.clone(),
                field: snac_field.clone(),
            })?;

        if !field.is_current_name(snac_field) {
            renames.push(FieldRename {
                column: column.clone(),
                from: snac_field.clone(),
                to: field.name().to_string(),
            });
        }
    }

    Ok(renames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema_json() {
        let schema = SnacSchema::from_json_str(
            r#"{"schemaType":"resource","columnMappings":{"title":"Title","repo":"Holding Repository SNAC ID"}}"#,
        )
        .unwrap();
        assert_eq!(schema.model_type().unwrap(), ModelType::Resource);
        assert_eq!(schema.column_mappings.len(), 2);
    }

    #[test]
    fn test_migrate_renames_previous_names() {
        let mut mappings = BTreeMap::new();
        mappings.insert("id".to_string(), "SNAC CPF ID".to_string());
        mappings.insert("type".to_string(), "CPF Type".to_string());
        let mut schema = SnacSchema::new(ModelType::Constellation, mappings);

        let renames = schema.migrate().unwrap();
        assert_eq!(renames.len(), 1);
        assert_eq!(renames[0].to, "CPF ID");
        assert_eq!(schema.column_mappings["id"], "CPF ID");

        // 再次迁移无变化
        assert!(schema.migrate().unwrap().is_empty());
    }

    #[test]
    fn test_migrate_rejects_unknown_field() {
        let mut mappings = BTreeMap::new();
        mappings.insert("x".to_string(), "Favorite Color".to_string());
        mappings.insert("id".to_string(), "SNAC Resource ID".to_string());
        let mut schema = SnacSchema::new(ModelType::Resource, mappings.clone());

        let err = schema.migrate().unwrap_err();
        assert!(matches!(err, SchemaError::UnrecognizedField { .. }));
        assert_eq!(schema.column_mappings, mappings);
    }

    #[test]
    fn test_migrate_rejects_unknown_schema_type() {
        let mut schema = SnacSchema {
            schema_type: "holding".to_string(),
            column_mappings: BTreeMap::new(),
        };
        assert!(matches!(
            schema.migrate(),
            Err(SchemaError::UnrecognizedSchemaType(_))
        ));
    }
}
