// ==========================================
// SNAC 数据上传工具 - 字段模型注册表
// ==========================================
// 职责: 按 schema 类型提供只读字段注册表
// 红线: 构建后不再修改，可跨线程共享
// ==========================================

use crate::domain::types::ModelType;
use crate::model::field::{FieldRelation, ModelField, ModelFieldType};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// SnacModel - 字段注册表
// ==========================================
#[derive(Debug, Clone)]
pub struct SnacModel<F: ModelFieldType> {
    fields: Vec<ModelField<F>>,
    index: HashMap<F, usize>,
    names: HashMap<String, F>, // 小写的当前名与历史名
}

impl<F: ModelFieldType> SnacModel<F> {
    /// 从静态字段表构建注册表
    ///
    /// dependents 由各字段声明的 dependencies 反向推导
    pub fn new() -> Self {
        let specs = F::specs();

        let mut dependents: HashMap<F, Vec<FieldRelation<F>>> = HashMap::new();
        for spec in specs {
            for dep in spec.dependencies {
                dependents.entry(dep.field).or_default().push(FieldRelation {
                    field: spec.field,
                    requirement: dep.requirement,
                });
            }
        }

        let mut fields = Vec::with_capacity(specs.len());
        let mut index = HashMap::new();
        let mut names = HashMap::new();

        for (i, spec) in specs.iter().enumerate() {
            names.insert(spec.name.to_lowercase(), spec.field);
            for prev in spec.previous_names {
                names.insert(prev.to_lowercase(), spec.field);
            }

            index.insert(spec.field, i);
            fields.push(ModelField::new(
                spec,
                dependents.remove(&spec.field).unwrap_or_default(),
            ));
        }

        Self {
            fields,
            index,
            names,
        }
    }

    pub fn model_type(&self) -> ModelType {
        F::MODEL_TYPE
    }

    /// 按显示名（当前或历史，不区分大小写）解析字段类型
    ///
    /// # 返回
    /// - 未识别或空名称: F::NONE（调用方应忽略该列）
    pub fn field_type_for(&self, name: &str) -> F {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return F::NONE;
        }
        self.names.get(&key).copied().unwrap_or(F::NONE)
    }

    /// 字段描述（NONE 返回 None）
    pub fn model_field(&self, field: F) -> Option<&ModelField<F>> {
        self.index.get(&field).map(|i| &self.fields[*i])
    }

    pub fn model_field_by_name(&self, name: &str) -> Option<&ModelField<F>> {
        self.model_field(self.field_type_for(name))
    }

    /// 是否为某字段的当前名称
    pub fn is_current_name(&self, name: &str) -> bool {
        self.model_field_by_name(name)
            .map(|f| f.is_current_name(name))
            .unwrap_or(false)
    }

    /// 是否为可识别的名称（当前或历史）
    pub fn is_known_name(&self, name: &str) -> bool {
        self.field_type_for(name) != F::NONE
    }

    /// 字段的当前显示名（NONE 为空串）
    pub fn name_of(&self, field: F) -> &'static str {
        self.model_field(field).map(|f| f.name()).unwrap_or("")
    }

    /// 查找映射到指定字段的列（按列名排序取第一个）
    pub fn related_column<'m>(
        &self,
        field: F,
        column_mappings: &'m BTreeMap<String, String>,
    ) -> Option<&'m str> {
        column_mappings
            .iter()
            .find(|(_, snac_field)| self.field_type_for(snac_field) == field)
            .map(|(column, _)| column.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = &ModelField<F>> {
        self.fields.iter()
    }

    /// 模型 JSON（供界面使用）
    pub fn to_json(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|f| f.to_json(|other| self.name_of(other)))
            .collect();

        json!({
            "type": F::MODEL_TYPE.as_str(),
            "fields": fields,
        })
    }
}

impl<F: ModelFieldType> Default for SnacModel<F> {
    fn default() -> Self {
        Self::new()
    }
}
