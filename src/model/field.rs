// ==========================================
// SNAC 数据上传工具 - 字段描述符
// ==========================================
// 职责: 字段约束的静态描述（必填/出现次数/词表类别/字段关系）
// 约定: 字段关系只在主字段上声明为 dependency，
//       反向的 dependent 由 SnacModel 构建时推导
// ==========================================

use crate::domain::types::{ModelType, TermType};
use serde_json::{json, Value};
use std::fmt::Debug;
use std::hash::Hash;

// ==========================================
// 约束枚举
// ==========================================

/// 必填性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRequirement {
    Required,
    Optional,
}

impl FieldRequirement {
    pub fn label(&self) -> &'static str {
        match self {
            FieldRequirement::Required => "Required",
            FieldRequirement::Optional => "Optional",
        }
    }
}

/// 每条记录的出现次数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOccurrence {
    Single,
    Multiple,
}

impl FieldOccurrence {
    pub fn label(&self) -> &'static str {
        match self {
            FieldOccurrence::Single => "One per record",
            FieldOccurrence::Multiple => "Multiple per record",
        }
    }
}

/// 值的词表类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVocabulary {
    Controlled,
    FreeText,
    Identifier,
}

impl FieldVocabulary {
    pub fn label(&self) -> &'static str {
        match self {
            FieldVocabulary::Controlled => "SNAC Controlled Vocabulary",
            FieldVocabulary::FreeText => "Free Text",
            FieldVocabulary::Identifier => "Numeric SNAC Identifier",
        }
    }
}

/// 字段关系（方向由所在列表决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRelation<F> {
    pub field: F,
    pub requirement: FieldRequirement,
}

impl<F> FieldRelation<F> {
    pub const fn required(field: F) -> Self {
        Self {
            field,
            requirement: FieldRequirement::Required,
        }
    }

    pub const fn optional(field: F) -> Self {
        Self {
            field,
            requirement: FieldRequirement::Optional,
        }
    }

    pub fn is_required(&self) -> bool {
        self.requirement == FieldRequirement::Required
    }
}

// ==========================================
// FieldSpec - 静态字段描述
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<F: 'static> {
    pub field: F,
    pub name: &'static str,
    pub previous_names: &'static [&'static str],
    pub requirement: FieldRequirement,
    pub occurrence: FieldOccurrence,
    pub vocabulary: FieldVocabulary,
    pub term_type: Option<TermType>,
    pub dependencies: &'static [FieldRelation<F>],
    pub sample_values: &'static [&'static str],
    pub default_value: Option<&'static str>,
    pub tooltip: &'static str,
}

impl<F: 'static> FieldSpec<F> {
    /// 默认: 可选、可多次、自由文本
    pub const fn new(field: F, name: &'static str) -> Self {
        Self {
            field,
            name,
            previous_names: &[],
            requirement: FieldRequirement::Optional,
            occurrence: FieldOccurrence::Multiple,
            vocabulary: FieldVocabulary::FreeText,
            term_type: None,
            dependencies: &[],
            sample_values: &[],
            default_value: None,
            tooltip: "",
        }
    }

    pub const fn required(mut self) -> Self {
        self.requirement = FieldRequirement::Required;
        self
    }

    pub const fn single(mut self) -> Self {
        self.occurrence = FieldOccurrence::Single;
        self
    }

    pub const fn controlled(mut self, term_type: TermType) -> Self {
        self.vocabulary = FieldVocabulary::Controlled;
        self.term_type = Some(term_type);
        self
    }

    pub const fn identifier(mut self) -> Self {
        self.vocabulary = FieldVocabulary::Identifier;
        self
    }

    pub const fn previous_names(mut self, names: &'static [&'static str]) -> Self {
        self.previous_names = names;
        self
    }

    pub const fn depends_on(mut self, relations: &'static [FieldRelation<F>]) -> Self {
        self.dependencies = relations;
        self
    }

    pub const fn samples(mut self, values: &'static [&'static str]) -> Self {
        self.sample_values = values;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    pub const fn tooltip(mut self, text: &'static str) -> Self {
        self.tooltip = text;
        self
    }
}

// ==========================================
// ModelFieldType Trait
// ==========================================
// 用途: 各 schema 的字段枚举
// 实现者: ConstellationField, ResourceField, RelationField
pub trait ModelFieldType: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {
    /// 未识别字段（调用方应忽略该列）
    const NONE: Self;

    /// 所属模型类型
    const MODEL_TYPE: ModelType;

    /// 静态字段表
    fn specs() -> &'static [FieldSpec<Self>];
}

// ==========================================
// ModelField - 运行时字段描述（含推导出的 dependents）
// ==========================================
#[derive(Debug, Clone)]
pub struct ModelField<F: 'static> {
    spec: &'static FieldSpec<F>,
    dependents: Vec<FieldRelation<F>>,
}

impl<F: ModelFieldType> ModelField<F> {
    pub(crate) fn new(spec: &'static FieldSpec<F>, dependents: Vec<FieldRelation<F>>) -> Self {
        Self { spec, dependents }
    }

    pub fn field_type(&self) -> F {
        self.spec.field
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn previous_names(&self) -> &'static [&'static str] {
        self.spec.previous_names
    }

    pub fn vocabulary(&self) -> FieldVocabulary {
        self.spec.vocabulary
    }

    pub fn term_type(&self) -> Option<TermType> {
        self.spec.term_type
    }

    pub fn default_value(&self) -> Option<&'static str> {
        self.spec.default_value
    }

    pub fn is_required(&self) -> bool {
        self.spec.requirement == FieldRequirement::Required
    }

    pub fn is_single(&self) -> bool {
        self.spec.occurrence == FieldOccurrence::Single
    }

    pub fn is_controlled(&self) -> bool {
        self.spec.vocabulary == FieldVocabulary::Controlled
    }

    pub fn dependents(&self) -> &[FieldRelation<F>] {
        &self.dependents
    }

    pub fn required_dependencies(&self) -> Vec<F> {
        self.spec
            .dependencies
            .iter()
            .filter(|r| r.is_required())
            .map(|r| r.field)
            .collect()
    }

    pub fn required_dependents(&self) -> Vec<F> {
        self.dependents
            .iter()
            .filter(|r| r.is_required())
            .map(|r| r.field)
            .collect()
    }

    /// 是否为当前名称（精确匹配）
    pub fn is_current_name(&self, name: &str) -> bool {
        self.spec.name == name
    }

    /// 是否为当前或历史名称（不区分大小写）
    pub fn is_known_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.spec.name.eq_ignore_ascii_case(name)
            || self
                .spec
                .previous_names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// 字段描述 JSON（供界面使用）
    pub fn to_json(&self, names: impl Fn(F) -> &'static str) -> Value {
        let dependencies: Vec<Value> = self
            .spec
            .dependencies
            .iter()
            .map(|r| json!({ "name": names(r.field), "required": r.is_required() }))
            .collect();
        let dependents: Vec<Value> = self
            .dependents
            .iter()
            .map(|r| json!({ "name": names(r.field), "required": r.is_required() }))
            .collect();

        json!({
            "name": self.spec.name,
            "required": self.is_required(),
            "requirement": self.spec.requirement.label(),
            "repeatable": !self.is_single(),
            "occurence": self.spec.occurrence.label(),
            "controlled": self.is_controlled(),
            "vocabulary": self.spec.vocabulary.label(),
            "dependencies": dependencies,
            "dependents": dependents,
            "sample_values": self.spec.sample_values,
            "default_value": self.spec.default_value.unwrap_or(""),
            "tooltip": self.spec.tooltip,
        })
    }
}
