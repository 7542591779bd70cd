// ==========================================
// SNAC 数据上传工具 - Constellation 领域实体
// ==========================================
// 依据: SNAC 数据模型 - Constellation 及其子实体
// 职责: 单条记录构建出的实体图（每条记录新建，不跨记录共享）
// 序列化: camelCase + dataType 标签，缺省字段省略
// ==========================================

use crate::domain::resource::Resource;
use crate::domain::term::Term;
use crate::domain::types::Operation;
use serde::Serialize;

// ==========================================
// Constellation - 人物/机构/家族
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "dataType", rename = "Constellation", rename_all = "camelCase")]
pub struct Constellation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<Term>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub name_entries: Vec<NameEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub date_list: Vec<SnacDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub places: Vec<Place>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<TermEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub occupations: Vec<TermEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<TermEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages_used: Vec<Language>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub biog_hists: Vec<BiogHist>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as_relations: Vec<SameAs>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_relations: Vec<ResourceRelation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<ConstellationRelation>,
}

impl Constellation {
    /// 新建待插入的 Constellation
    pub fn for_insert() -> Self {
        Self {
            operation: Some(Operation::Insert),
            ..Default::default()
        }
    }

    /// 仅携带 ID 的引用（如馆藏机构）
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn is_update(&self) -> bool {
        self.operation == Some(Operation::Update)
    }

    /// 已存在的远端 ID（> 0）
    pub fn existing_id(&self) -> Option<i64> {
        self.id.filter(|id| *id > 0)
    }
}

// ==========================================
// 子实体
// ==========================================

/// 名称条目（preference_score 99 = 首选名）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameEntry {
    pub original: String,
    pub preference_score: i32,
    pub operation: Operation,
}

pub const PREFERRED_NAME_SCORE: i32 = 99;
pub const VARIANT_NAME_SCORE: i32 = 0;

/// 日期（单点或区间）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnacDate {
    pub is_range: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_type: Option<Term>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_type: Option<Term>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub operation: Operation,
}

impl SnacDate {
    /// 单点日期: from = to = value
    pub fn single(value: &str, date_type: Term, note: Option<String>) -> Self {
        Self {
            is_range: false,
            from_date: Some(value.to_string()),
            from_original: Some(value.to_string()),
            from_type: Some(date_type.clone()),
            to_date: Some(value.to_string()),
            to_original: Some(value.to_string()),
            to_type: Some(date_type),
            note,
            operation: Operation::Insert,
        }
    }

    /// 两个单点日期合并为区间
    ///
    /// from 取第一条的起点与类型，to 取第二条自身的起点与类型
    pub fn range(from: &SnacDate, to: &SnacDate) -> Self {
        let note = match (&from.note, &to.note) {
            (Some(a), Some(b)) => Some(format!("{}; {}", a, b)),
            (Some(a), None) => Some(a.clone()),
            (None, Some(b)) => Some(b.clone()),
            (None, None) => None,
        };

        Self {
            is_range: true,
            from_date: from.from_date.clone(),
            from_original: from.from_original.clone(),
            from_type: from.from_type.clone(),
            to_date: to.from_date.clone(),
            to_original: to.from_original.clone(),
            to_type: to.from_type.clone(),
            note,
            operation: Operation::Insert,
        }
    }
}

/// 地点
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub original: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub place_type: Option<Term>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Term>,
    pub operation: Operation,
}

/// 仅携带一个词项的子实体（主题/职业/活动）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermEntry {
    pub term: Term,
    pub operation: Operation,
}

impl TermEntry {
    pub fn insert(term: Term) -> Self {
        Self {
            term,
            operation: Operation::Insert,
        }
    }
}

/// 语言/文字（二者至少其一）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Term>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<Term>,
    pub operation: Operation,
}

impl Language {
    /// 预览文本: "Language: eng (English) / Script: Latn (Latin)"
    pub fn display_text(&self) -> Option<String> {
        let lang = self.language.as_ref().map(Term::display_text);
        let script = self.script.as_ref().map(Term::display_text);

        match (lang, script) {
            (Some(l), Some(s)) => Some(format!("Language: {} / Script: {}", l, s)),
            (Some(l), None) => Some(format!("Language: {}", l)),
            (None, Some(s)) => Some(format!("Script: {}", s)),
            (None, None) => None,
        }
    }
}

/// 生平/沿革
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiogHist {
    pub text: String,
    pub operation: Operation,
}

/// 来源引用
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub citation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub operation: Operation,
}

/// 外部同一实体链接 (sameAs)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SameAs {
    pub uri: String,
    #[serde(rename = "type")]
    pub relation_type: Term,
    pub operation: Operation,
}

/// CPF 与资源的关系
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRelation {
    pub resource: Resource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Term>,
    pub operation: Operation,
}

/// CPF 与 CPF 的关系
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstellationRelation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_constellation: Option<i64>,
    pub target_constellation: i64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<Term>,
    pub operation: Operation,
}
