// ==========================================
// SNAC 数据上传工具 - 领域类型定义
// ==========================================
// 依据: SNAC API - 数据类型与受控词表类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 模型类型 (Model Type)
// ==========================================
// 序列化格式: 小写（与 schemaType 一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Constellation, // 人物/机构/家族
    Resource,      // 档案资源
    Relation,      // 关系（CPF-CPF / CPF-资源）
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Constellation => "constellation",
            ModelType::Resource => "resource",
            ModelType::Relation => "relation",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "constellation" => Ok(ModelType::Constellation),
            "resource" => Ok(ModelType::Resource),
            "relation" => Ok(ModelType::Relation),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// 远端实体类型 (Entity Kind)
// ==========================================
// 用途: 存在性校验的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Constellation,
    Resource,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Constellation => write!(f, "constellation"),
            EntityKind::Resource => write!(f, "resource"),
        }
    }
}

// ==========================================
// 操作标记 (Operation)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Insert => write!(f, "insert"),
            Operation::Update => write!(f, "update"),
        }
    }
}

// ==========================================
// 受控词表类型 (Term Type)
// ==========================================
// 序列化格式: snake_case（SNAC vocabulary 命令的 type 参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermType {
    Activity,
    DateType,
    DocumentRole,
    DocumentType,
    EntityType,
    LanguageCode,
    Occupation,
    PlaceRole,
    PlaceType,
    RecordType,
    RelationType,
    ScriptCode,
    Subject,
}

impl TermType {
    /// 词表类型的线上名称
    pub fn as_str(&self) -> &'static str {
        match self {
            TermType::Activity => "activity",
            TermType::DateType => "date_type",
            TermType::DocumentRole => "document_role",
            TermType::DocumentType => "document_type",
            TermType::EntityType => "entity_type",
            TermType::LanguageCode => "language_code",
            TermType::Occupation => "occupation",
            TermType::PlaceRole => "place_role",
            TermType::PlaceType => "place_type",
            TermType::RecordType => "record_type",
            TermType::RelationType => "relation_type",
            TermType::ScriptCode => "script_code",
            TermType::Subject => "subject",
        }
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_from_str() {
        assert_eq!("Resource".parse::<ModelType>(), Ok(ModelType::Resource));
        assert_eq!(" relation ".parse::<ModelType>(), Ok(ModelType::Relation));
        assert!("holding".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_term_type_wire_names() {
        assert_eq!(TermType::DocumentType.as_str(), "document_type");
        assert_eq!(
            serde_json::to_string(&TermType::PlaceRole).unwrap(),
            "\"place_role\""
        );
    }
}
