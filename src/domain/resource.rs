// ==========================================
// SNAC 数据上传工具 - Resource 领域实体
// ==========================================
// 依据: SNAC 数据模型 - Resource
// ==========================================

use crate::domain::constellation::{Constellation, Language};
use crate::domain::term::Term;
use crate::domain::types::Operation;
use serde::Serialize;

// ==========================================
// Resource - 档案资源
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "dataType", rename = "Resource", rename_all = "camelCase")]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<Term>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<Language>,

    /// 馆藏机构（仅 ID 引用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Box<Constellation>>,
}

impl Resource {
    pub fn for_insert() -> Self {
        Self {
            operation: Some(Operation::Insert),
            ..Default::default()
        }
    }

    /// 仅携带 ID 的引用（用于资源关系）
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn is_update(&self) -> bool {
        self.operation == Some(Operation::Update)
    }

    pub fn existing_id(&self) -> Option<i64> {
        self.id.filter(|id| *id > 0)
    }

    pub fn repository_id(&self) -> Option<i64> {
        self.repository.as_ref().and_then(|r| r.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TermType;

    #[test]
    fn test_serialize_resource_with_repository() {
        let mut res = Resource::for_insert();
        res.document_type = Some(Term::new(TermType::DocumentType, "ArchivalResource"));
        res.title = Some("Jacob Miller Papers".to_string());
        res.abstract_text = Some("Letters".to_string());
        res.repository = Some(Box::new(Constellation::reference(4)));

        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["dataType"], "Resource");
        assert_eq!(json["abstract"], "Letters");
        assert_eq!(json["repository"]["dataType"], "Constellation");
        assert_eq!(json["repository"]["id"], 4);
        assert_eq!(res.repository_id(), Some(4));
    }

    #[test]
    fn test_reference_has_no_operation() {
        let r = Resource::reference(12);
        assert!(r.operation.is_none());
        assert_eq!(r.existing_id(), Some(12));
        assert!(!r.is_update());
    }
}
