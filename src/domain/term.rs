// ==========================================
// SNAC 数据上传工具 - 受控词表项
// ==========================================
// 相等性: type + term 不区分大小写
// ==========================================

use crate::domain::types::TermType;
use serde::{Deserialize, Serialize};

/// 受控词表项 (type, term, description, id)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Term {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "type")]
    pub term_type: String,

    pub term: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Term {
    pub fn new(term_type: TermType, term: impl Into<String>) -> Self {
        Self {
            id: None,
            term_type: term_type.as_str().to_string(),
            term: term.into(),
            description: String::new(),
        }
    }

    /// 逐字模式下的占位词项（不访问远端）
    pub fn dummy(term_type: TermType, key: &str) -> Self {
        Self::new(term_type, key)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// 预览用文本: "term (description)"
    pub fn display_text(&self) -> String {
        if self.description.is_empty() {
            self.term.clone()
        } else {
            format!("{} ({})", self.term, self.description)
        }
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.term_type.eq_ignore_ascii_case(&other.term_type)
            && self.term.to_lowercase() == other.term.to_lowercase()
    }
}

impl Eq for Term {}
