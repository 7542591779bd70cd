// ==========================================
// SNAC 数据上传工具 - 校验错误列表
// ==========================================
// 职责: 单次构建过程中累积的可读错误（只追加）
// 说明: 错误文本为英文固定格式，直接展示给用户
// ==========================================

/// 单次构建的校验错误
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<String>,
}

fn column_part(column: Option<&str>) -> String {
    match column {
        Some(c) if !c.is_empty() => format!(" (column {})", c),
        _ => String::new(),
    }
}

fn value_part(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!(": [{}]", v),
        _ => String::new(),
    }
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn add_error(&mut self, err: impl Into<String>) {
        self.errors.push(err.into());
    }

    /// 编号拼接: "1. a\n2. b"
    pub fn accumulated(&self) -> String {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}", i + 1, e))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ==========================================
    // 字段值无效
    // ==========================================

    #[allow(clippy::too_many_arguments)]
    fn add_invalid_field(
        &mut self,
        kind: &str,
        field: &str,
        value: &str,
        column: Option<&str>,
        dep_field: Option<&str>,
        dep_value: Option<&str>,
        dep_column: Option<&str>,
    ) {
        let mut err = format!(
            "Invalid {} field {}{}{}",
            kind,
            field,
            column_part(column),
            value_part(Some(value))
        );

        if let Some(dep) = dep_field.filter(|d| !d.is_empty()) {
            err.push_str(&format!(
                " for field {}{}{}",
                dep,
                column_part(dep_column),
                value_part(dep_value)
            ));
        }

        self.add_error(err);
    }

    pub fn add_invalid_numeric(&mut self, field: &str, value: &str, column: Option<&str>) {
        self.add_invalid_field("numeric", field, value, column, None, None, None);
    }

    pub fn add_invalid_vocabulary(&mut self, field: &str, value: &str, column: Option<&str>) {
        self.add_invalid_field(
            "controlled vocabulary",
            field,
            value,
            column,
            None,
            None,
            None,
        );
    }

    /// 关联字段的词表值无效（附带主字段信息）
    pub fn add_invalid_related_vocabulary(
        &mut self,
        field: &str,
        value: &str,
        column: Option<&str>,
        dep_field: &str,
        dep_value: &str,
        dep_column: Option<&str>,
    ) {
        self.add_invalid_field(
            "controlled vocabulary",
            field,
            value,
            column,
            Some(dep_field),
            Some(dep_value),
            dep_column,
        );
    }

    // ==========================================
    // 必需的依赖/被依赖字段
    // ==========================================

    fn add_required_relation(
        &mut self,
        problem: &str,
        relation: &str,
        field: &str,
        value: Option<&str>,
        column: Option<&str>,
        dep_field: &str,
        dep_column: Option<&str>,
    ) {
        let mut err = format!(
            "Field {}{}, a required {} of field {}{}, {}",
            dep_field,
            column_part(dep_column),
            relation,
            field,
            column_part(column),
            problem
        );

        if let Some(v) = value.filter(|v| !v.is_empty()) {
            err.push_str(&format!(" for row with value: [{}]", v));
        }

        self.add_error(err);
    }

    pub fn add_required_dependency_missing(
        &mut self,
        field: &str,
        column: Option<&str>,
        dep_field: &str,
    ) {
        self.add_required_relation(
            "not present in SNAC schema",
            "dependency",
            field,
            None,
            column,
            dep_field,
            None,
        );
    }

    pub fn add_required_dependent_missing(
        &mut self,
        field: &str,
        column: Option<&str>,
        dep_field: &str,
    ) {
        self.add_required_relation(
            "not present in SNAC schema",
            "dependent",
            field,
            None,
            column,
            dep_field,
            None,
        );
    }

    pub fn add_required_dependency_empty(
        &mut self,
        field: &str,
        value: &str,
        column: Option<&str>,
        dep_field: &str,
        dep_column: Option<&str>,
    ) {
        self.add_required_relation(
            "is blank",
            "dependency",
            field,
            Some(value),
            column,
            dep_field,
            dep_column,
        );
    }

    pub fn add_required_dependent_empty(
        &mut self,
        field: &str,
        value: &str,
        column: Option<&str>,
        dep_field: &str,
        dep_column: Option<&str>,
    ) {
        self.add_required_relation(
            "is blank",
            "dependent",
            field,
            Some(value),
            column,
            dep_field,
            dep_column,
        );
    }

    // ==========================================
    // 出现次数 / 必填字段
    // ==========================================

    pub fn add_occurrence_limit(&mut self, field: &str, column: Option<&str>) {
        self.add_error(format!(
            "Field {}{} exceeds its occurrence limit of one per record",
            field,
            column_part(column)
        ));
    }

    pub fn add_required_field_missing(&mut self, field: &str, column: Option<&str>) {
        match column {
            Some(c) => self.add_error(format!(
                "Required field {} (column {}) is blank for this record",
                field, c
            )),
            None => self.add_error(format!(
                "Required field {} is not present in SNAC schema",
                field
            )),
        }
    }

    // ==========================================
    // 远端 ID 不存在
    // ==========================================

    pub fn add_missing_id(&mut self, label: &str, id: i64) {
        self.add_error(format!("{} ID {} not found in SNAC", label, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_formats() {
        let mut errors = ValidationErrors::new();
        errors.add_invalid_numeric("CPF ID", "abc", Some("id"));
        errors.add_invalid_related_vocabulary(
            "Exist Date Type",
            "Birthday",
            Some("date type"),
            "Exist Date",
            "1850",
            Some("date"),
        );
        errors.add_invalid_vocabulary("Subject", "x", None);

        assert_eq!(
            errors.errors(),
            &[
                "Invalid numeric field CPF ID (column id): [abc]".to_string(),
                "Invalid controlled vocabulary field Exist Date Type (column date type): [Birthday] for field Exist Date (column date): [1850]".to_string(),
                "Invalid controlled vocabulary field Subject: [x]".to_string(),
            ]
        );
    }

    #[test]
    fn test_required_relation_formats() {
        let mut errors = ValidationErrors::new();
        errors.add_required_dependency_missing("Exist Date", Some("date"), "Exist Date Type");
        errors.add_required_dependent_empty(
            "Exist Date Type",
            "Birth",
            Some("date type"),
            "Exist Date",
            Some("date"),
        );

        assert_eq!(
            errors.errors()[0],
            "Field Exist Date Type, a required dependency of field Exist Date (column date), not present in SNAC schema"
        );
        assert_eq!(
            errors.errors()[1],
            "Field Exist Date (column date), a required dependent of field Exist Date Type (column date type), is blank for row with value: [Birth]"
        );
    }

    #[test]
    fn test_occurrence_and_required_formats() {
        let mut errors = ValidationErrors::new();
        errors.add_occurrence_limit("CPF Type", Some("type"));
        errors.add_required_field_missing("Title", None);
        errors.add_required_field_missing("Title", Some("title"));
        errors.add_missing_id("Holding Repository", 4);

        assert_eq!(
            errors.errors(),
            &[
                "Field CPF Type (column type) exceeds its occurrence limit of one per record"
                    .to_string(),
                "Required field Title is not present in SNAC schema".to_string(),
                "Required field Title (column title) is blank for this record".to_string(),
                "Holding Repository ID 4 not found in SNAC".to_string(),
            ]
        );
    }

    #[test]
    fn test_accumulated_is_numbered() {
        let mut errors = ValidationErrors::new();
        assert_eq!(errors.accumulated(), "");

        errors.add_error("first");
        errors.add_error("second");
        assert_eq!(errors.accumulated(), "1. first\n2. second");
    }
}
