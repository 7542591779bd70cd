// ==========================================
// SNAC 数据上传工具 - 字段校验器
// ==========================================
// 职责: 单次构建内的出现次数跟踪、同行依赖检查、词项/标识符取值
// 红线: 不 panic、不返回 Err；失败时记录错误并跳过该值
// 说明: 每条记录每次构建新建一个实例，状态不跨记录
// ==========================================

use crate::cache::TermSource;
use crate::domain::term::Term;
use crate::domain::types::TermType;
use crate::exporter::validation_errors::ValidationErrors;
use crate::importer::Table;
use crate::model::{ModelFieldType, SnacModel};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// 单个字段的出现次数跟踪
#[derive(Debug, Default)]
struct FieldTracker {
    count: usize,
    warned: bool,
}

/// 关联词项的解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum RelatedTerm {
    /// 关联列未映射或为空（且无默认值）
    Absent,
    Resolved(Term),
    /// 值无法解析，已记录错误
    Invalid,
}

impl RelatedTerm {
    pub fn into_option(self) -> Option<Term> {
        match self {
            RelatedTerm::Resolved(term) => Some(term),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, RelatedTerm::Invalid)
    }
}

// ==========================================
// FieldValidator
// ==========================================
pub struct FieldValidator<'a, F: ModelFieldType> {
    model: &'a SnacModel<F>,
    mappings: &'a BTreeMap<String, String>,
    table: &'a Table,
    source: TermSource<'a>,
    errors: ValidationErrors,
    trackers: HashMap<F, FieldTracker>,
}

impl<'a, F: ModelFieldType> FieldValidator<'a, F> {
    pub fn new(
        model: &'a SnacModel<F>,
        mappings: &'a BTreeMap<String, String>,
        table: &'a Table,
        source: TermSource<'a>,
    ) -> Self {
        Self {
            model,
            mappings,
            table,
            source,
            errors: ValidationErrors::new(),
            trackers: HashMap::new(),
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }

    /// 字段已计数的出现次数
    pub fn occurrences(&self, field: F) -> usize {
        self.trackers.get(&field).map(|t| t.count).unwrap_or(0)
    }

    // ==========================================
    // 列与单元格
    // ==========================================

    /// 映射到该字段的第一列
    pub fn column(&self, field: F) -> Option<&'a str> {
        self.model.related_column(field, self.mappings)
    }

    pub fn cell_value(&self, row: usize, column: &str) -> &'a str {
        self.table.cell(row, column)
    }

    /// 同行关联字段的值
    ///
    /// # 返回
    /// - 关联列已映射: 该列单元格值
    /// - 未映射: fallback（可能为 None）
    pub fn related_cell_value(&self, row: usize, related: F) -> Option<String> {
        self.column(related)
            .map(|column| self.cell_value(row, column).to_string())
    }

    // ==========================================
    // 出现次数与依赖检查
    // ==========================================

    /// 计数并检查字段
    ///
    /// # 参数
    /// - field: 字段类型（NONE 直接返回 false）
    /// - value: 当前单元格值
    /// - row: 当前行
    ///
    /// # 返回
    /// - true: 可以处理该值
    /// - false: 超出出现次数或同行依赖不满足（已记录错误）
    pub fn check_and_count_field(&mut self, field: F, value: &str, row: usize) -> bool {
        let model_field = match self.model.model_field(field) {
            Some(f) => f,
            None => return false,
        };

        let tracker = self.trackers.entry(field).or_default();
        tracker.count += 1;

        if model_field.is_single() && tracker.count > 1 {
            if !tracker.warned {
                tracker.warned = true;
                let column = self.column(field);
                self.errors.add_occurrence_limit(model_field.name(), column);
            }
            trace!(field = model_field.name(), "超出出现次数，跳过");
            return false;
        }

        let column = self.column(field);
        let mut ok = true;

        for dep in model_field.required_dependencies() {
            match self.column(dep) {
                None => {
                    self.errors.add_required_dependency_missing(
                        model_field.name(),
                        column,
                        self.model.name_of(dep),
                    );
                    ok = false;
                }
                Some(dep_column) if self.cell_value(row, dep_column).is_empty() => {
                    self.errors.add_required_dependency_empty(
                        model_field.name(),
                        value,
                        column,
                        self.model.name_of(dep),
                        Some(dep_column),
                    );
                    ok = false;
                }
                Some(_) => {}
            }
        }

        for dep in model_field.required_dependents() {
            match self.column(dep) {
                None => {
                    self.errors.add_required_dependent_missing(
                        model_field.name(),
                        column,
                        self.model.name_of(dep),
                    );
                    ok = false;
                }
                Some(dep_column) if self.cell_value(row, dep_column).is_empty() => {
                    self.errors.add_required_dependent_empty(
                        model_field.name(),
                        value,
                        column,
                        self.model.name_of(dep),
                        Some(dep_column),
                    );
                    ok = false;
                }
                Some(_) => {}
            }
        }

        ok
    }

    /// 记录扫描结束后检查必填字段
    pub fn finalize_field(&mut self, field: F) {
        let model_field = match self.model.model_field(field) {
            Some(f) => f,
            None => return,
        };

        if model_field.is_required() && self.occurrences(field) == 0 {
            let column = self.column(field);
            self.errors.add_required_field_missing(model_field.name(), column);
        }
    }

    /// 对模型中所有字段执行 finalize_field
    pub fn finalize_all(&mut self) {
        let fields: Vec<F> = self.model.fields().map(|f| f.field_type()).collect();
        for field in fields {
            self.finalize_field(field);
        }
    }

    // ==========================================
    // 取值
    // ==========================================

    /// 正整数标识符
    pub fn get_identifier(&mut self, field: F, value: &str) -> Option<i64> {
        match value.trim().parse::<i64>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                let column = self.column(field);
                self.errors
                    .add_invalid_numeric(self.model.name_of(field), value, column);
                None
            }
        }
    }

    /// 字段在模型中登记的受控词表
    fn term_type_of(&self, field: F) -> Option<TermType> {
        self.model.model_field(field).and_then(|f| f.term_type())
    }

    /// 解析字段值对应的词项，词表取自模型字段定义
    pub async fn get_term(&mut self, field: F, value: &str) -> Option<Term> {
        let term = match self.term_type_of(field) {
            Some(term_type) => self.source.resolve_term(term_type, value).await,
            None => None,
        };

        if term.is_none() {
            let column = self.column(field);
            self.errors
                .add_invalid_vocabulary(self.model.name_of(field), value, column);
        }

        term
    }

    /// 解析固定值词项（不来自任何列，如 sameAs 记录类型）
    pub async fn get_fixed_term(
        &mut self,
        label: &str,
        key: &str,
        term_type: TermType,
        field: F,
        value: &str,
    ) -> Option<Term> {
        let term = self.source.resolve_term(term_type, key).await;

        if term.is_none() {
            let column = self.column(field);
            self.errors.add_invalid_related_vocabulary(
                label,
                key,
                None,
                self.model.name_of(field),
                value,
                column,
            );
        }

        term
    }

    /// 解析同行关联字段的词项
    ///
    /// 关联列未映射或为空时使用关联字段的默认值；词表取自关联字段定义
    pub async fn get_related_term(
        &mut self,
        row: usize,
        field: F,
        value: &str,
        related: F,
    ) -> RelatedTerm {
        let fallback = self.model.model_field(related).and_then(|f| f.default_value());
        let related_value = self
            .related_cell_value(row, related)
            .filter(|v| !v.is_empty())
            .or_else(|| fallback.map(|f| f.to_string()))
            .unwrap_or_default();

        if related_value.is_empty() {
            return RelatedTerm::Absent;
        }

        let term = match self.term_type_of(related) {
            Some(term_type) => self.source.resolve_term(term_type, &related_value).await,
            None => None,
        };

        match term {
            Some(term) => RelatedTerm::Resolved(term),
            None => {
                let related_column = self.column(related);
                let column = self.column(field);
                self.errors.add_invalid_related_vocabulary(
                    self.model.name_of(related),
                    &related_value,
                    related_column,
                    self.model.name_of(field),
                    value,
                    column,
                );
                RelatedTerm::Invalid
            }
        }
    }
}
