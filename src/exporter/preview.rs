// ==========================================
// SNAC 数据上传工具 - 预览 HTML
// ==========================================
// 职责: 预览表格的 HTML 片段拼接（纯函数）
// ==========================================

use crate::domain::{Language, SnacDate};
use crate::exporter::validation_errors::ValidationErrors;
use std::collections::BTreeMap;

pub const OPERATION_ROW: &str = "*** Operation ***";
pub const VALIDATION_ERRORS_ROW: &str = "Validation Errors";

pub fn html_table(s: &str) -> String {
    format!("<table><tbody>{}</tbody></table>", s)
}

pub fn html_table_row(s: &str) -> String {
    format!("<tr class=\"snac-schema-preview-row\">{}</tr>", s)
}

fn html_table_column(s: &str, attr: Option<&str>) -> String {
    match attr {
        Some(a) => format!("<td {}>{}</td>", a, s),
        None => format!("<td>{}</td>", s),
    }
}

pub fn html_table_column_field(s: &str) -> String {
    html_table_column(s, Some("class=\"snac-schema-preview-column-field\""))
}

pub fn html_table_column_value(s: &str) -> String {
    html_table_column(s, Some("class=\"snac-schema-preview-column-value\""))
}

/// 有序列表（空列表输出空串）
pub fn html_ordered_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let body: String = items
        .iter()
        .map(|i| format!("<li class=\"snac-schema-preview-list-item\">{}</li>", i.as_ref()))
        .collect();
    format!("<ol>{}</ol>", body)
}

pub fn html_link(url: &str, title: &str) -> String {
    format!("<a href=\"{}\" target=\"_blank\">{}</a>", url, title)
}

/// 日期预览文本
pub fn date_text(date: &SnacDate) -> String {
    let bound = |value: &Option<String>, term: &Option<crate::domain::Term>| {
        let mut text = value.clone().unwrap_or_default();
        if let Some(t) = term {
            text.push_str(&format!(" ({})", t.term));
        }
        text
    };

    let mut text = if date.is_range {
        format!(
            "{} - {}",
            bound(&date.from_date, &date.from_type),
            bound(&date.to_date, &date.to_type)
        )
    } else {
        bound(&date.from_date, &date.from_type)
    };

    if let Some(note) = date.note.as_ref().filter(|n| !n.is_empty()) {
        text.push_str(&format!(" [{}]", note));
    }
    text
}

/// 语言列表的预览值（无可显示项时为 None）
pub fn language_list(languages: &[Language]) -> Option<String> {
    let items: Vec<String> = languages.iter().filter_map(Language::display_text).collect();
    if items.is_empty() {
        None
    } else {
        Some(html_ordered_list(&items))
    }
}

/// 拼接预览表格
///
/// # 参数
/// - fields: 字段名 → 值（按字段名排序输出，空值跳过）
/// - operation: 操作说明行
/// - errors: 校验错误（非空时追加一行）
pub fn render_preview(
    mut fields: BTreeMap<String, String>,
    operation: String,
    errors: &ValidationErrors,
) -> String {
    fields.insert(OPERATION_ROW.to_string(), operation);

    if errors.has_errors() {
        fields.insert(
            VALIDATION_ERRORS_ROW.to_string(),
            html_ordered_list(errors.errors()),
        );
    }

    let rows: String = fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            html_table_row(&format!(
                "{}{}",
                html_table_column_field(key),
                html_table_column_value(value)
            ))
        })
        .collect();

    html_table(&rows)
}
