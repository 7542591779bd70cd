// ==========================================
// SNAC 数据上传工具 - 表格数据
// ==========================================
// 职责: 表头 + 字符串单元格；按首列（键列）分组为记录
// 规则: 首列非空的行开始新记录；开头键列为空的行并入第一条记录
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

/// 表格中的一条记录（行区间 [from_row, to_row)）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub from_row: usize,
    pub to_row: usize,
}

impl Record {
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.from_row..self.to_row
    }

    pub fn row_count(&self) -> usize {
        self.to_row - self.from_row
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 追加一行（单元格去除首尾空白，长度补齐到列数）
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .collect();
        row.resize(self.columns.len().max(row.len()), String::new());
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// 单元格值（去除首尾空白；列或行不存在时为空串）
    pub fn cell(&self, row: usize, column: &str) -> &str {
        self.column_index(column)
            .and_then(|idx| self.rows.get(row).and_then(|r| r.get(idx)))
            .map(|v| v.trim())
            .unwrap_or("")
    }

    /// 按键列分组为记录
    pub fn records(&self) -> Vec<Record> {
        let mut records: Vec<Record> = Vec::new();
        let mut leading_from: Option<usize> = None;

        for (idx, row) in self.rows.iter().enumerate() {
            let key_blank = row.first().map(|v| v.trim().is_empty()).unwrap_or(true);

            match records.last_mut() {
                Some(last) if key_blank => last.to_row = idx + 1,
                None if key_blank => {
                    leading_from.get_or_insert(idx);
                }
                _ => records.push(Record {
                    from_row: leading_from.take().unwrap_or(idx),
                    to_row: idx + 1,
                }),
            }
        }

        // 全部键列为空
        if let Some(from) = leading_from {
            records.push(Record {
                from_row: from,
                to_row: self.rows.len(),
            });
        }

        records
    }

    /// 追加一列
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<String>) -> ImportResult<()> {
        let name = name.into();
        if values.len() != self.rows.len() {
            return Err(ImportError::ColumnLengthMismatch {
                column: name,
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        let width = self.columns.len();
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.resize(width, String::new());
            row.push(value);
        }
        Ok(())
    }

    /// 写出为 CSV
    pub fn write_csv(&self, path: &Path) -> ImportResult<()> {
        let mut writer = csv::Writer::from_path(path)
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            let mut cells = row.clone();
            cells.resize(self.columns.len(), String::new());
            writer.write_record(&cells)?;
        }

        writer
            .flush()
            .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
        Ok(())
    }
}
