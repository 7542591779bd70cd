// ==========================================
// SNAC 数据上传工具 - 上传编排器
// ==========================================
// 职责: 批量校验/上传记录，汇总结果，生成结果列
// 红线: 逐条顺序执行；取消只在记录边界生效；已提交的远端修改不回滚
// ==========================================

use crate::config::SnacEnvironment;
use crate::domain::UploadOutcome;
use crate::exporter::UploadItem;
use crate::importer::{ImportResult, Table};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// CancellationFlag - 共享取消标记
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ==========================================
// BatchReport - 批量执行结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<UploadOutcome>, // 已完成记录的结果（取消时保留）
    pub cancelled: bool,
    pub total: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// 批量进度（已完成数, 总数）
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchMode {
    Validate,
    Upload,
}

impl BatchMode {
    fn label(&self) -> &'static str {
        match self {
            BatchMode::Validate => "validation",
            BatchMode::Upload => "upload",
        }
    }
}

// ==========================================
// UploadOrchestrator
// ==========================================
pub struct UploadOrchestrator {
    environment: SnacEnvironment,
    include_api_response: bool,
    progress: Option<ProgressCallback>,
}

impl UploadOrchestrator {
    /// # 参数
    /// - environment: 目标环境（结果列名使用其名称）
    /// - include_api_response: 是否生成 API Response 列
    pub fn new(environment: SnacEnvironment, include_api_response: bool) -> Self {
        Self {
            environment,
            include_api_response,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// 逐条上传
    pub async fn upload_batch(
        &self,
        items: &[Box<dyn UploadItem>],
        cancel: &CancellationFlag,
    ) -> BatchReport {
        self.run_batch(items, cancel, BatchMode::Upload).await
    }

    /// 逐条远端校验（不提交）
    pub async fn validate_batch(
        &self,
        items: &[Box<dyn UploadItem>],
        cancel: &CancellationFlag,
    ) -> BatchReport {
        self.run_batch(items, cancel, BatchMode::Validate).await
    }

    async fn run_batch(
        &self,
        items: &[Box<dyn UploadItem>],
        cancel: &CancellationFlag,
        mode: BatchMode,
    ) -> BatchReport {
        let total = items.len();
        let mut report = BatchReport {
            outcomes: Vec::with_capacity(total),
            cancelled: false,
            total,
        };

        info!(
            environment = %self.environment.name,
            mode = mode.label(),
            total,
            "开始批量处理"
        );

        for (i, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(completed = i, total, "批量处理已取消");
                report.cancelled = true;
                break;
            }

            let response = match mode {
                BatchMode::Upload => item.perform_upload().await,
                BatchMode::Validate => item.perform_validation().await,
            };

            info!("[{}/{}] {} result: [{}]", i + 1, total, mode.label(), response.result);

            report.outcomes.push(response.to_outcome(item.row_index()));

            if let Some(progress) = &self.progress {
                progress(i + 1, total);
            }
        }

        info!(
            completed = report.outcomes.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "批量处理结束"
        );

        report
    }

    // ==========================================
    // 结果列
    // ==========================================

    /// 生成结果列（列名, 每行值）
    ///
    /// # 参数
    /// - table: 输入表格（用于列名冲突检测与行数）
    /// - report: 批量结果
    ///
    /// # 返回
    /// 取消的批次不生成结果列（空列表）
    pub fn outcome_columns(&self, table: &Table, report: &BatchReport) -> Vec<(String, Vec<String>)> {
        if report.cancelled {
            return Vec::new();
        }

        let mut suffixes = vec!["Result", "Message", "ID", "Link"];
        if self.include_api_response {
            suffixes.push("API Response");
        }

        let names = self.unique_column_names(table, &suffixes);
        let rows = table.row_count();

        let mut columns: Vec<(String, Vec<String>)> = names
            .into_iter()
            .map(|name| (name, vec![String::new(); rows]))
            .collect();

        for outcome in &report.outcomes {
            let row = outcome.row_index;
            if row >= rows {
                warn!(row, rows, "结果行号超出表格范围，跳过");
                continue;
            }

            let mut values = vec![
                outcome.result.clone(),
                outcome.message.clone(),
                outcome.id_string(),
                outcome.uri.clone(),
            ];
            if self.include_api_response {
                values.push(outcome.api_response_column());
            }

            for ((_, column), value) in columns.iter_mut().zip(values) {
                column[row] = value;
            }
        }

        columns
    }

    /// 将结果列追加到表格
    ///
    /// # 返回
    /// 追加的列名
    pub fn apply_outcome_columns(&self, table: &mut Table, report: &BatchReport) -> ImportResult<Vec<String>> {
        let columns = self.outcome_columns(table, report);
        let mut names = Vec::with_capacity(columns.len());

        for (name, values) in columns {
            table.add_column(name.clone(), values)?;
            names.push(name);
        }

        Ok(names)
    }

    /// 列名前缀 `*SNAC {环境名}*: `，冲突时追加 " 2"、" 3" ...
    fn unique_column_names(&self, table: &Table, suffixes: &[&str]) -> Vec<String> {
        let prefix = format!("*SNAC {}*: ", self.environment.name);

        let mut attempt = 1;
        loop {
            let postfix = if attempt == 1 {
                String::new()
            } else {
                format!(" {}", attempt)
            };

            let names: Vec<String> = suffixes
                .iter()
                .map(|s| format!("{}{}{}", prefix, s, postfix))
                .collect();

            if names.iter().all(|n| table.column_index(n).is_none()) {
                return names;
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(row: usize, result: &str, message: &str, id: Option<i64>) -> UploadOutcome {
        UploadOutcome {
            row_index: row,
            result: result.to_string(),
            message: message.to_string(),
            entity_id: id,
            uri: String::new(),
            api_response: message.to_string(),
        }
    }

    fn table() -> Table {
        let mut t = Table::new(vec!["name".to_string()]);
        t.push_row(["a"]);
        t.push_row([""]);
        t.push_row(["b"]);
        t
    }

    #[test]
    fn test_cancellation_flag_shared() {
        let flag = CancellationFlag::new();
        let other = flag.clone();
        other.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_outcome_columns_placed_at_record_rows() {
        let orch = UploadOrchestrator::new(SnacEnvironment::development(), false);
        let report = BatchReport {
            outcomes: vec![
                outcome(0, "success", "", Some(5)),
                outcome(2, "error", "1. bad", None),
            ],
            cancelled: false,
            total: 2,
        };

        let columns = orch.outcome_columns(&table(), &report);
        assert_eq!(columns.len(), 4);

        let env_name = SnacEnvironment::development().name;
        assert_eq!(columns[0].0, format!("*SNAC {}*: Result", env_name));
        assert_eq!(columns[0].1, vec!["success", "", "error"]);
        assert_eq!(columns[2].1, vec!["5", "", ""]);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_api_response_column_and_collision_postfix() {
        let orch = UploadOrchestrator::new(SnacEnvironment::development(), true);
        let env_name = SnacEnvironment::development().name;

        let mut t = table();
        t.add_column(format!("*SNAC {}*: Message", env_name), vec![String::new(); 3])
            .unwrap();

        let report = BatchReport {
            outcomes: vec![outcome(0, "error", "1. bad", None)],
            cancelled: false,
            total: 1,
        };

        let names = orch.apply_outcome_columns(&mut t, &report).unwrap();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], format!("*SNAC {}*: Result 2", env_name));
        assert_eq!(names[4], format!("*SNAC {}*: API Response 2", env_name));

        // 合成响应的 API Response 置空
        assert_eq!(t.cell(0, &names[4]), "");
        assert_eq!(t.cell(0, &names[1]), "1. bad");
    }

    #[test]
    fn test_cancelled_batch_has_no_columns() {
        let orch = UploadOrchestrator::new(SnacEnvironment::development(), false);
        let report = BatchReport {
            outcomes: vec![outcome(0, "success", "", Some(1))],
            cancelled: true,
            total: 3,
        };
        assert!(orch.outcome_columns(&table(), &report).is_empty());
    }
}
