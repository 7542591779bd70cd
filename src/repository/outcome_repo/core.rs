use crate::db::open_sqlite_connection;
use crate::domain::{OutcomeRecord, UploadOutcome};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub(super) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 批次汇总
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub batch_id: String,
    pub environment: String,
    pub recorded_at: NaiveDateTime,
    pub total: usize,
    pub succeeded: usize,
}

// ==========================================
// OutcomeRepository - 上传结果台账
// ==========================================
pub struct OutcomeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OutcomeRepository {
    pub(super) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 打开台账文件并建表
    ///
    /// # 参数
    /// - db_path: SQLite 文件路径
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        let repo = Self::new(Arc::new(Mutex::new(conn)));
        repo.ensure_schema()?;

        info!(db_path, "上传结果台账已打开");
        Ok(repo)
    }

    /// 新批次 ID
    pub fn new_batch_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub(super) fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 建表（已存在时跳过）
    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS upload_outcome (
                outcome_id INTEGER PRIMARY KEY AUTOINCREMENT,
                batch_id TEXT NOT NULL,
                environment TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                row_index INTEGER NOT NULL,
                result TEXT NOT NULL,
                message TEXT NOT NULL,
                entity_id INTEGER,
                uri TEXT NOT NULL,
                api_response TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_upload_outcome_batch
                ON upload_outcome(batch_id);
            "#,
        )?;

        Ok(())
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 在一个事务中写入整批结果
    ///
    /// # 参数
    /// - batch_id: 批次 ID
    /// - environment: 环境 ID
    /// - outcomes: 已完成记录的结果
    ///
    /// # 返回
    /// 写入条数
    pub fn batch_insert(
        &self,
        batch_id: &str,
        environment: &str,
        outcomes: &[UploadOutcome],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let recorded_at = Utc::now().naive_utc();

        for outcome in outcomes {
            let record = OutcomeRecord {
                batch_id: batch_id.to_string(),
                environment: environment.to_string(),
                recorded_at,
                outcome: outcome.clone(),
            };
            insert_row(&tx, &record)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(batch_id, count = outcomes.len(), "批次结果已写入台账");
        Ok(outcomes.len())
    }
}

fn insert_row(conn: &Connection, record: &OutcomeRecord) -> RepositoryResult<()> {
    let outcome = &record.outcome;

    conn.execute(
        r#"
        INSERT INTO upload_outcome (
            batch_id, environment, recorded_at, row_index, result,
            message, entity_id, uri, api_response
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            record.batch_id,
            record.environment,
            record.recorded_at.format(TIMESTAMP_FORMAT).to_string(),
            outcome.row_index as i64,
            outcome.result,
            outcome.message,
            outcome.entity_id,
            outcome.uri,
            outcome.api_response,
        ],
    )?;

    Ok(())
}
