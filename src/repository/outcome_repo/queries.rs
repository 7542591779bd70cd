use super::core::{BatchSummary, OutcomeRepository, TIMESTAMP_FORMAT};
use crate::domain::{OutcomeRecord, UploadOutcome};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, Result as SqliteResult, Row};

impl OutcomeRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询批次的全部结果（按行号排序）
    pub fn find_by_batch(&self, batch_id: &str) -> RepositoryResult<Vec<OutcomeRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, environment, recorded_at, row_index, result,
                   message, entity_id, uri, api_response
            FROM upload_outcome
            WHERE batch_id = ?
            ORDER BY row_index ASC, outcome_id ASC
            "#,
        )?;

        let records = stmt
            .query_map(params![batch_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }

    /// 批次列表（最新在前）
    pub fn list_batches(&self) -> RepositoryResult<Vec<BatchSummary>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT batch_id, environment, MIN(recorded_at), COUNT(*),
                   SUM(CASE WHEN result LIKE '%success%' THEN 1 ELSE 0 END)
            FROM upload_outcome
            GROUP BY batch_id, environment
            ORDER BY MIN(recorded_at) DESC, MIN(outcome_id) DESC
            "#,
        )?;

        let batches = stmt
            .query_map([], |row| {
                let recorded_at_str: String = row.get(2)?;
                let total: i64 = row.get(3)?;
                let succeeded: i64 = row.get(4)?;

                Ok(BatchSummary {
                    batch_id: row.get(0)?,
                    environment: row.get(1)?,
                    recorded_at: parse_timestamp(&recorded_at_str, 2)?,
                    total: total as usize,
                    succeeded: succeeded as usize,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(batches)
    }
}

fn map_row(row: &Row) -> SqliteResult<OutcomeRecord> {
    let recorded_at_str: String = row.get(2)?;
    let row_index: i64 = row.get(3)?;

    Ok(OutcomeRecord {
        batch_id: row.get(0)?,
        environment: row.get(1)?,
        recorded_at: parse_timestamp(&recorded_at_str, 2)?,
        outcome: UploadOutcome {
            row_index: row_index as usize,
            result: row.get(4)?,
            message: row.get(5)?,
            entity_id: row.get(6)?,
            uri: row.get(7)?,
            api_response: row.get(8)?,
        },
    })
}

fn parse_timestamp(value: &str, column: usize) -> SqliteResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
