// ==========================================
// 批量上传流程集成测试
// ==========================================
// 测试目标: CSV 解析 → 记录评估 → 批量校验/上传 → 结果列 → 台账
// ==========================================

mod test_helpers;

use snac_uploader::config::SnacEnvironment;
use snac_uploader::domain::ModelType;
use snac_uploader::engine::{CancellationFlag, SchemaEvaluator, UploadOrchestrator};
use snac_uploader::importer::UniversalFileParser;
use snac_uploader::repository::OutcomeRepository;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_helpers::{session, write_temp_file, MockSnacApi};

const CONSTELLATION_CSV: &str = "type,name,subject
person,\"Miller, Jacob\",Photography
,,Painting
family,Smith family,
corporateBody,Acme Corp,Wizardry
";

const CONSTELLATION_MAPPINGS: &[(&str, &str)] = &[
    ("type", "CPF Type"),
    ("name", "Name Entry"),
    ("subject", "Subject"),
];

struct Fixture {
    api: Arc<MockSnacApi>,
    evaluator: SchemaEvaluator,
    table: Arc<snac_uploader::Table>,
}

fn fixture() -> Fixture {
    let api = Arc::new(MockSnacApi::new().with_unknown_term("Wizardry"));
    let csv = write_temp_file(".csv", CONSTELLATION_CSV);
    let table = UniversalFileParser.parse(csv.path()).unwrap();

    Fixture {
        evaluator: SchemaEvaluator::new(session(
            ModelType::Constellation,
            CONSTELLATION_MAPPINGS,
            api.clone(),
        )),
        api,
        table: Arc::new(table),
    }
}

#[tokio::test]
async fn test_evaluate_groups_rows_into_records() {
    let f = fixture();
    assert_eq!(f.table.row_count(), 4);

    let items = f.evaluator.evaluate_records(f.table.clone(), None).await.unwrap();
    let rows: Vec<usize> = items.iter().map(|i| i.row_index()).collect();
    assert_eq!(rows, vec![0, 2, 3]);

    // 续行的主题并入第一条记录
    let first = items[0].to_json();
    assert_eq!(first["subjects"].as_array().map(|a| a.len()), Some(2));

    let limited = f.evaluator.evaluate_records(f.table.clone(), Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);

    // 评估只做逐字构建
    assert_eq!(f.api.vocabulary_call_count(), 0);
    assert_eq!(f.api.existence_call_count(), 0);
}

#[tokio::test]
async fn test_export_json_keys() {
    let f = fixture();
    let json = f.evaluator.export_json(f.table.clone()).await.unwrap();

    let constellations = json["constellations"].as_array().unwrap();
    assert_eq!(constellations.len(), 3);
    assert_eq!(constellations[2]["entityType"]["term"], "corporateBody");

    let api = Arc::new(MockSnacApi::new());
    let s = session(
        ModelType::Resource,
        &[("title", "Title"), ("type", "Resource Type")],
        api,
    );
    let table = test_helpers::table(&["title", "type"], &[&["Papers", "ArchivalResource"]]);
    let json = SchemaEvaluator::new(s).export_json(Arc::new(table)).await.unwrap();
    assert_eq!(json["resources"].as_array().map(|a| a.len()), Some(1));
    assert!(json.get("constellations").is_none());
}

#[tokio::test]
async fn test_upload_batch_outcomes_and_columns() {
    let f = fixture();
    let items = f.evaluator.evaluate_records(f.table.clone(), None).await.unwrap();

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let orchestrator = UploadOrchestrator::new(SnacEnvironment::development(), false)
        .with_progress(Arc::new(move |done, total| {
            assert_eq!(total, 3);
            counter.store(done, Ordering::SeqCst);
        }));

    let report = orchestrator.upload_batch(&items, &CancellationFlag::new()).await;
    assert!(!report.cancelled);
    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(seen.load(Ordering::SeqCst), 3);

    // 校验失败的记录不提交
    assert_eq!(
        f.api.submitted_commands(),
        vec!["insert_and_publish_constellation", "insert_and_publish_constellation"]
    );

    let failed = &report.outcomes[2];
    assert_eq!(failed.row_index, 3);
    assert_eq!(failed.result, "error");
    assert_eq!(
        failed.message,
        "1. Invalid controlled vocabulary field Subject (column subject): [Wizardry]"
    );
    assert_eq!(failed.entity_id, None);

    let mut table = (*f.table).clone();
    let names = orchestrator.apply_outcome_columns(&mut table, &report).unwrap();
    assert_eq!(
        names,
        vec![
            "*SNAC Development*: Result",
            "*SNAC Development*: Message",
            "*SNAC Development*: ID",
            "*SNAC Development*: Link",
        ]
    );

    assert_eq!(table.cell(0, "*SNAC Development*: Result"), "success");
    assert_eq!(table.cell(0, "*SNAC Development*: ID"), "9001");
    assert_eq!(
        table.cell(0, "*SNAC Development*: Link"),
        "https://snac-dev.iath.virginia.edu/view/9001"
    );
    // 续行不写结果
    assert_eq!(table.cell(1, "*SNAC Development*: Result"), "");
    assert_eq!(table.cell(3, "*SNAC Development*: Result"), "error");

    // 写出后重新读取
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("outcomes.csv");
    table.write_csv(&out).unwrap();
    let reread = UniversalFileParser.parse(&out).unwrap();
    assert_eq!(reread.columns.len(), 7);
    assert_eq!(reread.cell(2, "*SNAC Development*: ID"), "9001");
    assert_eq!(reread.cell(0, "name"), "Miller, Jacob");
}

#[tokio::test]
async fn test_cancel_at_record_boundary() {
    let f = fixture();
    let items = f.evaluator.evaluate_records(f.table.clone(), None).await.unwrap();

    let cancel = CancellationFlag::new();
    let flag = cancel.clone();
    let orchestrator = UploadOrchestrator::new(SnacEnvironment::development(), false)
        .with_progress(Arc::new(move |done, _| {
            if done == 1 {
                flag.cancel();
            }
        }));

    let report = orchestrator.upload_batch(&items, &cancel).await;
    assert!(report.cancelled);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(f.api.submitted_commands().len(), 1);

    let mut table = (*f.table).clone();
    let names = orchestrator.apply_outcome_columns(&mut table, &report).unwrap();
    assert!(names.is_empty());
    assert_eq!(table.columns.len(), 3);
}

#[tokio::test]
async fn test_cancel_before_start() {
    let f = fixture();
    let items = f.evaluator.evaluate_records(f.table.clone(), None).await.unwrap();

    let cancel = CancellationFlag::new();
    cancel.cancel();

    let orchestrator = UploadOrchestrator::new(SnacEnvironment::development(), false);
    let report = orchestrator.upload_batch(&items, &cancel).await;

    assert!(report.cancelled);
    assert!(report.outcomes.is_empty());
    assert!(f.api.submissions().is_empty());
}

#[tokio::test]
async fn test_validate_batch_never_submits() {
    let f = fixture();
    let items = f.evaluator.evaluate_records(f.table.clone(), None).await.unwrap();

    let orchestrator = UploadOrchestrator::new(SnacEnvironment::development(), true);
    let report = orchestrator.validate_batch(&items, &CancellationFlag::new()).await;

    assert_eq!(report.succeeded(), 2);
    assert!(f.api.submissions().is_empty());

    // 合成失败响应的原文与消息相同，API Response 列留空
    let columns = orchestrator.outcome_columns(&f.table, &report);
    let (name, values) = &columns[4];
    assert_eq!(name, "*SNAC Development*: API Response");
    assert_eq!(values, &vec!["success", "", "success", ""]);
}

#[tokio::test]
async fn test_upload_outcomes_recorded_in_ledger() {
    let f = fixture();
    let items = f.evaluator.evaluate_records(f.table.clone(), None).await.unwrap();
    let orchestrator = UploadOrchestrator::new(SnacEnvironment::development(), false);
    let report = orchestrator.upload_batch(&items, &CancellationFlag::new()).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("ledger").join("outcomes.db");
    let repo = OutcomeRepository::open(db_path.to_str().unwrap()).unwrap();

    let batch_id = OutcomeRepository::new_batch_id();
    let written = repo.batch_insert(&batch_id, "dev", &report.outcomes).unwrap();
    assert_eq!(written, 3);

    let stored = repo.find_by_batch(&batch_id).unwrap();
    let rows: Vec<usize> = stored.iter().map(|r| r.outcome.row_index).collect();
    assert_eq!(rows, vec![0, 2, 3]);
    assert_eq!(stored[0].outcome.entity_id, Some(9001));

    let batches = repo.list_batches().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].total, 3);
    assert_eq!(batches[0].succeeded, 2);
}
