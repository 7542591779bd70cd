// ==========================================
// ResourceItem 集成测试
// ==========================================
// 测试目标: 馆藏机构校验、预览、插入/更新上传
// ==========================================

mod test_helpers;

use snac_uploader::domain::{ModelType, Operation};
use snac_uploader::exporter::{ItemInput, ResourceItem, SnacSession, UploadItem};
use snac_uploader::TermSource;
use std::sync::Arc;
use test_helpers::{session, table, whole_table_input, MockSnacApi};

const RESOURCE_MAPPINGS: &[(&str, &str)] = &[
    ("id", "Resource ID"),
    ("type", "Resource Type"),
    ("title", "Title"),
    ("resource url", "Resource URL"),
    ("holding repository id", "Holding Repository ID"),
];

const RESOURCE_COLUMNS: &[&str] = &["id", "type", "title", "resource url", "holding repository id"];

fn resource_input(api: Arc<MockSnacApi>, id: &str) -> (Arc<SnacSession>, ItemInput) {
    let s = session(ModelType::Resource, RESOURCE_MAPPINGS, api);
    let t = table(
        RESOURCE_COLUMNS,
        &[&[id, "ArchivalResource", "Jacob Miller Papers", "http://x", "4"]],
    );
    (s.clone(), whole_table_input(s, t))
}

async fn resource_item(api: Arc<MockSnacApi>, id: &str) -> ResourceItem {
    ResourceItem::new(resource_input(api, id).1).await
}

#[tokio::test]
async fn test_missing_holding_repository_blocks_upload_json() {
    let api = Arc::new(MockSnacApi::new().with_missing_constellation(4));
    let (s, input) = resource_input(api.clone(), "");
    let item = ResourceItem::new(input).await;

    // 逐字构建没有错误，可生成 JSON
    assert!(item.preview_errors().is_empty());
    assert!(item.verbatim().upload_json().is_some());
    assert_eq!(item.verbatim().entity.repository_id(), Some(4));

    let mut built = item.build(s.cache.enable_remote()).await;
    built.verify_related_ids(&s.cache).await;

    assert!(built.upload_json().is_none());
    assert_eq!(
        built.errors.errors(),
        &["Holding Repository ID 4 not found in SNAC".to_string()]
    );

    let response = item.perform_upload().await;
    assert_eq!(response.result, "error");
    assert_eq!(response.message, "1. Holding Repository ID 4 not found in SNAC");
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn test_resource_preview() {
    let item = resource_item(Arc::new(MockSnacApi::new()), "").await;
    let html = item.preview_text();

    assert!(html.contains("Insert new Resource"));
    assert!(html.contains("Repository ID"));
    assert!(html.contains("https://snac-dev.iath.virginia.edu/view/4"));
    assert!(html.contains("<a href=\"http://x\" target=\"_blank\">http://x</a>"));
    assert!(html.contains("Jacob Miller Papers"));
}

#[tokio::test]
async fn test_insert_new_resource() {
    let api = Arc::new(MockSnacApi::new());
    let item = resource_item(api.clone(), "").await;

    let response = item.perform_upload().await;
    assert!(response.is_success());
    assert_eq!(response.id, 5001);
    assert_eq!(
        response.uri,
        "https://snac-dev.iath.virginia.edu/vocab_administrator/resources/5001"
    );

    assert_eq!(api.submitted_commands(), vec!["insert_resource"]);
    let submissions = api.submissions();
    let (_, payload) = &submissions[0];
    assert_eq!(payload["resource"]["title"], "Jacob Miller Papers");
    assert_eq!(payload["resource"]["link"], "http://x");
    assert_eq!(payload["resource"]["repository"]["id"], 4);
    assert_eq!(payload["resource"]["documentType"]["term"], "ArchivalResource");
}

#[tokio::test]
async fn test_update_existing_resource() {
    let api = Arc::new(MockSnacApi::new());
    let item = resource_item(api.clone(), "15").await;

    assert_eq!(item.verbatim().entity.operation, Some(Operation::Update));
    assert!(item.preview_text().contains("Edit Resource with ID: "));

    let response = item.perform_upload().await;
    assert!(response.is_success());
    assert_eq!(response.id, 15);
    assert_eq!(api.submitted_commands(), vec!["update_resource"]);

    // 资源自身与馆藏机构各校验一次
    assert_eq!(api.existence_call_count(), 2);
}

#[tokio::test]
async fn test_missing_own_resource_id() {
    let api = Arc::new(MockSnacApi::new().with_missing_resource(15));
    let item = resource_item(api.clone(), "15").await;

    let response = item.perform_validation().await;
    assert_eq!(response.message, "1. Resource ID 15 not found in SNAC");
}

#[tokio::test]
async fn test_required_fields_and_invalid_numbers() {
    let api = Arc::new(MockSnacApi::new());
    let s = session(ModelType::Resource, RESOURCE_MAPPINGS, api.clone());
    let t = table(RESOURCE_COLUMNS, &[&["", "ArchivalResource", "", "http://x", "four"]]);
    let item = ResourceItem::new(whole_table_input(s, t)).await;

    assert_eq!(
        item.preview_errors().errors(),
        &[
            "Invalid numeric field Holding Repository ID (column holding repository id): [four]"
                .to_string(),
            "Required field Title (column title) is blank for this record".to_string(),
        ]
    );

    let again = item.build(TermSource::Verbatim).await;
    assert_eq!(again.errors, item.verbatim().errors);
}
