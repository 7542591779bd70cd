// ==========================================
// SNAC 数据上传工具 - Resource 条目
// ==========================================
// 职责: 将一条记录构建为 Resource（档案资源）
// 流程: 逐字构建（预览） → 远端校验构建 + ID 存在性校验 → 插入/更新
// ==========================================

use crate::api::{commands, ApiError, SnacResponse};
use crate::cache::TermSource;
use crate::config::SnacEnvironment;
use crate::domain::{Constellation, Language, Operation, Resource};
use crate::exporter::field_validator::FieldValidator;
use crate::exporter::preview::{html_link, language_list, render_preview};
use crate::exporter::upload_item::{BuiltItem, IdRole, ItemInput, SnacSession, UploadItem};
use crate::exporter::validation_errors::ValidationErrors;
use crate::model::ResourceField as R;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// 预览中馆藏机构一行的字段名
const REPOSITORY_PREVIEW_KEY: &str = "Repository ID";

pub struct ResourceItem {
    input: ItemInput,
    verbatim: BuiltItem<Resource>,
}

impl ResourceItem {
    /// 创建条目并执行逐字构建
    pub async fn new(input: ItemInput) -> Self {
        let verbatim = build_resource(&input, TermSource::Verbatim).await;
        Self { input, verbatim }
    }

    pub fn verbatim(&self) -> &BuiltItem<Resource> {
        &self.verbatim
    }

    pub async fn build(&self, source: TermSource<'_>) -> BuiltItem<Resource> {
        build_resource(&self.input, source).await
    }

    async fn validated_build(&self) -> BuiltItem<Resource> {
        let cache = &self.input.session.cache;
        let mut built = self.build(cache.enable_remote()).await;
        built.verify_related_ids(cache).await;
        built
    }
}

/// 构建 Resource
///
/// # 参数
/// - input: 会话、表格与记录区间
/// - source: 逐字 / 远端校验
async fn build_resource(input: &ItemInput, source: TermSource<'_>) -> BuiltItem<Resource> {
    let session = input.session.as_ref();
    let model = session.resource_model.as_ref();
    let mappings = session.column_mappings();
    let table = input.table.as_ref();

    let mut v = FieldValidator::new(model, mappings, table, source);
    let mut built = BuiltItem::new(Resource::for_insert());

    for (column, snac_field) in mappings {
        let field = model.field_type_for(snac_field);
        if field == R::None {
            debug!(column = %column, snac_field = %snac_field, "未识别的字段，忽略该列");
            continue;
        }

        for row in input.record.rows() {
            let value = table.cell(row, column);
            if value.is_empty() {
                continue;
            }

            if !v.check_and_count_field(field, value, row) {
                continue;
            }

            let res = &mut built.entity;

            match field {
                R::ResourceType => {
                    if let Some(term) = v.get_term(field, value).await {
                        res.document_type = Some(term);
                    }
                }

                R::ResourceId => {
                    if let Some(id) = v.get_identifier(field, value) {
                        res.id = Some(id);
                        res.operation = Some(Operation::Update);
                        built.queue_id(IdRole::Resource, id);
                    }
                }

                R::Title => res.title = Some(value.to_string()),
                R::ResourceUrl => res.link = Some(value.to_string()),
                R::Abstract => res.abstract_text = Some(value.to_string()),
                R::Extent => res.extent = Some(value.to_string()),
                R::Date => res.date = Some(value.to_string()),

                R::HoldingRepositoryId => {
                    if let Some(id) = v.get_identifier(field, value) {
                        res.repository = Some(Box::new(Constellation::reference(id)));
                        built.queue_id(IdRole::HoldingRepository, id);
                    }
                }

                R::LanguageCode => {
                    let language = match v.get_term(field, value).await {
                        Some(term) => term,
                        None => continue,
                    };

                    let script = v
                        .get_related_term(row, field, value, R::ScriptCode)
                        .await;
                    if script.is_invalid() {
                        continue;
                    }

                    res.languages.push(Language {
                        language: Some(language),
                        script: script.into_option(),
                        operation: Operation::Insert,
                    });
                }

                R::ScriptCode => {
                    let has_language = v
                        .related_cell_value(row, R::LanguageCode)
                        .map(|l| !l.is_empty())
                        .unwrap_or(false);
                    if has_language {
                        continue;
                    }

                    if let Some(script) = v.get_term(field, value).await {
                        res.languages.push(Language {
                            language: None,
                            script: Some(script),
                            operation: Operation::Insert,
                        });
                    }
                }

                R::None => {}
            }
        }
    }

    v.finalize_all();

    built.errors = v.into_errors();
    debug!(
        errors = built.errors.len(),
        remote = source.is_remote(),
        "Resource 构建完成"
    );
    built
}

// ==========================================
// 预览
// ==========================================

fn preview_fields(
    res: &Resource,
    mappings: &BTreeMap<String, String>,
    session: &SnacSession,
) -> BTreeMap<String, String> {
    let model = session.resource_model.as_ref();
    let mut out = BTreeMap::new();

    for snac_field in mappings.values() {
        let field = model.field_type_for(snac_field);
        let key = model.name_of(field).to_string();

        let value = match field {
            R::ResourceType => res.document_type.as_ref().map(|t| t.term.clone()),
            R::Title => res.title.clone(),
            R::ResourceUrl => res.link.as_ref().map(|l| html_link(l, l)),
            R::Abstract => res.abstract_text.clone(),
            R::Extent => res.extent.clone(),
            R::Date => res.date.clone(),
            R::LanguageCode | R::ScriptCode => {
                if let Some(list) = language_list(&res.languages) {
                    out.insert(model.name_of(R::LanguageCode).to_string(), list);
                }
                None
            }
            R::HoldingRepositoryId => {
                if let Some(id) = res.repository_id().filter(|id| *id > 0) {
                    out.insert(
                        REPOSITORY_PREVIEW_KEY.to_string(),
                        html_link(&session.environment.url_for_constellation(id), &id.to_string()),
                    );
                }
                None
            }
            R::ResourceId | R::None => None,
        };

        if let Some(value) = value {
            out.insert(key, value);
        }
    }

    out
}

fn resource_operation_text(res: &Resource, env: &SnacEnvironment) -> String {
    match res.existing_id().filter(|_| res.is_update()) {
        Some(id) => format!(
            "Edit Resource with ID: {}",
            html_link(&env.url_for_resource(id), &id.to_string())
        ),
        None => "Insert new Resource".to_string(),
    }
}

// ==========================================
// 上传
// ==========================================

/// 提交 Resource（有 ID 时更新，否则插入）
#[instrument(skip(session, res), fields(id = ?res.existing_id()))]
async fn upload_resource(session: &SnacSession, res: &Resource) -> SnacResponse {
    let env = &session.environment;

    let command = if res.is_update() && res.existing_id().is_some() {
        commands::UPDATE_RESOURCE
    } else {
        commands::INSERT_RESOURCE
    };

    let payload = match serde_json::to_value(res) {
        Ok(payload) => payload,
        Err(e) => return SnacResponse::from_transport(Err(ApiError::from(e)), env),
    };

    info!(command, "提交 Resource");
    let response = SnacResponse::from_transport(
        session.api.submit(command, json!({ "resource": payload })).await,
        env,
    );

    info!(result = %response.result, id = response.id, "Resource 上传完成");
    response
}

// ==========================================
// UploadItem 实现
// ==========================================
#[async_trait]
impl UploadItem for ResourceItem {
    fn preview_text(&self) -> String {
        let session = self.input.session.as_ref();
        let res = &self.verbatim.entity;

        render_preview(
            preview_fields(res, session.column_mappings(), session),
            resource_operation_text(res, &session.environment),
            &self.verbatim.errors,
        )
    }

    fn row_index(&self) -> usize {
        self.input.record.from_row
    }

    fn to_json(&self) -> Value {
        self.verbatim.entity_json()
    }

    fn preview_errors(&self) -> &ValidationErrors {
        &self.verbatim.errors
    }

    async fn perform_validation(&self) -> SnacResponse {
        info!(row = self.row_index(), "校验 Resource");
        self.validated_build().await.validation_response()
    }

    async fn perform_upload(&self) -> SnacResponse {
        info!(row = self.row_index(), "准备上传 Resource");

        let built = self.validated_build().await;
        if built.errors.has_errors() {
            return built.validation_response();
        }

        upload_resource(&self.input.session, &built.entity).await
    }
}
