// ==========================================
// SNAC 数据上传工具 - Constellation 条目
// ==========================================
// 职责: 将一条记录构建为 Constellation（人物/机构/家族）
// 流程: 逐字构建（预览） → 远端校验构建 → 签出（更新时） → 发布
// ==========================================

use crate::api::{commands, ApiError, SnacResponse};
use crate::cache::TermSource;
use crate::config::SnacEnvironment;
use crate::domain::{
    BiogHist, Constellation, Language, NameEntry, Operation, Place, SameAs, SnacDate, Source,
    TermEntry, TermType, PREFERRED_NAME_SCORE, VARIANT_NAME_SCORE,
};
use crate::exporter::field_validator::{FieldValidator, RelatedTerm};
use crate::exporter::preview::{
    date_text, html_link, html_ordered_list, language_list, render_preview,
};
use crate::exporter::upload_item::{BuiltItem, IdRole, ItemInput, SnacSession, UploadItem};
use crate::exporter::validation_errors::ValidationErrors;
use crate::model::ConstellationField as C;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument};

/// External Related CPF URL 固定使用的记录类型
const SAME_AS_RECORD_TYPE: &str = "sameAs";

pub struct ConstellationItem {
    input: ItemInput,
    verbatim: BuiltItem<Constellation>,
}

impl ConstellationItem {
    /// 创建条目并执行逐字构建
    pub async fn new(input: ItemInput) -> Self {
        let verbatim = build_constellation(&input, TermSource::Verbatim).await;
        Self { input, verbatim }
    }

    pub fn verbatim(&self) -> &BuiltItem<Constellation> {
        &self.verbatim
    }

    /// 按指定词项来源构建
    pub async fn build(&self, source: TermSource<'_>) -> BuiltItem<Constellation> {
        build_constellation(&self.input, source).await
    }

    async fn validated_build(&self) -> BuiltItem<Constellation> {
        let cache = &self.input.session.cache;
        let mut built = self.build(cache.enable_remote()).await;
        built.verify_related_ids(cache).await;
        built
    }
}

// ==========================================
// 构建
// ==========================================

/// 构建 Constellation
///
/// # 参数
/// - input: 会话、表格与记录区间
/// - source: 逐字 / 远端校验
///
/// # 返回
/// 实体 + 校验错误 + 待校验 ID
async fn build_constellation(input: &ItemInput, source: TermSource<'_>) -> BuiltItem<Constellation> {
    let session = input.session.as_ref();
    let model = session.constellation_model.as_ref();
    let mappings = session.column_mappings();
    let table = input.table.as_ref();

    let mut v = FieldValidator::new(model, mappings, table, source);
    let mut built = BuiltItem::new(Constellation::for_insert());
    let mut preferred_assigned = false;

    for (column, snac_field) in mappings {
        let field = model.field_type_for(snac_field);
        if field == C::None {
            debug!(column = %column, snac_field = %snac_field, "未识别的字段，忽略该列");
            continue;
        }

        for row in input.record.rows() {
            let value = table.cell(row, column);
            if value.is_empty() {
                continue;
            }

            // 无效或将被跳过的值同样计数
            if !v.check_and_count_field(field, value, row) {
                continue;
            }

            let con = &mut built.entity;

            match field {
                C::CpfType => {
                    if let Some(term) = v.get_term(field, value).await {
                        con.entity_type = Some(term);
                    }
                }

                C::CpfId => {
                    if let Some(id) = v.get_identifier(field, value) {
                        con.id = Some(id);
                        con.operation = Some(Operation::Update);
                        built.queue_id(IdRole::Cpf, id);
                    }
                }

                C::NameEntry => {
                    let score = if preferred_assigned {
                        VARIANT_NAME_SCORE
                    } else {
                        preferred_assigned = true;
                        PREFERRED_NAME_SCORE
                    };
                    con.name_entries.push(NameEntry {
                        original: value.to_string(),
                        preference_score: score,
                        operation: Operation::Insert,
                    });
                }

                C::VariantNameEntry => {
                    con.name_entries.push(NameEntry {
                        original: value.to_string(),
                        preference_score: VARIANT_NAME_SCORE,
                        operation: Operation::Insert,
                    });
                }

                C::ExistDate => {
                    let date_type = match v
                        .get_related_term(row, field, value, C::ExistDateType)
                        .await
                    {
                        RelatedTerm::Resolved(term) => term,
                        _ => continue,
                    };

                    let note = v
                        .related_cell_value(row, C::ExistDateDescriptiveNote)
                        .filter(|n| !n.is_empty());

                    con.date_list.push(SnacDate::single(value, date_type, note));
                }

                C::Subject | C::Occupation | C::Activity => {
                    if let Some(term) = v.get_term(field, value).await {
                        let entry = TermEntry::insert(term);
                        match field {
                            C::Subject => con.subjects.push(entry),
                            C::Occupation => con.occupations.push(entry),
                            _ => con.activities.push(entry),
                        }
                    }
                }

                C::Place => {
                    let place_type = match v
                        .get_related_term(row, field, value, C::PlaceType)
                        .await
                    {
                        RelatedTerm::Resolved(term) => Some(term),
                        RelatedTerm::Absent => None,
                        RelatedTerm::Invalid => continue,
                    };

                    let role = match v
                        .get_related_term(row, field, value, C::PlaceRole)
                        .await
                    {
                        RelatedTerm::Resolved(term) => Some(term),
                        RelatedTerm::Absent => None,
                        RelatedTerm::Invalid => continue,
                    };

                    con.places.push(Place {
                        original: value.to_string(),
                        place_type,
                        role,
                        operation: Operation::Insert,
                    });
                }

                C::LanguageCode => {
                    let language = match v.get_term(field, value).await {
                        Some(term) => term,
                        None => continue,
                    };

                    let script = v
                        .get_related_term(row, field, value, C::ScriptCode)
                        .await;
                    if script.is_invalid() {
                        continue;
                    }

                    con.languages_used.push(Language {
                        language: Some(language),
                        script: script.into_option(),
                        operation: Operation::Insert,
                    });
                }

                C::ScriptCode => {
                    // 同行有语言代码时已在 LanguageCode 中处理
                    let has_language = v
                        .related_cell_value(row, C::LanguageCode)
                        .map(|l| !l.is_empty())
                        .unwrap_or(false);
                    if has_language {
                        continue;
                    }

                    if let Some(script) = v.get_term(field, value).await {
                        con.languages_used.push(Language {
                            language: None,
                            script: Some(script),
                            operation: Operation::Insert,
                        });
                    }
                }

                C::BiogHist => {
                    con.biog_hists.push(BiogHist {
                        text: value.to_string(),
                        operation: Operation::Insert,
                    });
                }

                C::ExternalRelatedCpfUrl => {
                    let record_type = v
                        .get_fixed_term(
                            "Record Type",
                            SAME_AS_RECORD_TYPE,
                            TermType::RecordType,
                            field,
                            value,
                        )
                        .await;

                    if let Some(term) = record_type {
                        con.same_as_relations.push(SameAs {
                            uri: value.to_string(),
                            relation_type: term,
                            operation: Operation::Insert,
                        });
                    }
                }

                C::SourceCitation => {
                    let uri = v
                        .related_cell_value(row, C::SourceCitationUrl)
                        .filter(|u| !u.is_empty());
                    let text = v
                        .related_cell_value(row, C::SourceCitationFoundData)
                        .filter(|t| !t.is_empty());

                    con.sources.push(Source {
                        citation: value.to_string(),
                        uri,
                        text,
                        operation: Operation::Insert,
                    });
                }

                // 随主字段读取
                C::ExistDateType
                | C::ExistDateDescriptiveNote
                | C::PlaceRole
                | C::PlaceType
                | C::SourceCitationUrl
                | C::SourceCitationFoundData
                | C::None => {}
            }
        }
    }

    v.finalize_all();

    collapse_date_pair(&mut built.entity);

    built.errors = v.into_errors();
    debug!(
        errors = built.errors.len(),
        remote = source.is_remote(),
        "Constellation 构建完成"
    );
    built
}

/// 恰好两个日期时合并为区间
pub fn collapse_date_pair(con: &mut Constellation) {
    if con.date_list.len() == 2 {
        let range = SnacDate::range(&con.date_list[0], &con.date_list[1]);
        con.date_list = vec![range];
    }
}

// ==========================================
// 预览
// ==========================================

fn preview_fields(
    con: &Constellation,
    mappings: &BTreeMap<String, String>,
    session: &SnacSession,
) -> BTreeMap<String, String> {
    let model = session.constellation_model.as_ref();
    let mut out = BTreeMap::new();

    for snac_field in mappings.values() {
        let field = model.field_type_for(snac_field);
        let key = model.name_of(field).to_string();

        match field {
            C::CpfType => {
                if let Some(term) = &con.entity_type {
                    out.insert(key, term.term.clone());
                }
            }

            C::NameEntry | C::VariantNameEntry => {
                let names: Vec<String> = con
                    .name_entries
                    .iter()
                    .map(|n| {
                        if n.preference_score == PREFERRED_NAME_SCORE {
                            format!("{} (preferred)", n.original)
                        } else {
                            format!("{} (variant)", n.original)
                        }
                    })
                    .collect();
                out.insert(model.name_of(C::NameEntry).to_string(), html_ordered_list(&names));
            }

            C::ExistDate => {
                let dates: Vec<String> = con.date_list.iter().map(date_text).collect();
                out.insert(key, html_ordered_list(&dates));
            }

            C::Subject => {
                out.insert(key, term_list(&con.subjects));
            }

            C::Occupation => {
                out.insert(key, term_list(&con.occupations));
            }

            C::Activity => {
                out.insert(key, term_list(&con.activities));
            }

            C::Place => {
                let places: Vec<String> = con
                    .places
                    .iter()
                    .map(|p| {
                        let mut text = p.original.clone();
                        if let Some(role) = &p.role {
                            text.push_str(&format!(" ({})", role.term));
                        }
                        if let Some(place_type) = &p.place_type {
                            text.push_str(&format!(" ({})", place_type.term));
                        }
                        text
                    })
                    .collect();
                out.insert(key, html_ordered_list(&places));
            }

            C::LanguageCode | C::ScriptCode => {
                if let Some(list) = language_list(&con.languages_used) {
                    out.insert(model.name_of(C::LanguageCode).to_string(), list);
                }
            }

            C::BiogHist => {
                let texts: Vec<&str> = con.biog_hists.iter().map(|b| b.text.as_str()).collect();
                out.insert(key, html_ordered_list(&texts));
            }

            C::SourceCitation => {
                let sources: Vec<String> = con
                    .sources
                    .iter()
                    .map(|s| {
                        let mut text = s.citation.clone();
                        if let Some(uri) = &s.uri {
                            text.push_str(&format!(" ({})", html_link(uri, uri)));
                        }
                        if let Some(found) = &s.text {
                            text.push_str(&format!(" (Found Data: {})", found));
                        }
                        text
                    })
                    .collect();
                out.insert(key, html_ordered_list(&sources));
            }

            C::ExternalRelatedCpfUrl => {
                let links: Vec<String> = con
                    .same_as_relations
                    .iter()
                    .map(|s| html_link(&s.uri, &s.uri))
                    .collect();
                out.insert(key, html_ordered_list(&links));
            }

            _ => {}
        }
    }

    out
}

fn term_list(entries: &[TermEntry]) -> String {
    let terms: Vec<&str> = entries.iter().map(|e| e.term.term.as_str()).collect();
    html_ordered_list(&terms)
}

/// 操作说明行
pub(crate) fn constellation_operation_text(con: &Constellation, env: &SnacEnvironment) -> String {
    match con.existing_id().filter(|_| con.is_update()) {
        Some(id) => format!(
            "Edit Constellation with ID: {}",
            html_link(&env.url_for_constellation(id), &id.to_string())
        ),
        None => "Insert new Constellation".to_string(),
    }
}

// ==========================================
// 上传
// ==========================================

/// 上传 Constellation（有 ID 时先签出再发布）
///
/// # 返回
/// - 签出未返回 constellation: 签出响应
/// - 否则: 发布响应
#[instrument(skip(session, con), fields(id = ?con.existing_id()))]
pub(crate) async fn upload_constellation(session: &SnacSession, mut con: Constellation) -> SnacResponse {
    let env = &session.environment;

    if let Some(id) = con.existing_id() {
        info!(id, "签出已有 Constellation");

        let checkout = SnacResponse::from_transport(
            session
                .api
                .submit(commands::EDIT, json!({ "constellationid": id }))
                .await,
            env,
        );

        if checkout.constellation().is_none() {
            error!(id, result = %checkout.result, message = %checkout.message, "Constellation 签出失败");
            return checkout;
        }

        con.operation = Some(Operation::Update);
        if checkout.id > 0 {
            con.id = Some(checkout.id);
        }
        con.version = (checkout.version > 0).then_some(checkout.version);
        con.ark = (!checkout.ark.is_empty()).then(|| checkout.ark.clone());
    }

    let payload = match serde_json::to_value(&con) {
        Ok(payload) => payload,
        Err(e) => return SnacResponse::from_transport(Err(ApiError::from(e)), env),
    };

    info!("发布 Constellation");
    let response = SnacResponse::from_transport(
        session
            .api
            .submit(
                commands::INSERT_AND_PUBLISH_CONSTELLATION,
                json!({ "constellation": payload }),
            )
            .await,
        env,
    );

    info!(result = %response.result, id = response.id, "Constellation 上传完成");
    response
}

// ==========================================
// UploadItem 实现
// ==========================================
#[async_trait]
impl UploadItem for ConstellationItem {
    fn preview_text(&self) -> String {
        let session = self.input.session.as_ref();
        let con = &self.verbatim.entity;

        render_preview(
            preview_fields(con, session.column_mappings(), session),
            constellation_operation_text(con, &session.environment),
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
        info!(row = self.row_index(), "校验 Constellation");
        self.validated_build().await.validation_response()
    }

    async fn perform_upload(&self) -> SnacResponse {
        info!(row = self.row_index(), "准备上传 Constellation");

        let built = self.validated_build().await;
        if built.errors.has_errors() {
            return built.validation_response();
        }

        upload_constellation(&self.input.session, built.entity).await
    }
}
