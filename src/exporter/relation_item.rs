// ==========================================
// SNAC 数据上传工具 - Relation 条目
// ==========================================
// 职责: 将一条记录构建为仅携带关系的 Constellation
// 说明: 上传流程与 ConstellationItem 共用（签出 → 发布）
// ==========================================

use crate::api::SnacResponse;
use crate::cache::TermSource;
use crate::domain::{Constellation, ConstellationRelation, Operation, Resource, ResourceRelation};
use crate::exporter::constellation_item::{constellation_operation_text, upload_constellation};
use crate::exporter::field_validator::{FieldValidator, RelatedTerm};
use crate::exporter::preview::{html_link, html_ordered_list, render_preview};
use crate::exporter::upload_item::{BuiltItem, IdRole, ItemInput, SnacSession, UploadItem};
use crate::exporter::validation_errors::ValidationErrors;
use crate::model::RelationField as L;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub struct RelationItem {
    input: ItemInput,
    verbatim: BuiltItem<Constellation>,
}

impl RelationItem {
    /// 创建条目并执行逐字构建
    pub async fn new(input: ItemInput) -> Self {
        let verbatim = build_relations(&input, TermSource::Verbatim).await;
        Self { input, verbatim }
    }

    pub fn verbatim(&self) -> &BuiltItem<Constellation> {
        &self.verbatim
    }

    pub async fn build(&self, source: TermSource<'_>) -> BuiltItem<Constellation> {
        build_relations(&self.input, source).await
    }

    async fn validated_build(&self) -> BuiltItem<Constellation> {
        let cache = &self.input.session.cache;
        let mut built = self.build(cache.enable_remote()).await;
        built.verify_related_ids(cache).await;
        built
    }
}

/// 构建关系 Constellation
async fn build_relations(input: &ItemInput, source: TermSource<'_>) -> BuiltItem<Constellation> {
    let session = input.session.as_ref();
    let model = session.relation_model.as_ref();
    let mappings = session.column_mappings();
    let table = input.table.as_ref();

    let mut v = FieldValidator::new(model, mappings, table, source);
    let mut built = BuiltItem::new(Constellation::for_insert());

    for (column, snac_field) in mappings {
        let field = model.field_type_for(snac_field);
        if field == L::None {
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

            let con = &mut built.entity;

            match field {
                L::CpfType => {
                    if let Some(term) = v.get_term(field, value).await {
                        con.entity_type = Some(term);
                    }
                }

                L::CpfId => {
                    if let Some(id) = v.get_identifier(field, value) {
                        con.id = Some(id);
                        con.operation = Some(Operation::Update);
                        built.queue_id(IdRole::Cpf, id);
                    }
                }

                L::RelatedCpfId => {
                    let target = match v.get_identifier(field, value) {
                        Some(id) => id,
                        None => continue,
                    };

                    let relation_type = match v
                        .get_related_term(row, field, value, L::CpfToCpfRelationType)
                        .await
                    {
                        RelatedTerm::Resolved(term) => Some(term),
                        RelatedTerm::Absent => None,
                        RelatedTerm::Invalid => continue,
                    };

                    con.relations.push(ConstellationRelation {
                        source_constellation: None,
                        target_constellation: target,
                        relation_type,
                        operation: Operation::Insert,
                    });
                    built.queue_id(IdRole::RelatedCpf, target);
                }

                L::RelatedResourceId => {
                    let target = match v.get_identifier(field, value) {
                        Some(id) => id,
                        None => continue,
                    };

                    let role = match v
                        .get_related_term(row, field, value, L::CpfToResourceRelationType)
                        .await
                    {
                        RelatedTerm::Resolved(term) => Some(term),
                        RelatedTerm::Absent => None,
                        RelatedTerm::Invalid => continue,
                    };

                    con.resource_relations.push(ResourceRelation {
                        resource: Resource::reference(target),
                        role,
                        operation: Operation::Insert,
                    });
                    built.queue_id(IdRole::RelatedResource, target);
                }

                // 随关联 ID 读取
                L::CpfToCpfRelationType | L::CpfToResourceRelationType | L::None => {}
            }
        }
    }

    v.finalize_all();

    // 关系的源端在扫描结束后才确定
    let source_id = built.entity.id;
    for relation in &mut built.entity.relations {
        relation.source_constellation = source_id;
    }

    built.errors = v.into_errors();
    debug!(
        errors = built.errors.len(),
        relations = built.entity.relations.len(),
        resource_relations = built.entity.resource_relations.len(),
        remote = source.is_remote(),
        "Relation 构建完成"
    );
    built
}

fn preview_fields(
    con: &Constellation,
    mappings: &BTreeMap<String, String>,
    session: &SnacSession,
) -> BTreeMap<String, String> {
    let model = session.relation_model.as_ref();
    let env = &session.environment;
    let mut out = BTreeMap::new();

    for snac_field in mappings.values() {
        let field = model.field_type_for(snac_field);
        let key = model.name_of(field).to_string();

        match field {
            L::CpfType => {
                if let Some(term) = &con.entity_type {
                    out.insert(key, term.term.clone());
                }
            }

            L::RelatedCpfId => {
                let relations: Vec<String> = con
                    .relations
                    .iter()
                    .map(|r| {
                        let id = r.target_constellation;
                        let mut text = html_link(&env.url_for_constellation(id), &id.to_string());
                        if let Some(t) = &r.relation_type {
                            text.push_str(&format!(" ({})", t.term));
                        }
                        text
                    })
                    .collect();
                out.insert(key, html_ordered_list(&relations));
            }

            L::RelatedResourceId => {
                let relations: Vec<String> = con
                    .resource_relations
                    .iter()
                    .map(|r| {
                        let id = r.resource.id.unwrap_or_default();
                        let mut text = html_link(&env.url_for_resource(id), &id.to_string());
                        if let Some(role) = &r.role {
                            text.push_str(&format!(" ({})", role.term));
                        }
                        text
                    })
                    .collect();
                out.insert(key, html_ordered_list(&relations));
            }

            _ => {}
        }
    }

    out
}

#[async_trait]
impl UploadItem for RelationItem {
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
        info!(row = self.row_index(), "校验 Relation");
        self.validated_build().await.validation_response()
    }

    async fn perform_upload(&self) -> SnacResponse {
        info!(row = self.row_index(), "准备上传 Relation");

        let built = self.validated_build().await;
        if built.errors.has_errors() {
            return built.validation_response();
        }

        upload_constellation(&self.input.session, built.entity).await
    }
}
