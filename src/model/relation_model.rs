// ==========================================
// SNAC 数据上传工具 - Relation 字段模型
// ==========================================
// 职责: CPF-CPF / CPF-资源 关系 schema 的字段表
// ==========================================

use crate::domain::types::{ModelType, TermType};
use crate::model::field::{FieldRelation, FieldSpec, ModelFieldType};
use crate::model::snac_model::SnacModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationField {
    None,
    CpfType,
    CpfId,
    CpfToCpfRelationType,
    RelatedCpfId,
    CpfToResourceRelationType,
    RelatedResourceId,
}

pub type RelationModel = SnacModel<RelationField>;

use RelationField as L;

static RELATION_FIELDS: &[FieldSpec<RelationField>] = &[
    FieldSpec::new(L::CpfType, "CPF Type")
        .required()
        .single()
        .controlled(TermType::EntityType)
        .samples(&["person", "corporateBody", "family"])
        .tooltip("Type of the source CPF entity."),
    FieldSpec::new(L::CpfId, "CPF ID")
        .single()
        .identifier()
        .previous_names(&["SNAC CPF ID"])
        .tooltip("SNAC identifier of the source CPF entity."),
    FieldSpec::new(L::CpfToCpfRelationType, "CPF to CPF Relation Type")
        .controlled(TermType::RelationType)
        .samples(&["associatedWith", "correspondedWith"])
        .tooltip("Nature of the relation to the Related CPF ID in the same row."),
    FieldSpec::new(L::RelatedCpfId, "Related CPF ID")
        .identifier()
        .previous_names(&["Related SNAC CPF ID"])
        .depends_on(&[FieldRelation::required(L::CpfToCpfRelationType)])
        .tooltip("SNAC identifier of a related CPF entity."),
    FieldSpec::new(L::CpfToResourceRelationType, "CPF to Resource Relation Type")
        .controlled(TermType::DocumentRole)
        .samples(&["creatorOf", "referencedIn", "editorOf", "contributorOf"])
        .tooltip("Role of the CPF entity in the Resource ID in the same row."),
    FieldSpec::new(L::RelatedResourceId, "Resource ID")
        .identifier()
        .previous_names(&["SNAC Resource ID"])
        .depends_on(&[FieldRelation::required(L::CpfToResourceRelationType)])
        .tooltip("SNAC identifier of a related resource."),
];

impl ModelFieldType for RelationField {
    const NONE: Self = RelationField::None;
    const MODEL_TYPE: ModelType = ModelType::Relation;

    fn specs() -> &'static [FieldSpec<Self>] {
        RELATION_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_ids_require_relation_types() {
        let model = RelationModel::new();

        let cpf = model.model_field(L::RelatedCpfId).unwrap();
        assert_eq!(cpf.required_dependencies(), vec![L::CpfToCpfRelationType]);

        let relation_type = model.model_field(L::CpfToResourceRelationType).unwrap();
        assert_eq!(relation_type.required_dependents(), vec![L::RelatedResourceId]);
    }

    #[test]
    fn test_resource_id_names() {
        let model = RelationModel::new();
        assert_eq!(model.field_type_for("Resource ID"), L::RelatedResourceId);
        assert_eq!(model.field_type_for("SNAC Resource ID"), L::RelatedResourceId);
        assert_eq!(model.field_type_for("Related SNAC CPF ID"), L::RelatedCpfId);
    }
}
