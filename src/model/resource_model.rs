// ==========================================
// SNAC 数据上传工具 - Resource 字段模型
// ==========================================

use crate::domain::types::{ModelType, TermType};
use crate::model::field::{FieldRelation, FieldSpec, ModelFieldType};
use crate::model::snac_model::SnacModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceField {
    None,
    ResourceType,
    ResourceId,
    Title,
    ResourceUrl,
    HoldingRepositoryId,
    Abstract,
    Extent,
    Date,
    LanguageCode,
    ScriptCode,
}

pub type ResourceModel = SnacModel<ResourceField>;

use ResourceField as R;

static RESOURCE_FIELDS: &[FieldSpec<ResourceField>] = &[
    FieldSpec::new(R::ResourceType, "Resource Type")
        .required()
        .single()
        .controlled(TermType::DocumentType)
        .samples(&["ArchivalResource", "BibliographicResource", "DigitalArchivalResource"])
        .tooltip("Resource document type."),
    FieldSpec::new(R::ResourceId, "Resource ID")
        .single()
        .identifier()
        .previous_names(&["SNAC Resource ID"])
        .tooltip("SNAC identifier of the resource. Leave blank for a new resource."),
    FieldSpec::new(R::Title, "Title")
        .required()
        .single()
        .tooltip("Title of the resource."),
    FieldSpec::new(R::ResourceUrl, "Resource URL")
        .required()
        .single()
        .tooltip("URL of the local catalog description of the resource."),
    FieldSpec::new(R::HoldingRepositoryId, "Holding Repository ID")
        .required()
        .single()
        .identifier()
        .previous_names(&["Holding Repository SNAC ID"])
        .tooltip("SNAC identifier of the holding repository constellation."),
    FieldSpec::new(R::Abstract, "Abstract")
        .single()
        .tooltip("Brief description of the resource."),
    FieldSpec::new(R::Extent, "Extent")
        .single()
        .tooltip("Size of the resource."),
    FieldSpec::new(R::Date, "Date")
        .single()
        .tooltip("Date or date range of the resource."),
    FieldSpec::new(R::LanguageCode, "Language Code")
        .controlled(TermType::LanguageCode)
        .depends_on(&[FieldRelation::optional(R::ScriptCode)])
        .samples(&["eng", "ger", "jpn"])
        .tooltip("ISO 639 language code. Combines with a Script Code in the same row."),
    FieldSpec::new(R::ScriptCode, "Script Code")
        .controlled(TermType::ScriptCode)
        .samples(&["Latn", "Cyrl", "Grek"])
        .tooltip("ISO 15924 script code. Combines with a Language Code in the same row."),
];

impl ModelFieldType for ResourceField {
    const NONE: Self = ResourceField::None;
    const MODEL_TYPE: ModelType = ModelType::Resource;

    fn specs() -> &'static [FieldSpec<Self>] {
        RESOURCE_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::FieldVocabulary;

    #[test]
    fn test_required_resource_fields() {
        let model = ResourceModel::new();
        let required: Vec<&str> = model
            .fields()
            .filter(|f| f.is_required())
            .map(|f| f.name())
            .collect();
        assert_eq!(
            required,
            vec!["Resource Type", "Title", "Resource URL", "Holding Repository ID"]
        );
    }

    #[test]
    fn test_holding_repository_previous_name() {
        let model = ResourceModel::new();
        assert_eq!(
            model.field_type_for("Holding Repository SNAC ID"),
            R::HoldingRepositoryId
        );
        let field = model.model_field(R::HoldingRepositoryId).unwrap();
        assert_eq!(field.vocabulary(), FieldVocabulary::Identifier);
        assert!(field.is_single());
    }

    #[test]
    fn test_all_fields_single_except_languages() {
        let model = ResourceModel::new();
        for field in model.fields() {
            let multi = matches!(field.field_type(), R::LanguageCode | R::ScriptCode);
            assert_eq!(!field.is_single(), multi, "{}", field.name());
        }
    }
}
