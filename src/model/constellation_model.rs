// ==========================================
// SNAC 数据上传工具 - Constellation 字段模型
// ==========================================
// 职责: Constellation schema 的字段表
// ==========================================

use crate::domain::types::{ModelType, TermType};
use crate::model::field::{FieldRelation, FieldSpec, ModelFieldType};
use crate::model::snac_model::SnacModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstellationField {
    None,
    CpfType,
    CpfId,
    NameEntry,
    VariantNameEntry,
    ExistDate,
    ExistDateType,
    ExistDateDescriptiveNote,
    Subject,
    Place,
    PlaceRole,
    PlaceType,
    Occupation,
    Activity,
    LanguageCode,
    ScriptCode,
    BiogHist,
    ExternalRelatedCpfUrl,
    SourceCitation,
    SourceCitationUrl,
    SourceCitationFoundData,
}

pub type ConstellationModel = SnacModel<ConstellationField>;

use ConstellationField as C;

static CONSTELLATION_FIELDS: &[FieldSpec<ConstellationField>] = &[
    FieldSpec::new(C::CpfType, "CPF Type")
        .required()
        .single()
        .controlled(TermType::EntityType)
        .samples(&["person", "corporateBody", "family"])
        .tooltip("Type of CPF entity: corporateBody, person or family."),
    FieldSpec::new(C::CpfId, "CPF ID")
        .single()
        .identifier()
        .previous_names(&["SNAC CPF ID"])
        .tooltip("SNAC identifier of the CPF entity. Leave blank for a new CPF."),
    FieldSpec::new(C::NameEntry, "Name Entry")
        .tooltip("Preferred name entry of the CPF entity."),
    FieldSpec::new(C::VariantNameEntry, "Variant Name Entry")
        .tooltip("Variant name entry of the CPF entity."),
    FieldSpec::new(C::ExistDate, "Exist Date")
        .depends_on(&[
            FieldRelation::required(C::ExistDateType),
            FieldRelation::optional(C::ExistDateDescriptiveNote),
        ])
        .tooltip("Exist date of the CPF entity. Requires an Exist Date Type in the same row."),
    FieldSpec::new(C::ExistDateType, "Exist Date Type")
        .controlled(TermType::DateType)
        .samples(&["Active", "Birth", "Death", "Establishment", "Disestablishment"])
        .tooltip("Type of the Exist Date in the same row."),
    FieldSpec::new(C::ExistDateDescriptiveNote, "Exist Date Descriptive Note")
        .tooltip("Descriptive note for the Exist Date in the same row."),
    FieldSpec::new(C::Subject, "Subject")
        .controlled(TermType::Subject)
        .tooltip("Subject term associated with the CPF entity."),
    FieldSpec::new(C::Place, "Place")
        .depends_on(&[
            FieldRelation::optional(C::PlaceRole),
            FieldRelation::optional(C::PlaceType),
        ])
        .tooltip("Place name associated with the CPF entity."),
    FieldSpec::new(C::PlaceRole, "Place Role")
        .controlled(TermType::PlaceRole)
        .samples(&["Birth", "Death", "Residence", "Citizenship", "Work"])
        .tooltip("Role of the Place in the same row."),
    FieldSpec::new(C::PlaceType, "Place Type")
        .controlled(TermType::PlaceType)
        .samples(&["AssociatedPlace", "Address"])
        .default_value("AssociatedPlace")
        .tooltip("Type of the Place in the same row. Defaults to AssociatedPlace."),
    FieldSpec::new(C::Occupation, "Occupation")
        .controlled(TermType::Occupation)
        .tooltip("Occupation term associated with the CPF entity."),
    FieldSpec::new(C::Activity, "Activity")
        .controlled(TermType::Activity)
        .tooltip("Activity term associated with the CPF entity."),
    FieldSpec::new(C::LanguageCode, "Language Code")
        .controlled(TermType::LanguageCode)
        .depends_on(&[FieldRelation::optional(C::ScriptCode)])
        .samples(&["eng", "ger", "jpn"])
        .tooltip("ISO 639 language code. Combines with a Script Code in the same row."),
    FieldSpec::new(C::ScriptCode, "Script Code")
        .controlled(TermType::ScriptCode)
        .samples(&["Latn", "Cyrl", "Grek"])
        .tooltip("ISO 15924 script code. Combines with a Language Code in the same row."),
    FieldSpec::new(C::BiogHist, "BiogHist")
        .tooltip("Biography or history note of the CPF entity."),
    FieldSpec::new(C::ExternalRelatedCpfUrl, "External Related CPF URL")
        .tooltip("URL of a description of the CPF entity in an external authority."),
    FieldSpec::new(C::SourceCitation, "Source Citation")
        .depends_on(&[
            FieldRelation::optional(C::SourceCitationUrl),
            FieldRelation::optional(C::SourceCitationFoundData),
        ])
        .tooltip("Text citation of a source used to describe the CPF entity."),
    FieldSpec::new(C::SourceCitationUrl, "Source Citation URL")
        .tooltip("URL of the Source Citation in the same row."),
    FieldSpec::new(C::SourceCitationFoundData, "Source Citation Found Data")
        .tooltip("Information found in the Source Citation in the same row."),
];

impl ModelFieldType for ConstellationField {
    const NONE: Self = ConstellationField::None;
    const MODEL_TYPE: ModelType = ModelType::Constellation;

    fn specs() -> &'static [FieldSpec<Self>] {
        CONSTELLATION_FIELDS
    }
}
