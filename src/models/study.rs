//! Public shapes served to the viewer, projected from the archive's
//! native records.

use serde::Serialize;
use serde_json::Value;

pub const UNKNOWN_PATIENT_ID: &str = "ID Desconhecido";
pub const UNKNOWN_PATIENT_NAME: &str = "Nome Desconhecido";
pub const UNKNOWN_DESCRIPTION: &str = "Descrição não disponível";
pub const UNKNOWN_DATE: &str = "Data não disponível";
pub const UNKNOWN_MODALITY: &str = "N/A";

/// One study row in the shape the viewer consumes, merged from the
/// archive's per-study record and the document-existence probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySummary {
    pub id: String,
    pub study_instance_uid: String,
    pub patient_id: String,
    pub orthanc_patient_id: String,
    pub patient_name: String,
    #[serde(rename = "type")]
    pub study_type: String,
    pub date: String,
    pub modality: String,
    pub has_pdf_report: bool,
}

impl StudySummary {
    /// Projects one archive study record into the public shape. Absent tag
    /// groups behave as empty objects, and absent or empty fields degrade
    /// to the documented placeholder strings. The record itself is never
    /// modified.
    pub fn from_record(record: &Value, has_pdf_report: bool) -> Self {
        Self {
            id: field(record, "ID").unwrap_or_default().to_owned(),
            study_instance_uid: tag(record, "MainDicomTags", "StudyInstanceUID")
                .unwrap_or_default()
                .to_owned(),
            patient_id: tag(record, "PatientMainDicomTags", "PatientID")
                .unwrap_or(UNKNOWN_PATIENT_ID)
                .to_owned(),
            orthanc_patient_id: field(record, "ParentPatient").unwrap_or_default().to_owned(),
            patient_name: tag(record, "PatientMainDicomTags", "PatientName")
                .unwrap_or(UNKNOWN_PATIENT_NAME)
                .to_owned(),
            study_type: tag(record, "MainDicomTags", "StudyDescription")
                .unwrap_or(UNKNOWN_DESCRIPTION)
                .to_owned(),
            date: tag(record, "MainDicomTags", "StudyDate")
                .unwrap_or(UNKNOWN_DATE)
                .to_owned(),
            modality: tag(record, "MainDicomTags", "Modality")
                .unwrap_or(UNKNOWN_MODALITY)
                .to_owned(),
            has_pdf_report,
        }
    }
}

/// One report document under a study: the first instance of a
/// document-bearing series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportReference {
    pub id: String,
    pub date: String,
    pub time: String,
}

impl ReportReference {
    /// True for series whose Modality tag is "DOC".
    pub fn is_document_series(series: &Value) -> bool {
        tag(series, "MainDicomTags", "Modality") == Some("DOC")
    }

    /// Maps one document-bearing series to the reference the viewer lists.
    /// Series without instances produce nothing.
    pub fn from_series(series: &Value) -> Option<Self> {
        let id = series.get("Instances")?.get(0)?.as_str()?.to_owned();
        Some(Self {
            id,
            date: tag(series, "MainDicomTags", "SeriesDate")
                .unwrap_or_default()
                .to_owned(),
            time: tag(series, "MainDicomTags", "SeriesTime")
                .unwrap_or_default()
                .to_owned(),
        })
    }
}

fn field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key)?.as_str().filter(|s| !s.is_empty())
}

fn tag<'a>(record: &'a Value, group: &str, key: &str) -> Option<&'a str> {
    field(record.get(group)?, key)
}
