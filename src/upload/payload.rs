//! Submission payload types.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::PattaResult;
use crate::upload::boundary::{encode_boundary, FormCoordinate, Ring};
use crate::validation::FileDescriptor;

/// The five documents every application must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentField {
    ParentDoc,
    SaleDeed,
    AadharCard,
    EncumbCert,
    LayoutScan,
}

impl DocumentField {
    /// Form order; "first missing" is judged in this order.
    pub const ALL: [DocumentField; 5] = [
        DocumentField::ParentDoc,
        DocumentField::SaleDeed,
        DocumentField::AadharCard,
        DocumentField::EncumbCert,
        DocumentField::LayoutScan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentField::ParentDoc => "parentDoc",
            DocumentField::SaleDeed => "saleDeed",
            DocumentField::AadharCard => "aadharCard",
            DocumentField::EncumbCert => "encumbCert",
            DocumentField::LayoutScan => "layoutScan",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for DocumentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected file together with its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub descriptor: FileDescriptor,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            descriptor: FileDescriptor::new(name, mime_type, bytes.len() as u64),
            bytes,
        }
    }

    /// Read a document from disk, inferring the MIME type from its extension.
    pub fn from_path(path: &Path) -> PattaResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, mime_for_path(path), bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn into_part(self) -> PattaResult<Part> {
        let part = Part::bytes(self.bytes)
            .file_name(self.descriptor.name)
            .mime_str(&self.descriptor.mime_type)?;
        Ok(part)
    }
}

/// MIME type guessed from a file extension. Unknown extensions map to
/// `application/octet-stream`, which validation then refuses.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Free-text location fields of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub district: String,
    pub taluk: String,
    pub village: String,
    pub survey_no: String,
    pub subdiv_no: String,
}

/// Everything sent in one application attempt.
#[derive(Debug, Clone, Default)]
pub struct SubmissionPayload {
    pub documents: BTreeMap<DocumentField, DocumentFile>,
    pub location: Location,
    pub lat: FormCoordinate,
    pub lng: FormCoordinate,
    pub boundary: Vec<Ring>,
}

impl SubmissionPayload {
    pub fn with_document(mut self, field: DocumentField, file: DocumentFile) -> Self {
        self.documents.insert(field, file);
        self
    }

    /// First required document that is absent or zero-length.
    pub fn first_missing(&self) -> Option<DocumentField> {
        DocumentField::ALL
            .into_iter()
            .find(|field| self.documents.get(field).map_or(true, DocumentFile::is_empty))
    }

    /// Total bytes across all documents.
    pub fn document_bytes(&self) -> u64 {
        self.documents.values().map(|d| d.descriptor.size).sum()
    }

    /// Build the multipart body.
    pub fn into_form(self) -> PattaResult<Form> {
        let boundary = encode_boundary(&self.boundary)?;
        let mut form = Form::new();

        for (field, file) in self.documents {
            form = form.part(field.as_str(), file.into_part()?);
        }

        Ok(form
            .text("district", self.location.district)
            .text("taluk", self.location.taluk)
            .text("village", self.location.village)
            .text("lat", self.lat.text)
            .text("lng", self.lng.text)
            .text("surveyNo", self.location.survey_no)
            .text("subdivNo", self.location.subdiv_no)
            .text("boundary", boundary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> SubmissionPayload {
        DocumentField::ALL
            .into_iter()
            .fold(SubmissionPayload::default(), |p, f| {
                p.with_document(f, DocumentFile::new(format!("{f}.pdf"), "application/pdf", vec![1, 2, 3]))
            })
    }

    #[test]
    fn test_first_missing_follows_form_order() {
        let mut payload = full_payload();
        assert_eq!(payload.first_missing(), None);

        payload.documents.remove(&DocumentField::LayoutScan);
        payload.documents.remove(&DocumentField::AadharCard);
        assert_eq!(payload.first_missing(), Some(DocumentField::AadharCard));
    }

    #[test]
    fn test_zero_length_document_counts_as_missing() {
        let payload = full_payload().with_document(
            DocumentField::SaleDeed,
            DocumentFile::new("deed.pdf", "application/pdf", Vec::new()),
        );
        assert_eq!(payload.first_missing(), Some(DocumentField::SaleDeed));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in DocumentField::ALL {
            assert_eq!(DocumentField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(DocumentField::from_name("district"), None);
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_for_path(Path::new("a/deed.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("layout.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_from_path_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deed.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = DocumentFile::from_path(&path).unwrap();
        assert_eq!(doc.descriptor, FileDescriptor::new("deed.pdf", "application/pdf", 8));
        assert_eq!(doc.bytes, b"%PDF-1.4");
    }
}
