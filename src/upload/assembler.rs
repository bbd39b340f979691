//! Builds an application from the form and the map, then hands it to the uploader.

use crate::error::{PattaError, PattaResult};
use crate::upload::boundary::{BoundarySource, FormCoordinate};
use crate::upload::{DocumentField, DocumentFile, Location, SubmissionPayload, Uploader};
use crate::validation::FileValidator;

/// Read access to the application form.
pub trait FormAccessor {
    /// Current text of a field, `None` if the field does not exist.
    fn text(&self, field: &str) -> Option<String>;

    /// File currently selected in a document input.
    fn document(&self, field: DocumentField) -> Option<DocumentFile>;
}

/// Assemble the payload from `form` and `map` and upload it to `target`.
///
/// Fails before any network activity when a document is missing (the first in
/// form order is named), a document fails validation, or a coordinate is out
/// of range.
pub async fn submit_patta(
    form: &dyn FormAccessor,
    map: &dyn BoundarySource,
    validator: &FileValidator,
    uploader: &Uploader,
    target: &str,
) -> PattaResult<serde_json::Value> {
    let payload = assemble(form, map, validator)?;
    uploader.upload(target, payload).await
}

/// Build the payload without sending it.
pub fn assemble(
    form: &dyn FormAccessor,
    map: &dyn BoundarySource,
    validator: &FileValidator,
) -> PattaResult<SubmissionPayload> {
    let mut payload = SubmissionPayload::default();

    // Every document must be present before any of them is validated.
    for field in DocumentField::ALL {
        let document = form
            .document(field)
            .filter(|d| !d.is_empty())
            .ok_or(PattaError::MissingDocument(field))?;
        payload.documents.insert(field, document);
    }

    for (&field, document) in &payload.documents {
        validator
            .validate(&document.descriptor)
            .map_err(|reason| PattaError::Rejected { field, reason })?;
    }

    payload.location = Location {
        district: text(form, "district"),
        taluk: text(form, "taluk"),
        village: text(form, "village"),
        survey_no: text(form, "surveyNo"),
        subdiv_no: text(form, "subdivNo"),
    };

    payload.lat = FormCoordinate::parse("lat", &text(form, "lat"), 90.0)?;
    payload.lng = FormCoordinate::parse("lng", &text(form, "lng"), 180.0)?;

    for ring in map.rings() {
        for point in &ring {
            point.check()?;
        }
        payload.boundary.push(ring);
    }

    tracing::debug!(
        rings = payload.boundary.len(),
        district = %payload.location.district,
        "Application assembled"
    );

    Ok(payload)
}

fn text(form: &dyn FormAccessor, field: &str) -> String {
    form.text(field).map(|t| t.trim().to_string()).unwrap_or_default()
}
