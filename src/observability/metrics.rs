//! Metrics collection.
//!
//! # Metrics
//! - `patta_requests_total` (counter): JSON requests by outcome
//! - `patta_uploads_total` (counter): application uploads by outcome
//! - `patta_file_rejections_total` (counter): rejected documents by reason
//! - `patta_csp_violations_total` (counter): reported violations by directive
//! - `patta_session_expired_total` (counter): 403 responses seen
//!
//! Only the `metrics` facade is used here; the embedding application installs
//! a recorder if it wants the numbers exported.

pub fn record_request(outcome: &'static str) {
    metrics::counter!("patta_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_upload(outcome: &'static str) {
    metrics::counter!("patta_uploads_total", "outcome" => outcome).increment(1);
}

pub fn record_file_rejection(reason: &'static str) {
    metrics::counter!("patta_file_rejections_total", "reason" => reason).increment(1);
}

pub fn record_csp_violation(directive: &str) {
    metrics::counter!("patta_csp_violations_total", "directive" => directive.to_string())
        .increment(1);
}

pub fn record_session_expired() {
    metrics::counter!("patta_session_expired_total").increment(1);
}
