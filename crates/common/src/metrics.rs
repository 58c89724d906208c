//! Prometheus counters for the business side effects.
//!
//! Registered in the default registry on first use and exported by
//! `GET /metrics` through [`encode_metrics`].

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

/// Labels: `outcome` = created | reactivated | duplicate | unsubscribed
pub static NEWSLETTER_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fragma_newsletter_events_total",
        "Newsletter subscription events by outcome",
        &["outcome"]
    )
    .expect("register newsletter_events_total")
});

pub static EARLY_ACCESS_SUBMISSIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "fragma_early_access_submissions_total",
        "Early access submissions stored"
    )
    .expect("register early_access_submissions_total")
});

/// Labels: `operation` = access_token | status, `outcome` = ok | error
pub static KYC_PROVIDER_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fragma_kyc_provider_calls_total",
        "Calls made to the KYC provider",
        &["operation", "outcome"]
    )
    .expect("register kyc_provider_calls_total")
});

/// Labels: `kind` = welcome_email | confirmation_email | crm_relay | kyc_sync
pub static SIDE_EFFECT_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "fragma_side_effect_failures_total",
        "Fire-and-forget side effects that failed",
        &["kind"]
    )
    .expect("register side_effect_failures_total")
});

pub fn newsletter_event(outcome: &str) {
    NEWSLETTER_EVENTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn kyc_call(operation: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    KYC_PROVIDER_CALLS_TOTAL.with_label_values(&[operation, outcome]).inc();
}

pub fn side_effect_failed(kind: &str) {
    SIDE_EFFECT_FAILURES_TOTAL.with_label_values(&[kind]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_export() {
        newsletter_event("created");
        side_effect_failed("crm_relay");
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("fragma_newsletter_events_total"));
        assert!(body.contains("kind=\"crm_relay\""));
    }
}
