use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::{
    compatibility::{can_donate_to, compatible_donor_groups},
    location::{apply_fresh_fixes, DEFAULT_STALE_AFTER_SECS},
    Matcher,
};
use crate::models::{
    CompatibilityCheckRequest, CompatibilityCheckResponse, ErrorResponse, HealthResponse,
    RankDonorsRequest, RankDonorsResponse,
};

const DEFAULT_LIMIT: u16 = 20;
const MAX_LIMIT: u16 = 200;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/donors/rank", web::post().to(rank_donors))
        .route("/compatibility", web::post().to(check_compatibility));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Rank donors endpoint
///
/// POST /api/v1/donors/rank
///
/// Request body:
/// ```json
/// {
///   "request": { "bloodGroup": "O+", "latitude": 40.7, "longitude": -74.0, "urgency": "critical" },
///   "donors": [ ... ],
///   "donations": [ ... ],
///   "locationFixes": [ ... ],
///   "compatibilityMode": "exact",
///   "limit": 20
/// }
/// ```
async fn rank_donors(
    state: web::Data<AppState>,
    req: web::Json<RankDonorsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank_donors request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let payload = req.into_inner();
    let ranking_id = Uuid::new_v4();
    let mode = payload.compatibility_mode.unwrap_or(state.matcher.mode());
    let max_limit = state.matching.max_limit.unwrap_or(MAX_LIMIT);
    let limit = payload
        .limit
        .or(state.matching.default_limit)
        .unwrap_or(DEFAULT_LIMIT)
        .min(max_limit) as usize;
    let stale_after = stale_window(&state.matching);
    let total_candidates = payload.donors.len();

    tracing::info!(
        "Ranking {} donors for {} request {} (ranking {}, {} mode, urgency {:?})",
        total_candidates,
        payload.request.blood_group,
        payload.request.request_id.as_deref().unwrap_or("-"),
        ranking_id,
        mode,
        payload.request.urgency
    );

    let matcher = state.matcher.clone();
    let now = Utc::now();

    // One ranking is one unit of CPU work; keep it off the async workers
    let ranked = tokio::task::spawn_blocking(move || {
        let donors = if payload.location_fixes.is_empty() {
            payload.donors
        } else {
            apply_fresh_fixes(&payload.donors, &payload.location_fixes, now, stale_after)
        };
        matcher.rank_donors_at(&payload.request, &donors, &payload.donations, mode, now)
    })
    .await;

    let mut matches = match ranked {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!("Ranking {} failed: {}", ranking_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Ranking failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let total_matches = matches.len();
    matches.truncate(limit);

    tracing::info!(
        "Returning {} of {} eligible donors (from {} candidates) for ranking {}",
        matches.len(),
        total_matches,
        total_candidates,
        ranking_id
    );

    HttpResponse::Ok().json(RankDonorsResponse {
        ranking_id,
        compatibility_mode: mode,
        matches,
        total_candidates,
        total_matches,
    })
}

/// Staleness window for location fixes
///
/// Negative or out-of-range settings fall back to the default window.
fn stale_window(matching: &MatchingSettings) -> Duration {
    matching
        .location_stale_after_secs
        .filter(|secs| *secs >= 0)
        .and_then(Duration::try_seconds)
        .unwrap_or_else(|| Duration::seconds(DEFAULT_STALE_AFTER_SECS))
}

/// Compatibility check endpoint
///
/// POST /api/v1/compatibility
///
/// Request body:
/// ```json
/// { "donor": "O-", "recipient": "AB+" }
/// ```
async fn check_compatibility(req: web::Json<CompatibilityCheckRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    HttpResponse::Ok().json(CompatibilityCheckResponse {
        donor: req.donor,
        recipient: req.recipient,
        compatible: can_donate_to(req.donor, req.recipient),
        donor_groups_for_recipient: compatible_donor_groups(req.recipient),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BloodGroup;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    fn app_state() -> AppState {
        AppState {
            matcher: Matcher::with_defaults(),
            matching: MatchingSettings::default(),
        }
    }

    fn donor_json(id: &str, blood_group: &str, lat: f64, lon: f64) -> serde_json::Value {
        json!({
            "donorId": id,
            "name": format!("Donor {}", id),
            "bloodGroup": blood_group,
            "dateOfBirth": "1990-04-12",
            "sex": "male",
            "role": "donor",
            "latitude": lat,
            "longitude": lon,
            "isActive": true
        })
    }

    #[::core::prelude::v1::test]
    fn test_stale_window_falls_back_on_bad_settings() {
        let mut matching = MatchingSettings::default();
        assert_eq!(stale_window(&matching), Duration::seconds(300));

        matching.location_stale_after_secs = Some(60);
        assert_eq!(stale_window(&matching), Duration::seconds(60));

        matching.location_stale_after_secs = Some(i64::MAX);
        assert_eq!(stale_window(&matching), Duration::seconds(300));

        matching.location_stale_after_secs = Some(-5);
        assert_eq!(stale_window(&matching), Duration::seconds(300));
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, "healthy");
    }

    #[actix_web::test]
    async fn test_rank_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let body = json!({
            "request": { "bloodGroup": "O+", "latitude": 40.7128, "longitude": -74.0060, "urgency": "critical" },
            "donors": [
                donor_json("near", "O+", 40.72, -74.01),
                donor_json("far", "O+", 41.5, -74.0),
                donor_json("wrong", "A+", 40.72, -74.01)
            ],
            "donations": [],
            "limit": 5
        });

        let req = test::TestRequest::post().uri("/donors/rank").set_json(&body).to_request();
        let resp: RankDonorsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_candidates, 3);
        assert_eq!(resp.total_matches, 2);
        assert_eq!(resp.matches[0].donor_id, "near");
        assert_eq!(resp.matches[0].score, 100);
        assert_eq!(resp.matches[1].donor_id, "far");
        assert_eq!(resp.matches[1].score, 70);
    }

    #[actix_web::test]
    async fn test_rank_endpoint_applies_location_fixes() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let body = json!({
            "request": { "bloodGroup": "O+", "latitude": 40.7128, "longitude": -74.0060 },
            "donors": [donor_json("moved", "O+", 41.5, -74.0)],
            "locationFixes": [
                { "donorId": "moved", "latitude": 40.7130, "longitude": -74.0062, "recordedAt": Utc::now() }
            ]
        });

        let req = test::TestRequest::post().uri("/donors/rank").set_json(&body).to_request();
        let resp: RankDonorsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.matches.len(), 1);
        assert_eq!(resp.matches[0].distance_km, Some(0.0));
    }

    #[actix_web::test]
    async fn test_rank_endpoint_rejects_unknown_group() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let body = json!({
            "request": { "bloodGroup": "Q+", "latitude": 40.7128, "longitude": -74.0060 },
            "donors": []
        });

        let req = test::TestRequest::post().uri("/donors/rank").set_json(&body).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_rank_endpoint_tolerates_unknown_urgency() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(configure),
        )
        .await;

        let body = json!({
            "request": { "bloodGroup": "O+", "latitude": 40.7128, "longitude": -74.0060, "urgency": "urgent" },
            "donors": [donor_json("near", "O+", 40.72, -74.01)]
        });

        let req = test::TestRequest::post().uri("/donors/rank").set_json(&body).to_request();
        let resp: RankDonorsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.total_matches, 1);
    }

    #[actix_web::test]
    async fn test_compatibility_endpoint() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/compatibility")
            .set_json(json!({ "donor": "O-", "recipient": "AB+" }))
            .to_request();
        let resp: CompatibilityCheckResponse = test::call_and_read_body_json(&app, req).await;

        assert!(resp.compatible);
        assert_eq!(resp.donor_groups_for_recipient, BloodGroup::ALL.to_vec());
    }
}
