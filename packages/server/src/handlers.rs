//! HTTP handler functions for the wage map API.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use wage_map_server_models::{ApiCountyBand, ApiHealth, BandQueryParams};
use wage_map_wage_models::{SALARY_MAX, SALARY_MIN, WageBand};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/wages`
///
/// Returns the full wage record store as a flat JSON object keyed by
/// `"{county_fips}_{job_title}"`. No query parameters, no pagination.
pub async fn wages(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.as_ref())
}

/// `GET /api/job-titles`
///
/// Returns the distinct job titles, lexicographically sorted.
pub async fn job_titles(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.job_titles())
}

/// `GET /api/bands`
///
/// Classifies a salary against every county that has a record for the
/// given job title, returning `{fips: {band, color}}`. The salary is
/// clamped to the valid input range before classification.
pub async fn bands(
    state: web::Data<AppState>,
    params: web::Query<BandQueryParams>,
) -> HttpResponse {
    let title = params.job_title.trim().to_uppercase();
    let salary = params.salary.clamp(SALARY_MIN, SALARY_MAX);

    let bands: BTreeMap<&str, ApiCountyBand> = state
        .store
        .records_for_title(&title)
        .into_iter()
        .map(|(fips, record)| {
            (
                fips,
                ApiCountyBand::from(WageBand::classify(salary, Some(record))),
            )
        })
        .collect();

    HttpResponse::Ok().json(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use std::sync::Arc;
    use wage_map_store::WageRecordStore;
    use wage_map_wage_models::WageRecord;

    fn record(fips: &str, title: &str, base: f64) -> WageRecord {
        WageRecord {
            county_fips: fips.to_string(),
            county_name: "Test County".to_string(),
            state: "CA".to_string(),
            job_title: title.to_string(),
            level_1: base,
            level_2: base + 20_000.0,
            level_3: base + 40_000.0,
            level_4: base + 60_000.0,
            source_count: 5,
        }
    }

    fn state() -> web::Data<AppState> {
        let store = WageRecordStore::from_records([
            record("06075", "SOFTWARE ENGINEER", 90_000.0),
            record("17031", "SOFTWARE ENGINEER", 70_000.0),
            record("06075", "ACCOUNTANT", 60_000.0),
        ]);
        web::Data::new(AppState {
            store: Arc::new(store),
        })
    }

    #[actix_web::test]
    async fn wages_returns_full_store() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .route("/api/wages", web::get().to(wages)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/wages").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.get("06075_SOFTWARE ENGINEER").is_some());
        assert!(body.get("06075_ACCOUNTANT").is_some());
        assert_eq!(body.as_object().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn job_titles_sorted_and_deduped() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .route("/api/job-titles", web::get().to(job_titles)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/job-titles").to_request();
        let body: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, vec!["ACCOUNTANT", "SOFTWARE ENGINEER"]);
    }

    #[actix_web::test]
    async fn bands_classifies_per_county() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .route("/api/bands", web::get().to(bands)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/bands?jobTitle=SOFTWARE%20ENGINEER&salary=115000")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        // 115k: >= 110k (level_2) in 06075 -> good; >= 110k (level_3) in 17031 -> strong.
        assert_eq!(body["06075"]["band"], "good");
        assert_eq!(body["17031"]["band"], "strong");
        assert_eq!(body["06075"]["color"], WageBand::Good.color());
    }

    #[actix_web::test]
    async fn bands_for_unknown_title_is_empty() {
        let app = test::init_service(
            App::new()
                .app_data(state())
                .route("/api/bands", web::get().to(bands)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/bands?jobTitle=PILOT&salary=115000")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.as_object().unwrap().is_empty());
    }
}
