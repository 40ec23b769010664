//! HTTP handler functions for the registry API.
//!
//! Handlers validate request bodies into typed inputs, call the query
//! layer, and translate the error taxonomy onto status codes:
//! [`ValidationError`] becomes 400, [`DbError::NotFound`] becomes 404, and
//! anything else is logged and becomes an opaque 500.

use actix_web::{HttpResponse, web};
use resitrack_database::{DbError, households, incidents, metrics};
use resitrack_database_models::{NewHousehold, NewIncident};
use resitrack_server_models::{
    ApiHealth, ApiHousehold, ApiIncident, ApiMetrics, ApiStatusChange, HouseholdBody,
    IncidentBody, StatusBody, ValidationError,
};

use crate::AppState;

fn validation_response(err: &ValidationError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": err.to_string()
    }))
}

fn db_error_response(action: &str, err: &DbError) -> HttpResponse {
    match err {
        DbError::NotFound { .. } => HttpResponse::NotFound().json(serde_json::json!({
            "error": err.to_string()
        })),
        DbError::Database(..) | DbError::Conversion { .. } => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to {action}")
            }))
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/households`
pub async fn list_households(state: web::Data<AppState>) -> HttpResponse {
    match households::list(state.db.as_ref()).await {
        Ok(rows) => {
            let api: Vec<ApiHousehold> = rows.into_iter().map(ApiHousehold::from).collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => db_error_response("list households", &e),
    }
}

/// `POST /api/households`
pub async fn create_household(
    state: web::Data<AppState>,
    body: web::Json<HouseholdBody>,
) -> HttpResponse {
    let input = match NewHousehold::try_from(body.into_inner()) {
        Ok(input) => input,
        Err(e) => return validation_response(&e),
    };

    match households::insert(state.db.as_ref(), &input).await {
        Ok(row) => HttpResponse::Ok().json(ApiHousehold::from(row)),
        Err(e) => db_error_response("create household", &e),
    }
}

/// `PUT /api/households/{id}`
pub async fn update_household(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<HouseholdBody>,
) -> HttpResponse {
    let input = match NewHousehold::try_from(body.into_inner()) {
        Ok(input) => input,
        Err(e) => return validation_response(&e),
    };

    match households::update(state.db.as_ref(), &path, &input).await {
        Ok(row) => HttpResponse::Ok().json(ApiHousehold::from(row)),
        Err(e) => db_error_response("update household", &e),
    }
}

/// `PUT /api/households/{id}/status`
pub async fn set_household_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusBody>,
) -> HttpResponse {
    let status = match body.parse() {
        Ok(status) => status,
        Err(e) => return validation_response(&e),
    };

    match households::set_status(state.db.as_ref(), &path, status).await {
        Ok(row) => HttpResponse::Ok().json(ApiHousehold::from(row)),
        Err(e) => db_error_response("set household status", &e),
    }
}

/// `GET /api/households/{id}/history`
pub async fn household_history(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match households::status_history(state.db.as_ref(), &path).await {
        Ok(rows) => {
            let api: Vec<ApiStatusChange> = rows.into_iter().map(ApiStatusChange::from).collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => db_error_response("fetch status history", &e),
    }
}

/// `DELETE /api/households/{id}`
pub async fn delete_household(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match households::delete(state.db.as_ref(), &path).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => db_error_response("delete household", &e),
    }
}

/// `GET /api/incidents`
pub async fn list_incidents(state: web::Data<AppState>) -> HttpResponse {
    match incidents::list(state.db.as_ref()).await {
        Ok(rows) => {
            let api: Vec<ApiIncident> = rows.into_iter().map(ApiIncident::from).collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => db_error_response("list incidents", &e),
    }
}

/// `POST /api/incidents`
pub async fn create_incident(
    state: web::Data<AppState>,
    body: web::Json<IncidentBody>,
) -> HttpResponse {
    let input = match NewIncident::try_from(body.into_inner()) {
        Ok(input) => input,
        Err(e) => return validation_response(&e),
    };

    match incidents::insert(state.db.as_ref(), &input).await {
        Ok(row) => HttpResponse::Ok().json(ApiIncident::from(row)),
        Err(e) => db_error_response("create incident", &e),
    }
}

/// `PUT /api/incidents/{id}`
pub async fn update_incident(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<IncidentBody>,
) -> HttpResponse {
    let input = match NewIncident::try_from(body.into_inner()) {
        Ok(input) => input,
        Err(e) => return validation_response(&e),
    };

    match incidents::update(state.db.as_ref(), &path, &input).await {
        Ok(row) => HttpResponse::Ok().json(ApiIncident::from(row)),
        Err(e) => db_error_response("update incident", &e),
    }
}

/// `DELETE /api/incidents/{id}`
pub async fn delete_incident(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match incidents::delete(state.db.as_ref(), &path).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => db_error_response("delete incident", &e),
    }
}

/// `GET /api/metrics`
pub async fn get_metrics(state: web::Data<AppState>) -> HttpResponse {
    match metrics::compute(state.db.as_ref()).await {
        Ok(snapshot) => HttpResponse::Ok().json(ApiMetrics::from(snapshot)),
        Err(e) => db_error_response("compute metrics", &e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use serde_json::json;

    use crate::AppState;

    async fn test_state() -> web::Data<AppState> {
        let db = switchy_database_connection::init_sqlite_rusqlite(None)
            .expect("Failed to open in-memory SQLite database");
        resitrack_database::create_schema(db.as_ref())
            .await
            .expect("Failed to create schema");

        web::Data::new(AppState { db: Arc::from(db) })
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(test_state().await)
                    .configure(crate::configure),
            )
            .await
        };
    }

    fn household_body() -> serde_json::Value {
        json!({
            "name": "Juan Dela Cruz",
            "address": "123 Rizal St",
            "latitude": "14.5994",
            "longitude": "120.9842",
            "contact": "0917-555-0101",
        })
    }

    fn incident_body() -> serde_json::Value {
        json!({
            "type": "flood",
            "phase": "occurring",
            "severity": "high",
            "description": "River overflow",
            "affected_area": "Barangay San Roque",
            "affected_families": "12",
            "relief_distributed": "5",
        })
    }

    #[actix_web::test]
    async fn create_household_then_list() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/households")
            .set_json(household_body())
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["status"], "unverified");
        assert_eq!(created["latitude"], 14.5994);

        let req = test::TestRequest::get().uri("/api/households").to_request();
        let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[actix_web::test]
    async fn bad_coordinate_is_rejected_with_400() {
        let app = test_app!();

        let mut body = household_body();
        body["latitude"] = json!("abc");

        let req = test::TestRequest::post()
            .uri("/api/households")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/households").to_request();
        let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn status_toggle_roundtrip_and_404() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/households")
            .set_json(household_body())
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/households/{id}/status"))
            .set_json(json!({"status": "safe"}))
            .to_request();
        let updated: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["status"], "safe");

        let req = test::TestRequest::put()
            .uri("/api/households/no-such-id/status")
            .set_json(json!({"status": "safe"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let req = test::TestRequest::put()
            .uri(&format!("/api/households/{id}/status"))
            .set_json(json!({"status": "unverified"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn incident_counts_are_coerced_from_text() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .set_json(incident_body())
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["affected_families"], 12);
        assert_eq!(created["relief_distributed"], 5);
        assert_eq!(created["type"], "flood");
    }

    #[actix_web::test]
    async fn non_numeric_count_creates_nothing() {
        let app = test_app!();

        let mut body = incident_body();
        body["affected_families"] = json!("abc");

        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/incidents").to_request();
        let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn delete_household_then_update_is_404() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/households")
            .set_json(household_body())
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/households/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NO_CONTENT);

        let req = test::TestRequest::put()
            .uri(&format!("/api/households/{id}"))
            .set_json(household_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn metrics_reflect_current_state() {
        let app = test_app!();

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/households")
                .set_json(household_body())
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get().uri("/api/households").to_request();
        let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let first_id = listed[0]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/households/{first_id}/status"))
            .set_json(json!({"status": "safe"}))
            .to_request();
        test::call_service(&app, req).await;

        let mut body = incident_body();
        body["affected_families"] = json!(10);
        body["relief_distributed"] = json!(0);
        let req = test::TestRequest::post()
            .uri("/api/incidents")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/api/metrics").to_request();
        let metrics: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(metrics["total_households"], 2);
        assert_eq!(metrics["safe_count"], 1);
        assert_eq!(metrics["unverified_count"], 1);
        assert_eq!(metrics["safe_percentage"], 50.0);
        assert_eq!(metrics["total_affected_families"], 10);
        assert_eq!(metrics["active_incidents"], 1);
    }

    #[actix_web::test]
    async fn history_endpoint_returns_transitions() {
        let app = test_app!();

        let req = test::TestRequest::post()
            .uri("/api/households")
            .set_json(household_body())
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        for status in ["not_safe", "safe", "safe"] {
            let req = test::TestRequest::put()
                .uri(&format!("/api/households/{id}/status"))
                .set_json(json!({"status": status}))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/households/{id}/history"))
            .to_request();
        let history: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let entries = history.as_array().unwrap();
        // The repeated "safe" toggle is a no-op and leaves no audit row.
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["previous_status"], "unverified");
        assert_eq!(entries[0]["new_status"], "not_safe");
        assert_eq!(entries[1]["new_status"], "safe");
    }
}
