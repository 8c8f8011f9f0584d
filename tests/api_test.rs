//! HTTP facade round trips: the same route configuration `main` serves,
//! exercised with `actix_web::test` against an isolated store per test.

use actix_web::{test, web, App};
use serde_json::json;

use trialboard::handlers;
use trialboard::store::RecordStore;

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(RecordStore::new()))
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test_app!();
    let resp: serde_json::Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
    assert_eq!(resp, json!({"status": "healthy"}));
}

#[actix_web::test]
async fn test_empty_summary_wire_shape() {
    let app = test_app!();
    let resp: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/dashboard-summary").to_request(),
    )
    .await;

    assert_eq!(
        resp,
        json!({
            "total_resources": 0,
            "total_trials": 0,
            "therapeutic_areas": [],
            "quarters": [],
            "overall_utilization": 0.0
        })
    );
}

#[actix_web::test]
async fn test_upload_then_summary() {
    let app = test_app!();

    let upload = test::TestRequest::post()
        .uri("/api/upload-data")
        .set_json(json!({
            "resources": [{"name": "Dr. A", "area": "Cardiology",
                           "Q3-2025": 0.8, "Q4-2025": 1.2}],
            "trials": [{"name": "T1", "area": "Cardiology", "subjects": 100,
                        "start_date": "2025-01-01", "end_date": "2025-06-01"}]
        }))
        .to_request();
    let ack: serde_json::Value = test::call_and_read_body_json(&app, upload).await;
    assert_eq!(ack["resources_count"], 1);
    assert_eq!(ack["trials_count"], 1);
    assert_eq!(ack["message"], "Data uploaded successfully");

    let summary: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/dashboard-summary").to_request(),
    )
    .await;
    assert_eq!(summary["total_resources"], 1);
    assert_eq!(summary["therapeutic_areas"], json!(["Cardiology"]));
    assert_eq!(summary["quarters"], json!(["Q3-2025", "Q4-2025"]));
    assert_eq!(summary["overall_utilization"], 100.0);
}

#[actix_web::test]
async fn test_invalid_upload_is_rejected_with_issue_detail() {
    let app = test_app!();

    let upload = test::TestRequest::post()
        .uri("/api/upload-data")
        .set_json(json!({
            "resources": [{"name": "Dr. A", "area": "Cardiology", "Q3-2025": -0.5}],
            "trials": []
        }))
        .to_request();
    let resp = test::call_service(&app, upload).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["issues"][0]["record"], "resources[0]");
    assert_eq!(body["issues"][0]["field"], "Q3-2025");

    // Store untouched: summary is still the empty one.
    let summary: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/dashboard-summary").to_request(),
    )
    .await;
    assert_eq!(summary["total_resources"], 0);
    assert_eq!(summary["total_trials"], 0);
}

#[actix_web::test]
async fn test_resources_listing_flattens_quarter_keys() {
    let app = test_app!();

    let upload = test::TestRequest::post()
        .uri("/api/load-sample-data")
        .set_json(json!({
            "resources": [{"name": "Dr. A", "area": "Cardiology", "Q3-2025": 0.8}],
            "trials": []
        }))
        .to_request();
    let ack = test::call_service(&app, upload).await;
    assert!(ack.status().is_success());

    let resources: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/resources").to_request(),
    )
    .await;
    assert_eq!(
        resources,
        json!([{"name": "Dr. A", "area": "Cardiology", "Q3-2025": 0.8}])
    );
}

#[actix_web::test]
async fn test_quarters_endpoint_sorted() {
    let app = test_app!();

    let upload = test::TestRequest::post()
        .uri("/api/upload-data")
        .set_json(json!({
            "resources": [{"name": "Dr. A", "area": "Onc",
                           "Q4-2025": 0.1, "Q1-2025": 0.2, "Q3-2025": 0.3}],
            "trials": []
        }))
        .to_request();
    assert!(test::call_service(&app, upload).await.status().is_success());

    let resp: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/quarters").to_request(),
    )
    .await;
    assert_eq!(resp, json!({"quarters": ["Q1-2025", "Q3-2025", "Q4-2025"]}));
}

#[actix_web::test]
async fn test_bottlenecks_404_until_data_loaded() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/bottlenecks").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "No data loaded"}));

    let upload = test::TestRequest::post()
        .uri("/api/upload-data")
        .set_json(json!({
            "resources": [{"name": "Dr. A", "area": "Cardiology", "Q3-2025": 1.0}],
            "trials": [{"name": "T1", "area": "Cardiology", "subjects": 1300,
                        "start_date": "2025-01-01", "end_date": "2025-06-01"}]
        }))
        .to_request();
    assert!(test::call_service(&app, upload).await.status().is_success());

    let resp: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/bottlenecks").to_request(),
    )
    .await;
    let cells = resp["bottlenecks"].as_array().expect("bottlenecks array");
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0]["therapeutic_area"], "Cardiology");
    assert_eq!(cells[0]["quarter"], "Q3-2025");
    assert_eq!(cells[0]["supply"], 1.0);
    // 1300 subjects / 650 per FTE = 2.0 FTE demand against 0.8 usable supply
    assert_eq!(cells[0]["demand"], 2.0);
    assert_eq!(cells[0]["status"], "overloaded");
}

#[actix_web::test]
async fn test_trial_reupload_replaces_record_via_api() {
    let app = test_app!();

    for (area, subjects) in [("Cardiology", 100), ("Neurology", 42)] {
        let upload = test::TestRequest::post()
            .uri("/api/upload-data")
            .set_json(json!({
                "resources": [],
                "trials": [{"name": "T1", "area": area, "subjects": subjects,
                            "start_date": "2025-01-01", "end_date": "2025-06-01"}]
            }))
            .to_request();
        assert!(test::call_service(&app, upload).await.status().is_success());
    }

    let trials: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/trials").to_request(),
    )
    .await;
    assert_eq!(trials.as_array().expect("trials array").len(), 1);
    assert_eq!(trials[0]["area"], "Neurology");
    assert_eq!(trials[0]["subjects"], 42);
}
