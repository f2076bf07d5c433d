mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use common::{default_form, fixed_registry, request};
use serde_json::Value;
use student_performance_analyzer::web::configure;
use student_performance_analyzer::RangePolicy;

macro_rules! app {
    ($registry:expr, $policy:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($registry))
                .app_data(web::Data::new($policy))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn report_endpoint_returns_full_report() {
    let app = app!(fixed_registry(72.345, 40.0), RangePolicy::PassThrough);

    let req = test::TestRequest::post()
        .uri("/report")
        .set_json(request("RandomForest", default_form()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["model"], "RandomForest");
    assert_eq!(body["score"], 72.345);
    assert_eq!(body["rating"], 4);
    assert_eq!(body["stars"], "★★★★");
    assert_eq!(body["advice"][0], "Maintain your excellent habits!");
    assert_eq!(body["chart"]["labels"].as_array().unwrap().len(), 18);
    assert_eq!(body["chart"]["labels"][15], "Income");
    assert_eq!(body["chart"]["values"][15], 1.0);
}

#[actix_web::test]
async fn original_form_label_selects_random_forest() {
    let app = app!(fixed_registry(30.0, 95.0), RangePolicy::PassThrough);

    let req = test::TestRequest::post()
        .uri("/report")
        .set_json(request("Random Forest", default_form()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["rating"], 1);
}

#[actix_web::test]
async fn unknown_label_is_a_bad_request_with_no_report() {
    let app = app!(fixed_registry(80.0, 80.0), RangePolicy::PassThrough);

    let mut form = default_form();
    form.department = "Physics".to_string();
    let req = test::TestRequest::post()
        .uri("/report")
        .set_json(request("XGBoost", form))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unrecognized department value 'Physics'");
    assert!(body.get("score").is_none());
}

#[actix_web::test]
async fn strict_policy_rejects_out_of_range_age() {
    let app = app!(fixed_registry(80.0, 80.0), RangePolicy::Reject);

    let mut form = default_form();
    form.age = 7;
    let req = test::TestRequest::post()
        .uri("/report")
        .set_json(request("XGBoost", form))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn undecodable_body_gets_a_json_error() {
    let app = app!(fixed_registry(80.0, 80.0), RangePolicy::PassThrough);

    let mut payload = serde_json::to_value(request("RandomForest", default_form())).unwrap();
    payload["age"] = Value::Null;
    let req = test::TestRequest::post()
        .uri("/report")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let body: Value = test::read_body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("invalid request body"), "{message}");
    assert!(body.get("score").is_none());
}

#[actix_web::test]
async fn features_export_is_csv() {
    let app = app!(fixed_registry(80.0, 80.0), RangePolicy::PassThrough);

    let req = test::TestRequest::post()
        .uri("/report/features.csv")
        .set_json(request("XGBoost", default_form()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "text/csv"
    );

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("feature,value\nGender,0\nAge,20\n"));
    assert!(text.ends_with("Stress,5\nSleep,8\n"));
}

#[actix_web::test]
async fn schema_lists_closed_label_sets() {
    let app = app!(fixed_registry(80.0, 80.0), RangePolicy::PassThrough);

    let req = test::TestRequest::get().uri("/schema").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["models"], serde_json::json!(["RandomForest", "XGBoost"]));
    assert_eq!(
        body["categories"]["parent_education"],
        serde_json::json!(["High School", "Bachelor's", "Master's", "PhD", "Other"])
    );
    assert_eq!(body["categories"]["yes_no"], serde_json::json!(["No", "Yes"]));
    assert_eq!(body["features"][11], "Study Hours");
}

#[actix_web::test]
async fn homepage_and_health_are_served() {
    let app = app!(fixed_registry(80.0, 80.0), RangePolicy::PassThrough);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Get Performance Report"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn model_info_lists_both_models() {
    let app = app!(fixed_registry(80.0, 80.0), RangePolicy::PassThrough);

    let req = test::TestRequest::get().uri("/model/info").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["model"], "RandomForest");
    assert_eq!(body[0]["aggregation"], "mean");
    assert_eq!(body[1]["model"], "XGBoost");
    assert_eq!(body[1]["aggregation"], "sum");
}
