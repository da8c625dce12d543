//! End-to-end stock lifecycle through the public HTTP surface, with
//! in-memory collaborators standing in for PostgreSQL and the media host.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::middleware::NormalizePath;
use actix_web::{App, test, web};
use homestock::Trace;
use homestock::domain::StockService;
use homestock::inbound::http::health::welcome;
use homestock::inbound::http::routes::configure_stock_routes;
use homestock::inbound::http::state::HttpState;
use homestock::test_support::{
    InMemoryStockRepository, RecordingImageStore, SAMPLE_USER_ID, multipart_body,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct Collaborators {
    repo: Arc<InMemoryStockRepository>,
    images: Arc<RecordingImageStore>,
}

#[fixture]
fn collaborators() -> Collaborators {
    Collaborators {
        repo: Arc::new(InMemoryStockRepository::with_sample_user()),
        images: Arc::new(RecordingImageStore::new()),
    }
}

fn state(collaborators: &Collaborators) -> web::Data<HttpState> {
    let service = Arc::new(StockService::new(
        collaborators.repo.clone(),
        collaborators.images.clone(),
    ));
    web::Data::new(HttpState::new(service.clone(), service))
}

#[rstest]
#[actix_web::test]
async fn stock_item_lifecycle(collaborators: Collaborators) {
    let app = test::init_service(
        App::new()
            .app_data(state(&collaborators))
            .wrap(Trace)
            .wrap(NormalizePath::trim())
            .configure(configure_stock_routes)
            .service(welcome),
    )
    .await;

    let (content_type, body) = multipart_body(
        &[
            ("name", "Apples"),
            ("category", "Fruits"),
            ("quantity", "5"),
            ("unit", "kg"),
            ("user", SAMPLE_USER_ID),
        ],
        Some(("apples.jpg", b"jpeg-bytes".as_slice())),
    );
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/stock/")
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(created).await;
    let id = created["id"].as_str().expect("id").to_owned();
    let item_uri = format!("/api/v1/stock/{id}");

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::patch()
            .uri(&item_uri)
            .set_json(json!({"quantity": "3", "notes": "for pie"}))
            .to_request(),
    )
    .await;
    assert_eq!(updated["quantity"], 3.0);
    assert_eq!(updated["notes"], "for pie");
    assert_eq!(updated["image"], created["image"]);

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/v1/stock").to_request(),
    )
    .await;
    assert_eq!(listed, json!([updated]));

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete().uri(&item_uri).to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(collaborators.images.destroyed().len(), 1);

    let gone = test::call_service(&app, test::TestRequest::get().uri(&item_uri).to_request()).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    let trace_header = gone
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = test::read_body_json(gone).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["traceId"], trace_header.as_str());
    assert!(collaborators.repo.items().is_empty());
}

#[rstest]
#[actix_web::test]
async fn root_greets_clients() {
    let app = test::init_service(App::new().wrap(Trace).service(welcome)).await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(body, json!({"message": "Welcome to Home Stock API"}));
}
