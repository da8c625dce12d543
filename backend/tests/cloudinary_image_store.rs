//! Integration tests for `CloudinaryImageStore` against a local fake host.
//!
//! The fake host verifies request signatures the same way the real API does
//! and records what it received.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use actix_multipart::Multipart;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use futures_util::StreamExt;
use homestock::domain::ports::{ImageStore, ImageStoreError};
use homestock::domain::{ImagePublicId, ImageUpload, ImageUrl};
use homestock::outbound::media::{
    CloudinaryCredentials, CloudinaryImageStore, SignatureAlgorithm, sign,
};
use reqwest::Url;
use rstest::rstest;
use serde_json::json;

const SECRET: &str = "fake-secret";
const API_KEY: &str = "fake-key";

/// What the fake host saw in one upload request.
struct ReceivedUpload {
    fields: HashMap<String, String>,
    file_len: usize,
    file_type: Option<String>,
}

struct FakeHost {
    algorithm: SignatureAlgorithm,
    uploads: Mutex<Vec<ReceivedUpload>>,
    destroys: Mutex<Vec<HashMap<String, String>>>,
}

impl FakeHost {
    fn new(algorithm: SignatureAlgorithm) -> Self {
        Self {
            algorithm,
            uploads: Mutex::new(Vec::new()),
            destroys: Mutex::new(Vec::new()),
        }
    }

    fn signature_matches(&self, fields: &HashMap<String, String>, signed: &[&str]) -> bool {
        let params: Vec<(&str, &str)> = signed
            .iter()
            .map(|name| (*name, fields.get(*name).map_or("", String::as_str)))
            .collect();
        fields.get("api_key").map(String::as_str) == Some(API_KEY)
            && fields.get("signature") == Some(&sign(&params, SECRET, self.algorithm))
    }
}

fn invalid_signature() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"error": {"message": "Invalid Signature"}}))
}

async fn upload(host: web::Data<FakeHost>, mut payload: Multipart) -> HttpResponse {
    let mut fields = HashMap::new();
    let mut file_len = 0;
    let mut file_type = None;
    while let Some(item) = payload.next().await {
        let Ok(mut field) = item else {
            return HttpResponse::BadRequest().finish();
        };
        let name = field.name().map(str::to_owned).unwrap_or_default();
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let Ok(chunk) = chunk else {
                return HttpResponse::BadRequest().finish();
            };
            bytes.extend_from_slice(&chunk);
        }
        if name == "file" {
            file_len = bytes.len();
            file_type = field.content_type().map(ToString::to_string);
        } else {
            fields.insert(name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    if !host.signature_matches(&fields, &["folder", "timestamp"]) {
        return invalid_signature();
    }
    let folder = fields.get("folder").cloned().unwrap_or_default();
    host.uploads.lock().expect("uploads lock").push(ReceivedUpload {
        fields,
        file_len,
        file_type,
    });
    HttpResponse::Ok().json(json!({
        "public_id": format!("{folder}/abc123"),
        "secure_url": format!("https://res.cloudinary.com/demo/image/upload/v1/{folder}/abc123.jpg"),
    }))
}

async fn destroy(
    host: web::Data<FakeHost>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let fields = form.into_inner();
    if !host.signature_matches(&fields, &["public_id", "timestamp"]) {
        return invalid_signature();
    }
    let result = match fields.get("public_id").map(String::as_str) {
        Some("homestock/missing") => "not found",
        Some("homestock/locked") => "error",
        _ => "ok",
    };
    host.destroys.lock().expect("destroys lock").push(fields);
    HttpResponse::Ok().json(json!({ "result": result }))
}

async fn slow() -> HttpResponse {
    tokio::time::sleep(Duration::from_secs(2)).await;
    HttpResponse::Ok().json(json!({"secure_url": "https://example.invalid/late.jpg"}))
}

struct Running {
    base_url: Url,
    host: web::Data<FakeHost>,
    handle: ServerHandle,
}

impl Running {
    fn store(&self, cloud: &str, secret: &str, timeout: Duration) -> CloudinaryImageStore {
        let credentials = CloudinaryCredentials::new(cloud, API_KEY, secret).expect("credentials");
        CloudinaryImageStore::new(&self.base_url, credentials, self.host.algorithm, timeout)
            .expect("store")
    }

    async fn stop(self) {
        self.handle.stop(false).await;
    }
}

fn start(algorithm: SignatureAlgorithm) -> Running {
    let host = web::Data::new(FakeHost::new(algorithm));
    let app_host = host.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_host.clone())
            .route("/v1_1/demo/image/upload", web::post().to(upload))
            .route("/v1_1/demo/image/destroy", web::post().to(destroy))
            .route("/v1_1/slow/image/upload", web::post().to(slow))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind fake host");
    let addr = *server.addrs().first().expect("bound address");
    let server = server.run();
    let handle = server.handle();
    actix_rt::spawn(server);

    Running {
        base_url: Url::parse(&format!("http://{addr}")).expect("base url"),
        host,
        handle,
    }
}

fn jpeg() -> ImageUpload {
    ImageUpload::new(vec![0xff, 0xd8, 0xff, 0xe0, 1, 2, 3])
        .with_filename("apples.jpg")
        .with_content_type("image/jpeg")
}

#[rstest]
#[case::sha1(SignatureAlgorithm::Sha1)]
#[case::sha256(SignatureAlgorithm::Sha256)]
#[actix_web::test]
async fn upload_sends_signed_multipart_into_the_stock_folder(#[case] algorithm: SignatureAlgorithm) {
    let running = start(algorithm);
    let store = running.store("demo", SECRET, Duration::from_secs(5));

    let url = store.upload(jpeg()).await.expect("upload succeeds");

    assert_eq!(
        url.as_str(),
        "https://res.cloudinary.com/demo/image/upload/v1/homestock/abc123.jpg"
    );
    assert_eq!(
        url.public_id().expect("public id").as_str(),
        "homestock/abc123"
    );
    {
        let uploads = running.host.uploads.lock().expect("uploads lock");
        assert_eq!(uploads.len(), 1);
        let received = &uploads[0];
        assert_eq!(
            received.fields.get("folder").map(String::as_str),
            Some("homestock")
        );
        assert_eq!(received.file_len, 7);
        assert_eq!(received.file_type.as_deref(), Some("image/jpeg"));
    }
    running.stop().await;
}

#[rstest]
#[actix_web::test]
async fn upload_forwards_the_client_content_type() {
    let running = start(SignatureAlgorithm::Sha1);
    let store = running.store("demo", SECRET, Duration::from_secs(5));
    let png = ImageUpload::new(vec![0x89, b'P', b'N', b'G'])
        .with_filename("pears.png")
        .with_content_type("image/png");

    store.upload(png).await.expect("upload succeeds");

    {
        let uploads = running.host.uploads.lock().expect("uploads lock");
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].file_type.as_deref(), Some("image/png"));
        assert_eq!(uploads[0].file_len, 4);
    }
    running.stop().await;
}

#[rstest]
#[actix_web::test]
async fn destroy_sends_signed_public_id() {
    let running = start(SignatureAlgorithm::Sha1);
    let store = running.store("demo", SECRET, Duration::from_secs(5));
    let url = ImageUrl::new("https://res.cloudinary.com/demo/image/upload/v1/homestock/abc123.jpg");

    store
        .destroy(&url.public_id().expect("public id"))
        .await
        .expect("destroy succeeds");

    {
        let destroys = running.host.destroys.lock().expect("destroys lock");
        assert_eq!(destroys.len(), 1);
        assert_eq!(
            destroys[0].get("public_id").map(String::as_str),
            Some("homestock/abc123")
        );
    }
    running.stop().await;
}

#[rstest]
#[actix_web::test]
async fn destroying_an_image_the_host_no_longer_has_succeeds() {
    let running = start(SignatureAlgorithm::Sha1);
    let store = running.store("demo", SECRET, Duration::from_secs(5));
    let missing = ImageUrl::new("https://res.cloudinary.com/demo/image/upload/v1/homestock/missing.png");

    store
        .destroy(&missing.public_id().expect("public id"))
        .await
        .expect("not found is success");
    running.stop().await;
}

#[rstest]
#[actix_web::test]
async fn destroy_reports_unexpected_results() {
    let running = start(SignatureAlgorithm::Sha1);
    let store = running.store("demo", SECRET, Duration::from_secs(5));
    let locked = ImagePublicId::from_url(&ImageUrl::new(
        "https://res.cloudinary.com/demo/image/upload/v1/homestock/locked.jpg",
    ))
    .expect("public id");

    let err = store.destroy(&locked).await.expect_err("error result");
    assert_eq!(err, ImageStoreError::rejected(200_u16, "error"));
    running.stop().await;
}

#[rstest]
#[actix_web::test]
async fn wrong_secret_is_rejected_with_the_host_message() {
    let running = start(SignatureAlgorithm::Sha1);
    let store = running.store("demo", "not-the-secret", Duration::from_secs(5));

    let err = store.upload(jpeg()).await.expect_err("signature mismatch");

    assert_eq!(err, ImageStoreError::rejected(401_u16, "Invalid Signature"));
    assert!(running.host.uploads.lock().expect("uploads lock").is_empty());
    running.stop().await;
}

#[rstest]
#[actix_web::test]
async fn slow_hosts_time_out_as_transport_errors() {
    let running = start(SignatureAlgorithm::Sha1);
    let store = running.store("slow", SECRET, Duration::from_millis(200));

    let err = store.upload(jpeg()).await.expect_err("timeout");

    assert!(matches!(err, ImageStoreError::Transport { .. }), "{err}");
    running.stop().await;
}

#[rstest]
#[actix_web::test]
async fn unreachable_hosts_are_transport_errors() {
    let base_url = Url::parse("http://127.0.0.1:1").expect("base url");
    let credentials = CloudinaryCredentials::new("demo", API_KEY, SECRET).expect("credentials");
    let store = CloudinaryImageStore::new(
        &base_url,
        credentials,
        SignatureAlgorithm::Sha1,
        Duration::from_secs(2),
    )
    .expect("store");

    let err = store.upload(jpeg()).await.expect_err("connection refused");

    assert!(matches!(err, ImageStoreError::Transport { .. }), "{err}");
}
