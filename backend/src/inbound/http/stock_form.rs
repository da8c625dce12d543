//! Request body parsing for stock create and update.
//!
//! Both endpoints accept either `multipart/form-data` (text fields plus an
//! optional `image` file part) or a JSON object with the same field names.
//! Bodies larger than the configured limit are rejected with 413 before the
//! domain sees them.

use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{HttpRequest, web};
use futures_util::StreamExt;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, ImageUpload, StockDraft};

/// Multipart part that carries the image file.
pub const IMAGE_FIELD: &str = "image";

/// Stock fields as sent in a JSON body. Every field is optional here;
/// required-ness is decided by the operation.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockFieldsBody {
    #[schema(example = "Apples")]
    pub name: Option<String>,
    #[schema(example = "Fruits")]
    pub category: Option<String>,
    #[schema(value_type = Option<f64>, example = 5.0)]
    pub quantity: Option<NumberOrText>,
    #[schema(example = "kg")]
    pub unit: Option<String>,
    /// `null` clears the date on update.
    #[serde(default, deserialize_with = "null_as_blank")]
    #[schema(format = "date-time", nullable)]
    pub expiration_date: Option<String>,
    pub notes: Option<String>,
    #[schema(format = "uuid")]
    pub user: Option<String>,
}

/// Read an explicit `null` as a blank value. Absent fields never reach this.
fn null_as_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|value| Some(value.unwrap_or_default()))
}

/// JSON number, or the same number written as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl From<NumberOrText> for String {
    fn from(value: NumberOrText) -> Self {
        match value {
            NumberOrText::Number(number) => number.to_string(),
            NumberOrText::Text(text) => text,
        }
    }
}

impl From<StockFieldsBody> for StockDraft {
    fn from(body: StockFieldsBody) -> Self {
        Self {
            name: body.name,
            category: body.category,
            quantity: body.quantity.map(String::from),
            unit: body.unit,
            expiration_date: body.expiration_date,
            notes: body.notes,
            user: body.user,
        }
    }
}

/// Multipart form layout, for OpenAPI only.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct StockFormSchema {
    name: Option<String>,
    category: Option<String>,
    quantity: Option<f64>,
    unit: Option<String>,
    #[schema(format = "date-time")]
    expiration_date: Option<String>,
    notes: Option<String>,
    #[schema(format = "uuid")]
    user: Option<String>,
    /// Image file to upload to the media host.
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

/// Parsed request body.
#[derive(Debug, Default)]
pub struct StockForm {
    pub draft: StockDraft,
    pub image: Option<ImageUpload>,
}

fn too_large(limit: usize) -> Error {
    Error::payload_too_large(format!("request body exceeds the {limit} byte limit"))
}

fn declared_length(req: &HttpRequest) -> Option<usize> {
    req.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

/// Read a create or update body into a draft plus optional image.
pub async fn read_stock_form(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> Result<StockForm, Error> {
    if declared_length(req).is_some_and(|length| length > limit) {
        return Err(too_large(limit));
    }
    if is_multipart(req) {
        read_multipart(req, payload, limit).await
    } else {
        read_json(payload, limit).await
    }
}

async fn read_json(mut payload: web::Payload, limit: usize) -> Result<StockForm, Error> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| {
            Error::invalid_request(format!("failed to read request body: {err}"))
        })?;
        if body.len() + chunk.len() > limit {
            return Err(too_large(limit));
        }
        body.extend_from_slice(&chunk);
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StockForm::default());
    }

    let fields: StockFieldsBody = serde_json::from_slice(&body)
        .map_err(|err| Error::invalid_request(format!("request body is not valid JSON: {err}")))?;
    Ok(StockForm {
        draft: fields.into(),
        image: None,
    })
}

async fn read_field(field: &mut Field, received: &mut usize, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| {
            Error::invalid_request(format!("malformed multipart body: {err}"))
        })?;
        *received += chunk.len();
        if *received > limit {
            return Err(too_large(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn assign_text(draft: &mut StockDraft, name: &str, value: String) {
    let slot = match name {
        "name" => &mut draft.name,
        "category" => &mut draft.category,
        "quantity" => &mut draft.quantity,
        "unit" => &mut draft.unit,
        "expirationDate" => &mut draft.expiration_date,
        "notes" => &mut draft.notes,
        "user" => &mut draft.user,
        _ => return,
    };
    *slot = Some(value);
}

async fn read_multipart(
    req: &HttpRequest,
    payload: web::Payload,
    limit: usize,
) -> Result<StockForm, Error> {
    let mut multipart = Multipart::new(req.headers(), payload);
    let mut form = StockForm::default();
    let mut received = 0;

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|err| {
            Error::invalid_request(format!("malformed multipart body: {err}"))
        })?;
        let name = field.name().unwrap_or_default().to_owned();
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = read_field(&mut field, &mut received, limit).await?;

        if name == IMAGE_FIELD {
            // Browsers send an empty file part when no file was chosen.
            if bytes.is_empty() {
                continue;
            }
            let mut upload = ImageUpload::new(bytes);
            upload.filename = filename;
            upload.content_type = content_type;
            form.image = Some(upload);
            continue;
        }

        let text = String::from_utf8(bytes).map_err(|_| {
            Error::invalid_request(format!("form field `{name}` is not valid UTF-8"))
        })?;
        assign_text(&mut form.draft, &name, text);
    }

    Ok(form)
}
