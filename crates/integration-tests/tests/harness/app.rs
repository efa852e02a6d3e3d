//! Demo news site the end-to-end suites run against

use axum::extract::Request;
use axum::middleware::{Next, from_fn};
use axum::routing::{get, post};
use axum::{Json, Router};
use gatehouse_validate::{
    Failures, FieldBinding, HttpRequest, RequestValidator, SourceKind, Validated, take_errors,
    take_old_input,
};
use http::request::Parts;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use validator::Validate;

/// JSON-body descriptor; `author` travels as `author_email` on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateNews {
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub text: String,
    #[serde(rename = "author_email")]
    #[validate(email(message = "must be a valid email"))]
    pub author: String,
}

impl HttpRequest for CreateNews {
    const SOURCE: SourceKind = SourceKind::Json;

    const BINDINGS: &'static [FieldBinding<Self>] =
        &[FieldBinding::opaque("author").keyed("author_email")];

    fn validate(&self, _parts: &Parts) -> Result<(), Failures> {
        Validate::validate(self).map_err(Failures::from)
    }
}

/// URL-encoded-body descriptor for the browser form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateNewsForm {
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub text: String,
}

impl HttpRequest for CreateNewsForm {
    const SOURCE: SourceKind = SourceKind::Form;

    fn validate(&self, _parts: &Parts) -> Result<(), Failures> {
        Validate::validate(self).map_err(Failures::from)
    }
}

/// XML-body descriptor for the legacy feed import
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateNewsXml {
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub text: String,
}

impl HttpRequest for CreateNewsXml {
    const SOURCE: SourceKind = SourceKind::Xml;

    fn validate(&self, _parts: &Parts) -> Result<(), Failures> {
        Validate::validate(self).map_err(Failures::from)
    }
}

/// Query-string descriptor with all three coercions
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SearchQuery {
    #[serde(rename = "q")]
    #[validate(length(min = 1, message = "cannot be blank"))]
    pub search: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub page: i64,
    pub exact: bool,
}

impl HttpRequest for SearchQuery {
    const SOURCE: SourceKind = SourceKind::Query;

    const BINDINGS: &'static [FieldBinding<Self>] = &[
        FieldBinding::text("search", |request: &mut Self, value| request.search = value).keyed("q"),
        FieldBinding::integer("page", |request, value| request.page = value),
        FieldBinding::boolean("exact", |request, value| request.exact = value),
    ];

    fn validate(&self, _parts: &Parts) -> Result<(), Failures> {
        Validate::validate(self).map_err(Failures::from)
    }
}

/// Route-parameter descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ShowArticle {
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub id: i64,
}

impl HttpRequest for ShowArticle {
    const SOURCE: SourceKind = SourceKind::Params;

    const BINDINGS: &'static [FieldBinding<Self>] =
        &[FieldBinding::integer("id", |request, value| request.id = value)];

    fn validate(&self, _parts: &Parts) -> Result<(), Failures> {
        Validate::validate(self).map_err(Failures::from)
    }
}

async fn landing() -> &'static str {
    "gatehouse demo"
}

async fn new_news_form() -> &'static str {
    "the news form"
}

async fn create_news(Validated(news): Validated<CreateNews>) -> Json<CreateNews> {
    Json(news)
}

async fn create_news_form(Validated(news): Validated<CreateNewsForm>) -> Json<CreateNewsForm> {
    Json(news)
}

async fn create_news_xml(Validated(news): Validated<CreateNewsXml>) -> Json<CreateNewsXml> {
    Json(news)
}

async fn search_news(Validated(query): Validated<SearchQuery>) -> Json<SearchQuery> {
    Json(query)
}

async fn show_article(Validated(article): Validated<ShowArticle>) -> Json<ShowArticle> {
    Json(article)
}

/// What a form page would re-render from: the flashed errors and input
async fn read_flash(session: Session) -> Json<Value> {
    let errors = take_errors(&session).await.ok().flatten();
    let old_input = take_old_input(&session).await.ok().flatten();
    Json(json!({"errors": errors, "old_input": old_input}))
}

async fn panic_with_string() -> &'static str {
    let detail = "lost".to_owned();
    panic!("news backend {detail}");
}

async fn panic_with_str() -> &'static str {
    panic!("news backend wiring broken");
}

async fn panic_with_error() -> &'static str {
    std::panic::panic_any(anyhow::anyhow!("database handle lost"));
}

async fn panic_with_api_error() -> &'static str {
    std::panic::panic_any(gatehouse_core::ApiError::forbidden());
}

async fn panic_with_opaque_value() -> &'static str {
    std::panic::panic_any(42_i32);
}

/// Attach the validation middleware for `T` to a route
fn validated<T: HttpRequest>(
    route: axum::routing::MethodRouter,
    validator: &RequestValidator,
) -> axum::routing::MethodRouter {
    let validator = validator.clone();
    route.layer(from_fn(move |request: Request, next: Next| {
        let validator = validator.clone();
        async move { validator.validate_request::<T>(request, next).await }
    }))
}

/// The demo router, validation middleware attached per route
pub fn router(validator: &RequestValidator) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/news/new", get(new_news_form))
        .route("/news", validated::<CreateNews>(post(create_news), validator))
        .route(
            "/news/form",
            validated::<CreateNewsForm>(post(create_news_form), validator),
        )
        .route(
            "/news/xml",
            validated::<CreateNewsXml>(post(create_news_xml), validator),
        )
        .route(
            "/news/search",
            validated::<SearchQuery>(get(search_news), validator),
        )
        .route(
            "/articles/{id}",
            validated::<ShowArticle>(get(show_article), validator),
        )
        .route("/flash", get(read_flash))
        .route("/panic/string", get(panic_with_string))
        .route("/panic/str", get(panic_with_str))
        .route("/panic/error", get(panic_with_error))
        .route("/panic/api-error", get(panic_with_api_error))
        .route("/panic/opaque", get(panic_with_opaque_value))
}
