//! # HTTP Server for Badge Layouts and Printing
//!
//! Exposes the field schema tools, the badge layout, and the print flow
//! over a JSON API.
//!
//! ## Usage
//!
//! ```bash
//! lanyard serve --listen 0.0.0.0:8080 --data-dir ./data --records seed.json
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Body → Response |
//! |--------|------|-----------------|
//! | GET/PUT | `/api/layout` | layout config |
//! | POST | `/api/layout/elements/id` | `{id}` |
//! | POST | `/api/fields/schema` | field list → schema |
//! | POST | `/api/fields/validate` | `{schema, values}` → report |
//! | POST | `/api/fields/export` | `{schema, records}` → `{header, rows}` |
//! | POST | `/api/badges/preview` | badge request → draw list |
//! | POST | `/api/badges/render` | badge request → PDF |
//! | POST | `/api/badges/:kind/:id/print` | `{eventId?, printedBy}` → PDF |
//! | GET | `/api/barcodes/:code` | `{valid, segments}` |
//! | POST | `/api/records/:kind` | values → record |
//! | GET/PUT | `/api/records/:kind/:id` | values → record |
//! | PUT | `/api/events/:id/layout` | layout config |

mod handlers;
mod state;

pub use handlers::badges::{BARCODE_HEADER, STATUS_HEADER};
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::LanyardError;

/// Build the API router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Layout
        .route(
            "/api/layout",
            get(handlers::layout::get).put(handlers::layout::put),
        )
        .route(
            "/api/layout/elements/id",
            post(handlers::layout::new_element_id),
        )
        // Custom fields
        .route("/api/fields/schema", post(handlers::fields::schema))
        .route("/api/fields/validate", post(handlers::fields::validate))
        .route("/api/fields/export", post(handlers::fields::export))
        // Badges
        .route("/api/badges/preview", post(handlers::badges::preview))
        .route("/api/badges/render", post(handlers::badges::render))
        .route(
            "/api/badges/:kind/:id/print",
            post(handlers::badges::print),
        )
        .route("/api/barcodes/:code", get(handlers::badges::lookup))
        // Records
        .route("/api/records/:kind", post(handlers::records::create))
        .route(
            "/api/records/:kind/:id",
            get(handlers::records::get).put(handlers::records::put),
        )
        .route(
            "/api/events/:id/layout",
            put(handlers::records::put_event_layout),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use lanyard::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), lanyard::LanyardError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     data_dir: "./data".into(),
///     records_path: None,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LanyardError> {
    let state = Arc::new(AppState::new(&config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            LanyardError::Persistence(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    tracing::info!(
        listen = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        "lanyard server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| LanyardError::Persistence(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::layout::{BadgeLayoutConfig, KeyValueStore, MemoryStore, PaperSize};
    use crate::print::MemoryRepository;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, LanyardError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), LanyardError> {
            Err(LanyardError::Persistence("quota exceeded".into()))
        }
    }

    fn app_with_store(store: Arc<dyn KeyValueStore>) -> Router {
        let state = AppState::with_parts(store, Arc::new(MemoryRepository::new()));
        router(Arc::new(state))
    }

    fn app() -> Router {
        app_with_store(Arc::new(MemoryStore::new()))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, bytes.to_vec())
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_layout_defaults() {
        let app = app();
        let (status, _, body) = send(&app, "GET", "/api/layout", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["paperSize"], "A6");
    }

    #[tokio::test]
    async fn test_failed_save_keeps_layout_active() {
        let app = app_with_store(Arc::new(ReadOnlyStore));
        let mut layout = BadgeLayoutConfig::default();
        layout.paper_size = PaperSize::A4;

        let (status, _, body) = send(
            &app,
            "PUT",
            "/api/layout",
            Some(serde_json::to_value(&layout).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["saved"], false);

        let (_, _, body) = send(&app, "GET", "/api/layout", None).await;
        assert_eq!(json_body(&body)["paperSize"], "A4");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_layout_saves_agree() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with_store(store.clone());

        let mut sends = Vec::new();
        for i in 0..24 {
            let mut layout = BadgeLayoutConfig::default();
            layout.paper_size = if i % 2 == 0 { PaperSize::A4 } else { PaperSize::A6 };
            layout.show_border = i % 3 == 0;
            let app = app.clone();
            sends.push(tokio::spawn(async move {
                send(
                    &app,
                    "PUT",
                    "/api/layout",
                    Some(serde_json::to_value(&layout).unwrap()),
                )
                .await
            }));
        }
        for task in sends {
            task.await.unwrap();
        }

        let (_, _, body) = send(&app, "GET", "/api/layout", None).await;
        let active: BadgeLayoutConfig = serde_json::from_slice(&body).unwrap();
        let stored = crate::layout::load_layout_config(store.as_ref()).unwrap();
        assert_eq!(stored, active);
    }

    #[tokio::test]
    async fn test_element_id() {
        let (status, _, body) = send(&app(), "POST", "/api/layout/elements/id", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = json_body(&body)["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("element-"));
    }

    #[tokio::test]
    async fn test_duplicate_field_rejected() {
        let fields = json!([
            {"name": "company", "type": "text", "label": "Company"},
            {"name": "company", "type": "text", "label": "Company again"}
        ]);
        let (status, _, body) = send(&app(), "POST", "/api/fields/schema", Some(fields)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(String::from_utf8_lossy(&body).contains("company"));
    }

    #[tokio::test]
    async fn test_validate_and_export() {
        let schema = json!([
            {"name": "email", "type": "email", "label": "Email", "required": true},
            {"name": "vip", "type": "checkbox", "label": "VIP"}
        ]);
        let (status, _, body) = send(
            &app(),
            "POST",
            "/api/fields/validate",
            Some(json!({"schema": schema, "values": {"email": "not-an-email"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let report = json_body(&body);
        assert_eq!(report["errors"]["email"]["kind"], "invalidFieldValue");
        assert_eq!(report["values"]["vip"], false);

        let (status, _, body) = send(
            &app(),
            "POST",
            "/api/fields/export",
            Some(json!({"schema": schema, "records": [{"email": "a@b.co", "vip": true}, {}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body),
            json!({
                "header": ["Email", "VIP"],
                "rows": [["a@b.co", "Yes"], ["-", "-"]]
            })
        );
    }

    #[tokio::test]
    async fn test_preview_uses_active_layout() {
        let app = app();
        let request = json!({
            "recordId": "p1",
            "name": "Ada Lovelace",
            "barcode": "123456789012",
            "valueMap": {"firstName": "Ada", "lastName": "Lovelace"}
        });
        let (status, _, body) = send(&app, "POST", "/api/badges/preview", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        let list = json_body(&body);
        assert_eq!(list["widthMm"], 105.0);
        let texts: Vec<&Value> = list["ops"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|op| op["op"] == "text")
            .collect();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0]["value"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_render_rejects_blank_barcode() {
        let request = json!({"recordId": "p1", "name": "Ada", "barcode": " "});
        let (status, _, _) = send(&app(), "POST", "/api/badges/render", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_print_then_reprint() {
        let app = app();
        let (status, _, _) = send(
            &app,
            "PUT",
            "/api/records/staff/s1",
            Some(json!({"firstName": "Grace", "lastName": "Hopper"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body = json!({"printedBy": "front-desk"});
        let (status, headers, pdf) =
            send(&app, "POST", "/api/badges/staff/s1/print", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "application/pdf");
        assert_eq!(headers[STATUS_HEADER], "printed");
        assert!(pdf.starts_with(b"%PDF"));
        let barcode = headers[BARCODE_HEADER].to_str().unwrap().to_string();
        assert!(barcode.starts_with("STAFF-s1-"));

        let (_, headers, _) = send(&app, "POST", "/api/badges/staff/s1/print", Some(body)).await;
        assert_eq!(headers[STATUS_HEADER], "reprinted");
        assert_eq!(headers[BARCODE_HEADER].to_str().unwrap(), barcode);

        let (_, _, record) = send(&app, "GET", "/api/records/staff/s1", None).await;
        let record = json_body(&record);
        assert_eq!(record["badgeId"], barcode.as_str());
        assert_eq!(record["badgePrintedBy"], "front-desk");
        assert_eq!(record["valueMap"]["firstName"], "Grace");
    }

    #[tokio::test]
    async fn test_value_update_keeps_badge_id() {
        let app = app();
        send(
            &app,
            "PUT",
            "/api/records/participant/p1",
            Some(json!({"name": "Walk-in"})),
        )
        .await;
        let (_, headers, _) = send(
            &app,
            "POST",
            "/api/badges/participant/p1/print",
            Some(json!({"printedBy": "desk"})),
        )
        .await;
        let barcode = headers[BARCODE_HEADER].to_str().unwrap().to_string();

        let (status, _, body) = send(
            &app,
            "PUT",
            "/api/records/participant/p1",
            Some(json!({"name": "Walk-in Guest"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let record = json_body(&body);
        assert_eq!(record["badgeId"], barcode.as_str());
        assert_eq!(record["valueMap"]["name"], "Walk-in Guest");
    }

    #[tokio::test]
    async fn test_print_errors() {
        let app = app();
        let body = json!({"printedBy": "admin"});
        let (status, _, _) =
            send(&app, "POST", "/api/badges/participant/nope/print", Some(body.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) =
            send(&app, "POST", "/api/badges/hall/h1/print", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) =
            send(&app, "POST", "/api/badges/speaker/x/print", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_record() {
        let (status, _, body) = send(
            &app(),
            "POST",
            "/api/records/participant",
            Some(json!({"name": "Walk-in"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let record = json_body(&body);
        assert!(uuid::Uuid::parse_str(record["id"].as_str().unwrap()).is_ok());
        assert_eq!(record["kind"], "participant");
    }

    #[tokio::test]
    async fn test_barcode_lookup() {
        let (_, _, body) = send(&app(), "GET", "/api/barcodes/EVT1-HALL2-ROW3-7", None).await;
        assert_eq!(
            json_body(&body),
            json!({"valid": true, "segments": ["EVT1", "HALL2", "ROW3", "7"]})
        );

        let (_, _, body) = send(&app(), "GET", "/api/barcodes/abc", None).await;
        assert_eq!(json_body(&body), json!({"valid": false, "segments": null}));
    }
}
