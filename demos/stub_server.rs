use argh::FromArgs;
use axum::{
    Json, Router,
    extract::Multipart,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use upload_query::QueryResponse;

// defaults for the server
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

#[derive(FromArgs)]
/// Stand-in backend that answers upload-and-query requests with canned markdown.
struct StubArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,
}

fn reject(detail: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "detail": detail.into() })),
    )
}

async fn upload_and_query(mut multipart: Multipart) -> impl IntoResponse {
    let mut image: Option<(String, usize)> = None;
    let mut query: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return reject(e.body_text()),
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let content_type = field.content_type().unwrap_or("unknown").to_string();
                match field.bytes().await {
                    Ok(bytes) => image = Some((content_type, bytes.len())),
                    Err(e) => return reject(e.body_text()),
                }
            }
            Some("query") => match field.text().await {
                Ok(text) => query = Some(text),
                Err(e) => return reject(e.body_text()),
            },
            _ => {}
        }
    }

    let (Some((content_type, size)), Some(query)) = (image, query) else {
        return reject("Both an image and a query are required");
    };
    if size == 0 {
        return reject("Empty file");
    }

    log::info!("Answering {query:?} about a {size} byte {content_type} image");

    let response = QueryResponse {
        llama: format!("**llama** saw `{content_type}` ({size} bytes) and was asked:\n\n> {query}"),
        llava: format!("**llava** has no model loaded.\n\n- query: {query}\n- bytes: {size}"),
    };
    (StatusCode::OK, Json(json!(response)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: StubArgs = argh::from_env();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let app = Router::new()
        .route("/", get(|| async { "upload-query stub backend" }))
        .route("/upload_and_query", post(upload_and_query));

    log::info!("Listening on: {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
