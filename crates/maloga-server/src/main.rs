use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use maloga_api::auth::{self, AppState, AppStateInner};
use maloga_api::middleware::require_auth;
use maloga_api::{admin, education, forum, images, listings, profiles, slaughterhouses, videos};
use maloga_gateway::connection;
use maloga_gateway::dispatcher::Dispatcher;

#[derive(Clone)]
struct ServerState {
    dispatcher: Dispatcher,
    jwt_secret: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "maloga_server=debug,maloga_api=debug,maloga_db=debug,maloga_gateway=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("MALOGA_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("MALOGA_DB_PATH").unwrap_or_else(|_| "maloga.db".into());
    let upload_dir = std::env::var("MALOGA_UPLOAD_DIR").unwrap_or_else(|_| "./uploads".into());
    let host = std::env::var("MALOGA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("MALOGA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = maloga_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let dispatcher = Dispatcher::new();
    let app_state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: jwt_secret.clone(),
        dispatcher: dispatcher.clone(),
        upload_dir: PathBuf::from(&upload_dir),
    });

    let state = ServerState {
        dispatcher: dispatcher.clone(),
        jwt_secret: jwt_secret.clone(),
    };

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/marketplace", get(listings::marketplace))
        .route("/slaughterhouses", get(slaughterhouses::list_slaughterhouses))
        .route("/education", get(education::list_resources))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/me", get(profiles::me))
        .route("/listings", post(listings::create_listing))
        .route("/listings/{listing_id}", delete(listings::delete_listing))
        .route("/listings/{listing_id}/seller", get(listings::seller_contact))
        .route("/images", post(images::upload_image))
        .route("/questions", get(forum::list_questions))
        .route("/questions", post(forum::create_question))
        .route("/questions/{question_id}/answers", post(forum::create_answer))
        .route("/videos", get(videos::list_videos))
        .route("/videos", post(videos::create_video))
        .route("/videos/{video_id}/like", post(videos::toggle_like))
        .route("/admin/stats", get(admin::stats))
        .route("/admin/commissions", get(admin::list_commissions))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{user_id}/role", put(admin::set_user_role))
        .route("/admin/listings", get(admin::list_all_listings))
        .route("/admin/listings/{listing_id}/status", put(admin::set_listing_status))
        .route("/admin/listings/{listing_id}", delete(admin::delete_listing))
        .route("/admin/education", post(admin::create_resource))
        .route("/admin/education/{resource_id}", delete(admin::delete_resource))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let ws_route = Router::new()
        .route("/gateway", get(ws_upgrade))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(ws_route)
        .nest_service("/uploads", ServeDir::new(&upload_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Maloga server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_upgrade(
    State(state): State<ServerState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        connection::handle_connection(socket, state.dispatcher, state.jwt_secret)
    })
}
