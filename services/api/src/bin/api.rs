//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{fixtures, InMemoryStore, OpenAiStudyAdapter},
    config::Config,
    error::ApiError,
    web::{
        documents, get_course_handler, get_profile_handler, list_courses_handler, notes, quizzes,
        state::AppState, study_tools, timetable, ApiDoc,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use study_dashboard_core::StudyTools;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Set Up the Store ---
    let store = Arc::new(InMemoryStore::new());
    if config.seed_fixtures {
        info!("Seeding demo fixtures...");
        fixtures::seed(store.as_ref()).await?;
    }

    // --- 3. Initialize the Study Assistant ---
    let mut openai_config = OpenAIConfig::new().with_api_key(config.require_openai_api_key()?);
    if let Some(api_base) = &config.openai_api_base {
        openai_config = openai_config.with_api_base(api_base);
    }
    let openai_client = Client::with_config(openai_config);
    let study_adapter = Arc::new(OpenAiStudyAdapter::new(
        openai_client,
        config.study_model.clone(),
    ));
    let study_tools =
        StudyTools::new(study_adapter).with_mismatch_policy(config.quiz_answer_policy);
    info!(
        "Study tools use model '{}' with answer policy {:?}",
        config.study_model,
        study_tools.mismatch_policy()
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(store, study_tools));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let course_routes = Router::new()
        .route("/profile", get(get_profile_handler))
        .route("/courses", get(list_courses_handler))
        .route("/courses/{id}", get(get_course_handler))
        .route("/courses/{id}/documents", post(documents::upload_document_handler))
        .route("/courses/{id}/quizzes/generate", post(quizzes::generate_quiz_handler));

    let note_routes = Router::new()
        .route("/notes", get(notes::list_notes_handler).post(notes::create_note_handler))
        .route(
            "/notes/{id}",
            put(notes::update_note_handler).delete(notes::delete_note_handler),
        )
        .route("/notes/{id}/summarize", post(notes::summarize_note_handler));

    let document_routes = Router::new()
        .route("/documents", get(documents::list_documents_handler))
        .route("/documents/{id}", delete(documents::delete_document_handler))
        .route("/documents/{id}/summarize", post(documents::summarize_document_handler))
        .route("/documents/{id}/flashcards", post(documents::generate_flashcards_handler));

    let quiz_routes = Router::new()
        .route("/quizzes", get(quizzes::list_quizzes_handler))
        .route("/quizzes/{id}", get(quizzes::get_quiz_handler))
        .route("/quizzes/{id}/start", post(quizzes::start_quiz_handler))
        .route("/quizzes/{id}/attempts", post(quizzes::submit_attempt_handler))
        .route("/attempts", get(quizzes::list_attempts_handler))
        .route("/attempts/{id}", get(quizzes::get_attempt_handler));

    let timetable_routes = Router::new()
        .route(
            "/timetable",
            get(timetable::list_events_handler).post(timetable::create_event_handler),
        )
        .route("/timetable/grid", get(timetable::grid_handler))
        .route("/timetable/upcoming", get(timetable::upcoming_handler))
        .route(
            "/timetable/{id}",
            put(timetable::update_event_handler).delete(timetable::delete_event_handler),
        );

    let study_tool_routes = Router::new()
        .route("/study-tools/summarize", post(study_tools::summarize_handler))
        .route("/study-tools/quiz", post(study_tools::quiz_handler))
        .route("/study-tools/flashcards", post(study_tools::flashcards_handler));

    // Combine API routes
    let api_router = Router::new()
        .merge(course_routes)
        .merge(note_routes)
        .merge(document_routes)
        .merge(quiz_routes)
        .merge(timetable_routes)
        .merge(study_tool_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
