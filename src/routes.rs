// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, contact, quiz, ticket},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public routes: OTP, sign-up, login, active question, responders, contact info.
/// * Authenticated routes: answer submission and tickets.
/// * Admin routes: question management, rotation, ticket replies, contact info.
/// * Global middleware: Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let public_routes = Router::new()
        .route("/send-otp/", post(auth::send_otp))
        .route("/verify-otp/", post(auth::verify_otp))
        .route("/sign-up/", post(auth::sign_up))
        .route("/login/", post(auth::login))
        .route("/active-question/", get(quiz::active_question))
        .route("/correct-responders/", get(quiz::correct_responders))
        .route(
            "/correct-responders/{question_id}/",
            get(quiz::correct_responders_for),
        )
        .route("/contact-info/", get(contact::get_contact_info));

    let user_routes = Router::new()
        .route("/submit-response/", post(quiz::submit_response))
        .route(
            "/submit-response/{question_id}/",
            post(quiz::submit_response_for),
        )
        .route(
            "/tickets/",
            get(ticket::list_my_tickets).post(ticket::create_ticket),
        )
        .route("/tickets/{id}/", get(ticket::get_ticket))
        .layer(auth_layer.clone());

    // Double middleware protection: Auth first, then Admin check
    let staff_routes = Router::new()
        .route("/tickets/{id}/reply/", post(ticket::reply_ticket))
        .route(
            "/admin/questions",
            get(admin::list_questions).post(admin::create_question),
        )
        .route("/admin/questions/{id}", delete(admin::delete_question))
        .route(
            "/admin/questions/{id}/activate",
            post(admin::activate_question),
        )
        .route("/admin/rotate", post(admin::rotate_now))
        .route("/admin/tickets", get(ticket::list_all_tickets))
        .route("/admin/contact-info", put(contact::put_contact_info))
        .layer(middleware::from_fn(admin_middleware))
        .layer(auth_layer);

    let api = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(staff_routes);

    Router::new()
        .nest("/api", api)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
