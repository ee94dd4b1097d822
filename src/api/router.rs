use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, book_availability, create_author, create_book, create_loan, create_user, get_loan,
    get_user, list_authors, list_books, list_open_loans, list_users, login, return_loan,
    user_loans,
};

/// Creates the API router with all endpoints
///
/// Public endpoints:
/// - POST /auth/login, POST /users, all GET endpoints
///
/// Protected endpoints (Bearer token required):
/// - POST /books, POST /books/authors, POST /loans, POST /loans/:id/return
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Auth
        .route("/auth/login", post(login))
        // Catalog
        .route("/books", get(list_books).post(create_book))
        .route("/books/authors", get(list_authors).post(create_author))
        .route("/books/:id/availability", get(book_availability))
        // Members
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
        .route("/users/:id/loans", get(user_loans))
        // Loans
        .route("/loans", post(create_loan))
        .route("/loans/active-delayed", get(list_open_loans))
        .route("/loans/:id", get(get_loan))
        .route("/loans/:id/return", post(return_loan))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
