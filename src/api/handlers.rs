use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    auth_service, catalog_service,
    loan_service::{self, ServiceDependencies},
    member_service,
};
use crate::auth::AuthKeys;
use crate::domain::commands::{BorrowBook, ReturnBook};
use crate::domain::value_objects::{AuthorId, BookId, LoanId, MemberId};

use super::{
    error::ApiError,
    extract::CurrentMember,
    types::{
        AuthorResponse, AvailabilityResponse, BookResponse, CreateAuthorRequest,
        CreateBookRequest, CreateLoanRequest, CreateUserRequest, LoanResponse, LoginForm,
        LoginResponse, Pagination, UserResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
pub struct AppState {
    pub service_deps: ServiceDependencies,
    pub auth_keys: AuthKeys,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /auth/login - アクセストークンを発行
///
/// form-encodedのusername（メールアドレス）とpasswordを受け付け、
/// Bearerトークンを返す。認証失敗は401。
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>, ApiError> {
    let member =
        auth_service::authenticate(&state.service_deps, &form.username, &form.password).await?;

    // 署名の失敗は認証失敗ではなくサーバー側の障害
    let access_token = state
        .auth_keys
        .issue(member.member_id, Utc::now())
        .map_err(|e| ApiError::Internal(Box::new(e)))?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

// ============================================================================
// Catalog (books / authors)
// ============================================================================

/// POST /books/authors - 著者を登録（要認証）
pub async fn create_author(
    State(state): State<Arc<AppState>>,
    _member: CurrentMember,
    Json(req): Json<CreateAuthorRequest>,
) -> Result<(StatusCode, Json<AuthorResponse>), ApiError> {
    let author = catalog_service::create_author(&state.service_deps, &req.name, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(AuthorResponse::from(author))))
}

/// GET /books/authors - 著者一覧を取得
pub async fn list_authors(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<AuthorResponse>>, ApiError> {
    let authors =
        catalog_service::list_authors(&state.service_deps, page.skip(), page.limit()).await?;

    Ok(Json(authors.into_iter().map(AuthorResponse::from).collect()))
}

/// POST /books - 書籍を登録（要認証）
///
/// 強制されるビジネスルール:
/// - 著者が存在すること
/// - ISBNが重複しないこと（409 DUPLICATE_ISBN）
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    _member: CurrentMember,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = catalog_service::create_book(
        &state.service_deps,
        &req.title,
        req.isbn.as_deref(),
        AuthorId::from_uuid(req.author_id),
        Utc::now(),
    )
    .await?;

    // 新規登録された書籍には未返却の貸出が存在しない
    Ok((StatusCode::CREATED, Json(BookResponse::from_book(book, true))))
}

/// GET /books - 書籍一覧を取得（空き状況付き）
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = catalog_service::list_books(&state.service_deps, page.skip(), page.limit()).await?;

    Ok(Json(
        books
            .into_iter()
            .map(|(book, available)| BookResponse::from_book(book, available))
            .collect(),
    ))
}

/// GET /books/:id/availability - 書籍の空き状況を確認
pub async fn book_availability(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let book_id = BookId::from_uuid(book_id);
    let available = catalog_service::book_availability(&state.service_deps, book_id).await?;

    Ok(Json(AvailabilityResponse {
        book_id: book_id.value(),
        available,
    }))
}

// ============================================================================
// Users (members)
// ============================================================================

/// POST /users - 会員を登録
///
/// 強制されるビジネスルール:
/// - メールアドレスが重複しないこと（409 DUPLICATE_EMAIL）
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let member = member_service::create_member(
        &state.service_deps,
        &req.name,
        &req.email,
        &req.password,
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(member))))
}

/// GET /users - 会員一覧を取得
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let members = member_service::list_members(&state.service_deps, page.skip(), page.limit()).await?;

    Ok(Json(members.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/:id - 会員をIDで取得
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let member =
        member_service::get_member(&state.service_deps, MemberId::from_uuid(member_id)).await?;

    Ok(Json(UserResponse::from(member)))
}

/// GET /users/:id/loans - 会員の貸出履歴を取得
pub async fn user_loans(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans = member_service::member_loans(
        &state.service_deps,
        MemberId::from_uuid(member_id),
        page.skip(),
        page.limit(),
    )
    .await?;

    let now = Utc::now();
    Ok(Json(
        loans.iter().map(|l| LoanResponse::from_loan(l, now)).collect(),
    ))
}

// ============================================================================
// Loans
// ============================================================================

/// POST /loans - 新しい貸出を作成（要認証）
///
/// 強制されるビジネスルール:
/// - 会員が存在し、有効であること
/// - 会員の未返却の貸出が3冊未満であること（400 LOAN_LIMIT_EXCEEDED）
/// - 書籍が貸出可能であること（400 BOOK_UNAVAILABLE）
pub async fn create_loan(
    State(state): State<Arc<AppState>>,
    _member: CurrentMember,
    Json(req): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let now = Utc::now();
    let cmd = BorrowBook {
        book_id: BookId::from_uuid(req.book_id),
        member_id: MemberId::from_uuid(req.user_id),
        borrowed_at: now,
    };

    let loan = loan_service::borrow_book(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(LoanResponse::from_loan(&loan, now))))
}

/// POST /loans/:id/return - 書籍を返却（要認証）
///
/// 強制されるビジネスルール:
/// - 貸出が存在すること
/// - 既に返却済みでないこと（400 ALREADY_RETURNED、冪等ではない）
///
/// 延滞料金は返却時に確定し、レスポンスのlate_feeに含まれる。
pub async fn return_loan(
    State(state): State<Arc<AppState>>,
    _member: CurrentMember,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let now = Utc::now();
    let cmd = ReturnBook {
        loan_id: LoanId::from_uuid(loan_id),
        returned_at: now,
    };

    let loan = loan_service::return_book(&state.service_deps, cmd).await?;

    Ok(Json(LoanResponse::from_loan(&loan, now)))
}

/// GET /loans/active-delayed - 未返却の貸出一覧を取得
///
/// ACTIVEまたはOVERDUEの貸出のみを返す。パス名は既存クライアントとの
/// 互換のため維持しているが、ステータスの語彙はOVERDUEが正準。
pub async fn list_open_loans(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<LoanResponse>>, ApiError> {
    let loans =
        loan_service::list_open_loans(&state.service_deps, page.skip(), page.limit()).await?;

    let now = Utc::now();
    Ok(Json(
        loans.iter().map(|l| LoanResponse::from_loan(l, now)).collect(),
    ))
}

/// GET /loans/:id - 貸出詳細をIDで取得
pub async fn get_loan(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = loan_service::get_loan(&state.service_deps, LoanId::from_uuid(loan_id)).await?;

    Ok(Json(LoanResponse::from_loan(&loan, Utc::now())))
}
