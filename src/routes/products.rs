use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::products::{AddImageRequest, MoveImageRequest, ProductList, ProductRequest},
    error::AppResult,
    middleware::auth::AdminSession,
    models::Product,
    response::{Deleted, created},
    routes::params::{LocaleQuery, ProductQuery},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/images", post(add_image))
        .route("/{id}/images/{index}", delete(remove_image))
        .route("/{id}/images/{index}/move", post(move_image))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("featured" = Option<bool>, Query, description = "Only featured products"),
        ("category" = Option<String>, Query, description = "Exact category"),
        ("q" = Option<String>, Query, description = "Search in names and category"),
        ("low_stock" = Option<i32>, Query, description = "Only products with stock below this value"),
        ("limit" = Option<u64>, Query, description = "Maximum number of products, 1-100"),
        ("sort_by" = Option<String>, Query, description = "created_at, price, name"),
        ("sort_order" = Option<String>, Query, description = "asc, desc (default)"),
        ("locale" = Option<String>, Query, description = "en, fr, es, zh"),
    ),
    responses(
        (status = 200, description = "List products", body = ProductList)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ProductList>> {
    let list = product_service::list_products(&state, query).await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("locale" = Option<String>, Query, description = "en, fr, es, zh"),
    ),
    responses(
        (status = 200, description = "Get product", body = Product),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<LocaleQuery>,
) -> AppResult<Json<Product>> {
    let product = product_service::get_product(&state, id, query.locale.unwrap_or_default()).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Create product", body = Product),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    session: AdminSession,
    Json(payload): Json<ProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = product_service::create_product(&state, &session, payload).await?;
    Ok(created(product))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Replaced product", body = Product),
        (status = 400, description = "Invalid product"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductRequest>,
) -> AppResult<Json<Product>> {
    let product = product_service::replace_product(&state, &session, id, payload).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = Deleted),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Deleted>> {
    let deleted = product_service::delete_product(&state, &session, id).await?;
    Ok(Json(deleted))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = AddImageRequest,
    responses(
        (status = 200, description = "Image appended", body = Product),
        (status = 400, description = "Unknown upload or unsupported URL"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_image(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddImageRequest>,
) -> AppResult<Json<Product>> {
    let product = product_service::add_image(&state, &session, id, payload.url).await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/images/{index}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("index" = usize, Path, description = "Position in the gallery, 0 is primary"),
    ),
    responses(
        (status = 200, description = "Image removed", body = Product),
        (status = 400, description = "Index out of range or last image"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn remove_image(
    State(state): State<AppState>,
    session: AdminSession,
    Path((id, index)): Path<(Uuid, usize)>,
) -> AppResult<Json<Product>> {
    let product = product_service::remove_image(&state, &session, id, index).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/images/{index}/move",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("index" = usize, Path, description = "Position in the gallery, 0 is primary"),
    ),
    request_body = MoveImageRequest,
    responses(
        (status = 200, description = "Gallery after the move", body = Product),
        (status = 400, description = "Index out of range"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn move_image(
    State(state): State<AppState>,
    session: AdminSession,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(payload): Json<MoveImageRequest>,
) -> AppResult<Json<Product>> {
    let product =
        product_service::move_image(&state, &session, id, index, payload.direction).await?;
    Ok(Json(product))
}
