use std::collections::HashSet;

use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::{
        dashboard::LowStockProduct,
        products::{ProductList, ProductRequest},
    },
    entity::products::{ActiveModel, Column, Entity as Products, ImageList, Model as ProductModel},
    error::{AppError, AppResult},
    gallery::{ImageGallery, MoveDirection},
    middleware::auth::AdminSession,
    models::{Locale, Product},
    response::Deleted,
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
    storage,
};

/// Products with fewer units than this are flagged on the dashboard.
pub const LOW_STOCK_THRESHOLD: i32 = 10;
const MAX_LIST_LIMIT: u64 = 100;

pub async fn list_products(state: &AppState, query: ProductQuery) -> AppResult<ProductList> {
    let locale = query.locale.unwrap_or_default();
    let mut condition = Condition::all();

    if let Some(featured) = query.featured {
        condition = condition.add(Column::Featured.eq(featured));
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::NameEn).ilike(pattern.clone()))
                .add(Expr::col(Column::NameFr).ilike(pattern.clone()))
                .add(Expr::col(Column::Category).ilike(pattern)),
        );
    }

    if let Some(threshold) = query.low_stock {
        condition = condition.add(Column::Stock.lt(threshold));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::NameEn,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    if let Some(limit) = query.limit {
        finder = finder.limit(limit.clamp(1, MAX_LIST_LIMIT));
    }

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| Product::from_entity(model, locale))
        .collect();

    Ok(ProductList { items })
}

pub async fn get_product(state: &AppState, id: Uuid, locale: Locale) -> AppResult<Product> {
    let model = find_model(&state.orm, id).await?;
    Ok(Product::from_entity(model, locale))
}

pub async fn create_product(
    state: &AppState,
    session: &AdminSession,
    payload: ProductRequest,
) -> AppResult<Product> {
    let payload = payload.trimmed();
    payload.validate()?;
    let images = ImageGallery::from_urls(payload.images.clone()).commit()?;
    let name = payload.name();
    let description = payload.description();

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name_en: Set(name.en),
        name_fr: Set(name.fr),
        description_en: Set(description.en),
        description_fr: Set(description.fr),
        category: Set(payload.category),
        price: Set(payload.price),
        images: Set(ImageList(images)),
        stock: Set(payload.stock),
        featured: Set(payload.featured),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    tracing::info!(product_id = %product.id, "product created");
    audit::record(
        &state.orm,
        Some(session.admin_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(Product::from_entity(product, Locale::En))
}

/// Replaces every editable field, `images` included.
pub async fn replace_product(
    state: &AppState,
    session: &AdminSession,
    id: Uuid,
    payload: ProductRequest,
) -> AppResult<Product> {
    let payload = payload.trimmed();
    payload.validate()?;
    let images = ImageGallery::from_urls(payload.images.clone()).commit()?;
    let existing = find_model(&state.orm, id).await?;
    let name = payload.name();
    let description = payload.description();

    let mut active: ActiveModel = existing.into();
    active.name_en = Set(name.en);
    active.name_fr = Set(name.fr);
    active.description_en = Set(description.en);
    active.description_fr = Set(description.fr);
    active.category = Set(payload.category);
    active.price = Set(payload.price);
    active.images = Set(ImageList(images));
    active.stock = Set(payload.stock);
    active.featured = Set(payload.featured);

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(session.admin_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(Product::from_entity(product, Locale::En))
}

/// Hard delete. Stored image files are left for the orphan sweep.
pub async fn delete_product(
    state: &AppState,
    session: &AdminSession,
    id: Uuid,
) -> AppResult<Deleted> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        Some(session.admin_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(Deleted::new(id))
}

pub async fn add_image(
    state: &AppState,
    session: &AdminSession,
    id: Uuid,
    url: String,
) -> AppResult<Product> {
    let url = url.trim().to_string();
    match storage::stored_name(&url) {
        Some(name) => {
            if !state.uploads.exists(name).await {
                return Err(AppError::bad_request("Unknown upload"));
            }
        }
        None if url.starts_with("https://") || url.starts_with("http://") => {}
        None => return Err(AppError::bad_request("Unsupported image URL")),
    }

    let existing = find_model(&state.orm, id).await?;
    let mut gallery = ImageGallery::from_urls(existing.images.0.clone());
    gallery.append(url.clone(), None);

    let product = save_gallery(&state.orm, existing, gallery).await?;
    audit::record(
        &state.orm,
        Some(session.admin_id),
        "product_image_add",
        "products",
        serde_json::json!({ "product_id": id, "url": url }),
    )
    .await;

    Ok(product)
}

/// Removing the primary image promotes the next one. The last image cannot be
/// removed.
pub async fn remove_image(
    state: &AppState,
    session: &AdminSession,
    id: Uuid,
    index: usize,
) -> AppResult<Product> {
    let existing = find_model(&state.orm, id).await?;
    let mut gallery = ImageGallery::from_urls(existing.images.0.clone());
    let removed = gallery
        .remove(index)
        .ok_or_else(|| AppError::bad_request("Image index out of range"))?;

    let product = save_gallery(&state.orm, existing, gallery).await?;
    audit::record(
        &state.orm,
        Some(session.admin_id),
        "product_image_remove",
        "products",
        serde_json::json!({ "product_id": id, "url": removed.url }),
    )
    .await;

    Ok(product)
}

/// Moving past either end leaves the product untouched.
pub async fn move_image(
    state: &AppState,
    session: &AdminSession,
    id: Uuid,
    index: usize,
    direction: MoveDirection,
) -> AppResult<Product> {
    let existing = find_model(&state.orm, id).await?;
    let mut gallery = ImageGallery::from_urls(existing.images.0.clone());
    if gallery.get(index).is_none() {
        return Err(AppError::bad_request("Image index out of range"));
    }

    if !gallery.move_image(index, direction) {
        return Ok(Product::from_entity(existing, Locale::En));
    }

    let product = save_gallery(&state.orm, existing, gallery).await?;
    audit::record(
        &state.orm,
        Some(session.admin_id),
        "product_image_move",
        "products",
        serde_json::json!({ "product_id": id, "index": index, "direction": direction }),
    )
    .await;

    Ok(product)
}

pub async fn count_products(conn: &DatabaseConnection) -> AppResult<u64> {
    Ok(Products::find().count(conn).await?)
}

pub async fn low_stock_products(
    conn: &DatabaseConnection,
    threshold: i32,
) -> AppResult<Vec<LowStockProduct>> {
    let items = Products::find()
        .filter(Column::Stock.lt(threshold))
        .order_by_asc(Column::Stock)
        .all(conn)
        .await?
        .into_iter()
        .map(|model| LowStockProduct {
            id: model.id,
            name: model.name_en,
            stock: model.stock,
        })
        .collect();
    Ok(items)
}

/// File names of every stored upload that some product still points at.
pub async fn referenced_uploads(conn: &DatabaseConnection) -> AppResult<HashSet<String>> {
    let names = Products::find()
        .all(conn)
        .await?
        .into_iter()
        .flat_map(|model| model.images.0)
        .filter_map(|url| storage::stored_name(&url).map(str::to_string))
        .collect();
    Ok(names)
}

async fn find_model(conn: &DatabaseConnection, id: Uuid) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

async fn save_gallery(
    conn: &DatabaseConnection,
    existing: ProductModel,
    gallery: ImageGallery,
) -> AppResult<Product> {
    let images = gallery.commit()?;
    let mut active: ActiveModel = existing.into();
    active.images = Set(ImageList(images));
    let product = active.update(conn).await?;
    tracing::debug!(product_id = %product.id, images = product.images.0.len(), "gallery saved");
    Ok(Product::from_entity(product, Locale::En))
}

/// `ILIKE` pattern matching `search` anywhere. Wildcards typed by the user
/// match literally; backslash is the Postgres default escape character.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn search_wildcards_match_literally() {
        assert_eq!(contains_pattern("tuna"), "%tuna%");
        assert_eq!(contains_pattern("50%"), r"%50\%%");
        assert_eq!(contains_pattern("king_crab"), r"%king\_crab%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
