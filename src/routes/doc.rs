use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, SessionInfo},
        dashboard::{DashboardSummary, LowStockProduct},
        products::{AddImageRequest, MoveImageRequest, ProductList, ProductRequest},
        quotes::{CreateQuoteRequest, QuoteList, UpdateQuoteStatusRequest},
        upload::{CropForm, CropUploadResponse, PreviewResponse, UploadForm, UploadResponse},
    },
    error::ErrorBody,
    gallery::MoveDirection,
    imaging::CropRegion,
    models::{Locale, LocalizedText, Product, Quote, QuoteStatus},
    response::Deleted,
    routes::{admin, auth, health, params, products, quotes, upload},
    storage::SweepReport,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::refresh,
        auth::session,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::add_image,
        products::remove_image,
        products::move_image,
        quotes::create_quote,
        quotes::list_quotes,
        quotes::get_quote,
        quotes::update_quote_status,
        quotes::delete_quote,
        upload::upload_image,
        upload::crop_image,
        upload::preview_image,
        admin::dashboard,
        admin::sweep_uploads
    ),
    components(
        schemas(
            Product,
            Quote,
            QuoteStatus,
            Locale,
            LocalizedText,
            ProductRequest,
            ProductList,
            AddImageRequest,
            MoveImageRequest,
            MoveDirection,
            CreateQuoteRequest,
            UpdateQuoteStatusRequest,
            QuoteList,
            LoginRequest,
            LoginResponse,
            SessionInfo,
            DashboardSummary,
            LowStockProduct,
            UploadForm,
            CropForm,
            UploadResponse,
            CropUploadResponse,
            PreviewResponse,
            CropRegion,
            SweepReport,
            Deleted,
            ErrorBody,
            params::ProductQuery,
            params::QuoteListQuery,
            params::LocaleQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog and gallery endpoints"),
        (name = "Quotes", description = "Quote requests"),
        (name = "Upload", description = "Image intake"),
        (name = "Auth", description = "Admin session endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
