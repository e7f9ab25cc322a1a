use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use seafood_catalog_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        products::{self, ImageList},
        quotes,
    },
    models::QuoteStatus,
    services::auth_service::ensure_admin_account,
};

struct SeedProduct {
    name_en: &'static str,
    name_fr: &'static str,
    description_en: &'static str,
    description_fr: &'static str,
    category: &'static str,
    price: f64,
    image: &'static str,
    stock: i32,
}

const PRODUCTS: [SeedProduct; 3] = [
    SeedProduct {
        name_en: "Premium Tuna",
        name_fr: "Thon Premium",
        description_en: "High-quality frozen tuna from Senegalese waters. Perfect for sushi and grilling. Rich in omega-3 fatty acids and protein.",
        description_fr: "Thon congelé de haute qualité des eaux sénégalaises. Parfait pour les sushis et les grillades. Riche en acides gras oméga-3 et en protéines.",
        category: "Fish",
        price: 2500.0,
        image: "https://images.unsplash.com/photo-1544943910-4c1dc44aab44?w=800",
        stock: 50,
    },
    SeedProduct {
        name_en: "Fresh Shrimp",
        name_fr: "Crevettes Fraîches",
        description_en: "Succulent frozen shrimp, sustainably sourced from Senegalese coastal waters. Ideal for grilling, pasta, and stir-fries. Size: 16/20 count per pound.",
        description_fr: "Crevettes congelées succulentes, d'origine durable des eaux côtières sénégalaises. Idéales pour les grillades, les pâtes et les sautés. Taille: 16/20 par livre.",
        category: "Seafood",
        price: 3200.0,
        image: "https://images.unsplash.com/photo-1565680018434-b513d5e5fd47?w=800",
        stock: 30,
    },
    SeedProduct {
        name_en: "Wild Sea Bass",
        name_fr: "Bar Sauvage",
        description_en: "Wild-caught sea bass from Atlantic waters off the coast of Senegal. Premium quality and taste with delicate, flaky flesh. Whole fish, cleaned and gutted.",
        description_fr: "Bar sauvage pêché dans les eaux atlantiques au large des côtes du Sénégal. Qualité et goût premium avec une chair délicate et feuilletée. Poisson entier, nettoyé et vidé.",
        category: "Fish",
        price: 2800.0,
        image: "https://images.unsplash.com/photo-1534604973900-c43ab4c2e0ab?w=800",
        stock: 25,
    },
];

struct SeedQuote {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    message: &'static str,
    product_name: &'static str,
    quantity: f64,
    status: QuoteStatus,
}

const QUOTES: [SeedQuote; 2] = [
    SeedQuote {
        name: "John Smith",
        email: "john.smith@example.com",
        phone: "+1-555-0123",
        company: "Ocean Traders Inc.",
        message: "Interested in purchasing 10 tons of premium tuna. Please provide pricing and delivery timeline.",
        product_name: "Premium Tuna",
        quantity: 10.0,
        status: QuoteStatus::Pending,
    },
    SeedQuote {
        name: "Marie Dubois",
        email: "marie.dubois@example.fr",
        phone: "+33-6-12-34-56-78",
        company: "Seafood Europe",
        message: "Looking for regular supply of fresh shrimp. Can you provide monthly deliveries to France?",
        product_name: "Fresh Shrimp",
        quantity: 5.0,
        status: QuoteStatus::Processing,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_admin_account(&orm, "admin@fifafish.com", "Admin123!").await?;
    let product_count = seed_products(&orm).await?;
    let quote_count = seed_quotes(&orm).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, products: {product_count}, new quotes: {quote_count}"
    );
    Ok(())
}

/// Replaces the whole catalog with the sample products.
async fn seed_products(conn: &DatabaseConnection) -> anyhow::Result<usize> {
    products::Entity::delete_many().exec(conn).await?;

    for product in &PRODUCTS {
        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name_en: Set(product.name_en.to_string()),
            name_fr: Set(product.name_fr.to_string()),
            description_en: Set(product.description_en.to_string()),
            description_fr: Set(product.description_fr.to_string()),
            category: Set(product.category.to_string()),
            price: Set(product.price),
            images: Set(ImageList(vec![product.image.to_string()])),
            stock: Set(product.stock),
            featured: Set(true),
            created_at: NotSet,
        }
        .insert(conn)
        .await?;
    }

    Ok(PRODUCTS.len())
}

/// Sample quotes are only inserted once per requester email.
async fn seed_quotes(conn: &DatabaseConnection) -> anyhow::Result<usize> {
    let mut inserted = 0;
    for quote in &QUOTES {
        let existing = quotes::Entity::find()
            .filter(quotes::Column::Email.eq(quote.email))
            .count(conn)
            .await?;
        if existing > 0 {
            continue;
        }

        quotes::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(quote.name.to_string()),
            email: Set(quote.email.to_string()),
            phone: Set(quote.phone.to_string()),
            company: Set(Some(quote.company.to_string())),
            message: Set(quote.message.to_string()),
            product_name: Set(Some(quote.product_name.to_string())),
            quantity: Set(Some(quote.quantity)),
            status: Set(quote.status),
            created_at: NotSet,
        }
        .insert(conn)
        .await?;
        inserted += 1;
    }

    Ok(inserted)
}
