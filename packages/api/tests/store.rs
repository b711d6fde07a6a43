//! Store operations against an in-memory database, without the HTTP layer.
//!
//! Run: cargo test --package storefront-api --test store

use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use storefront_api::{
    auth::AuthenticatedUser,
    serialization::{
        brand::BrandInput,
        category::CategoryInput,
        order::OrderInput,
        product::{ProductFilter, ProductInput},
        review::{ReviewFilter, ReviewInput},
        user::RegisterRequest,
    },
    store::{self, StoreError, schema::create_schema},
};

async fn db() -> DatabaseConnection {
    // One connection: every pooled sqlite::memory: connection is its own database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    create_schema(&db).await.unwrap();
    db
}

async fn user(db: &DatabaseConnection, username: &str) -> AuthenticatedUser {
    let model = store::user::create(
        db,
        RegisterRequest {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "secret123".into(),
        },
    )
    .await
    .unwrap();
    AuthenticatedUser {
        id: model.id,
        username: model.username,
    }
}

fn category(name: &str, parent: Option<i32>) -> CategoryInput {
    CategoryInput {
        name: name.into(),
        description: String::new(),
        parent,
    }
}

fn product(name: &str, category: i32, brand: Option<i32>) -> ProductInput {
    ProductInput {
        name: name.into(),
        category,
        brand,
        price: Decimal::new(2500, 2),
        stock: 3,
        is_on_sale: false,
        discount_percentage: Some(0),
        image: None,
        description: String::new(),
    }
}

#[tokio::test]
async fn deleting_a_user_removes_their_reviews_and_orders() {
    let db = db().await;
    let alice = user(&db, "alice").await;
    let bob = user(&db, "bob").await;

    let cat = store::category::create(&db, category("Tea", None)).await.unwrap();
    let item = store::product::create(&db, product("Sencha", cat.id, None)).await.unwrap();

    for author in [&alice, &bob] {
        store::review::create(
            &db,
            author,
            ReviewInput {
                product: item.id,
                rating: 4,
                comment: String::new(),
            },
        )
        .await
        .unwrap();
        store::order::create(
            &db,
            author,
            OrderInput {
                product: item.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();
    }

    store::user::delete(&db, alice.id).await.unwrap();

    let reviews = store::review::list(&db, &ReviewFilter::default()).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].user_id, bob.id);
    assert!(store::order::list(&db, &alice).await.unwrap().is_empty());
    assert_eq!(store::order::list(&db, &bob).await.unwrap().len(), 1);
    assert!(matches!(
        store::user::get(&db, alice.id).await,
        Err(StoreError::NotFound { entity: "user", .. })
    ));

    // The remaining review still drives the product's aggregate.
    let detail = store::product::get_detail(&db, item.id).await.unwrap();
    assert_eq!(detail.total_reviews, 1);
    assert_eq!(detail.average_rating, 4.0);
}

#[tokio::test]
async fn category_delete_reports_what_it_removed() {
    let db = db().await;

    let root = store::category::create(&db, category("Root", None)).await.unwrap();
    let a = store::category::create(&db, category("A", Some(root.id))).await.unwrap();
    let b = store::category::create(&db, category("B", Some(a.id))).await.unwrap();
    store::product::create(&db, product("One", a.id, None)).await.unwrap();
    store::product::create(&db, product("Two", b.id, None)).await.unwrap();

    let summary = store::category::delete(&db, root.id).await.unwrap();
    assert_eq!(summary.categories, 3);
    assert_eq!(summary.products, 2);

    assert!(store::category::load_tree(&db).await.unwrap().is_empty());
    assert!(
        store::product::list(&db, &ProductFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn brand_delete_counts_detached_products() {
    let db = db().await;

    let cat = store::category::create(&db, category("Bikes", None)).await.unwrap();
    let brand = store::brand::create(&db, BrandInput { name: "Velo".into() }).await.unwrap();
    store::product::create(&db, product("Road", cat.id, Some(brand.id))).await.unwrap();
    store::product::create(&db, product("Gravel", cat.id, Some(brand.id))).await.unwrap();
    store::product::create(&db, product("Kids", cat.id, None)).await.unwrap();

    assert_eq!(store::brand::delete(&db, brand.id).await.unwrap(), 2);
    let products = store::product::list(&db, &ProductFilter::default()).await.unwrap();
    assert_eq!(products.len(), 3);
    assert!(products.iter().all(|p| p.brand.is_none()));
}

#[tokio::test]
async fn dangling_references_are_constraint_violations() {
    let db = db().await;

    let err = store::category::create(&db, category("Orphan", Some(42)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));

    let cat = store::category::create(&db, category("Real", None)).await.unwrap();
    let err = store::product::create(&db, product("Ghost brand", cat.id, Some(7)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
}

#[tokio::test]
async fn authenticate_checks_the_stored_hash() {
    let db = db().await;
    let alice = user(&db, "alice").await;

    let found = store::user::authenticate(&db, "alice", "secret123").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(alice.id));
    assert!(store::user::authenticate(&db, "alice", "nope-nope").await.unwrap().is_none());

    let stored = store::user::get(&db, alice.id).await.unwrap();
    assert_ne!(stored.password_hash, "secret123");
    assert!(stored.password_hash.starts_with("$argon2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_usernames_fail_like_wrong_passwords() {
    let db = db().await;
    let alice = user(&db, "alice").await;

    let (unknown, wrong, right) = tokio::join!(
        store::user::authenticate(&db, "mallory", "secret123"),
        store::user::authenticate(&db, "alice", "secret124"),
        store::user::authenticate(&db, "alice", "secret123"),
    );
    assert!(unknown.unwrap().is_none());
    assert!(wrong.unwrap().is_none());
    assert_eq!(right.unwrap().map(|u| u.id), Some(alice.id));
}
