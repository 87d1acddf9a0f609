//! Checkout engine integration tests
//!
//! These exercise the real transaction against PostgreSQL and are ignored
//! by default so `cargo test` stays self-contained. To run them, point
//! DATABASE_URL at a disposable database:
//!
//! ```text
//! export DATABASE_URL=postgres://localhost/panaderia_test
//! cargo test -- --ignored
//! ```
//!
//! Fixtures are unique per test (UUID emails, fresh products) so the
//! tests can share one database and run in parallel.

use panaderia_server::checkout::{CheckoutError, checkout};
use rust_decimal::Decimal;
use sqlx::PgPool;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a disposable test database");
    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

async fn create_user(pool: &PgPool) -> i64 {
    let email = format!("{}@test.local", uuid::Uuid::new_v4());
    sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash) VALUES ('tester', $1, 'x') RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("insert user")
}

async fn create_product(pool: &PgPool, price: Decimal, stock: i32) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO products (name, price, stock) VALUES ('pan de prueba', $1, $2) RETURNING id",
    )
    .bind(price)
    .bind(stock)
    .fetch_one(pool)
    .await
    .expect("insert product")
}

async fn add_to_cart(pool: &PgPool, user_id: i64, product_id: i64, quantity: i32) {
    sqlx::query("INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(pool)
        .await
        .expect("insert cart item");
}

async fn stock_of(pool: &PgPool, product_id: i64) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .expect("read stock")
}

async fn cart_size(pool: &PgPool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("count cart")
}

async fn order_count(pool: &PgPool, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("count orders")
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn successful_checkout_decrements_stock_and_empties_cart() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;
    // 2 x 3.50 against a stock of 5
    let product = create_product(&pool, Decimal::new(350, 2), 5).await;
    add_to_cart(&pool, user, product, 2).await;

    let confirmation = checkout(&pool, user).await.expect("checkout should succeed");

    assert_eq!(confirmation.total, Decimal::new(700, 2));
    assert_eq!(stock_of(&pool, product).await, 3);
    assert_eq!(cart_size(&pool, user).await, 0);

    let (total, status): (Decimal, String) =
        sqlx::query_as("SELECT total, status FROM orders WHERE id = $1")
            .bind(confirmation.order_id)
            .fetch_one(&pool)
            .await
            .expect("order header persisted");
    assert_eq!(total, Decimal::new(700, 2));
    assert_eq!(status, "pending");

    let (quantity, unit_price): (i32, Decimal) = sqlx::query_as(
        "SELECT quantity, unit_price FROM order_lines WHERE order_id = $1 AND product_id = $2",
    )
    .bind(confirmation.order_id)
    .bind(product)
    .fetch_one(&pool)
    .await
    .expect("order line persisted");
    assert_eq!(quantity, 2);
    assert_eq!(unit_price, Decimal::new(350, 2));
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn insufficient_stock_leaves_everything_untouched() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;
    let product = create_product(&pool, Decimal::new(350, 2), 5).await;
    add_to_cart(&pool, user, product, 10).await;

    let err = checkout(&pool, user).await.unwrap_err();
    match err {
        CheckoutError::InsufficientStock {
            product_id,
            available,
            ..
        } => {
            assert_eq!(product_id, product);
            assert_eq!(available, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(stock_of(&pool, product).await, 5);
    assert_eq!(cart_size(&pool, user).await, 1);
    assert_eq!(order_count(&pool, user).await, 0);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn empty_cart_is_rejected() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;

    let err = checkout(&pool, user).await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(order_count(&pool, user).await, 0);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn one_bad_line_rolls_back_the_whole_cart() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;
    let plenty = create_product(&pool, Decimal::new(100, 2), 50).await;
    let scarce = create_product(&pool, Decimal::new(200, 2), 1).await;
    add_to_cart(&pool, user, plenty, 3).await;
    add_to_cart(&pool, user, scarce, 2).await;

    let err = checkout(&pool, user).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::InsufficientStock { product_id, .. } if product_id == scarce
    ));

    // nothing moved: stocks, cart, orders all as before
    assert_eq!(stock_of(&pool, plenty).await, 50);
    assert_eq!(stock_of(&pool, scarce).await, 1);
    assert_eq!(cart_size(&pool, user).await, 2);
    assert_eq!(order_count(&pool, user).await, 0);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn order_lines_keep_the_price_paid() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;
    let product = create_product(&pool, Decimal::new(350, 2), 5).await;
    add_to_cart(&pool, user, product, 1).await;

    let confirmation = checkout(&pool, user).await.expect("checkout should succeed");

    // catalog price changes after the sale
    sqlx::query("UPDATE products SET price = $1 WHERE id = $2")
        .bind(Decimal::new(999, 2))
        .bind(product)
        .execute(&pool)
        .await
        .expect("update price");

    let unit_price: Decimal =
        sqlx::query_scalar("SELECT unit_price FROM order_lines WHERE order_id = $1")
            .bind(confirmation.order_id)
            .fetch_one(&pool)
            .await
            .expect("read order line");
    assert_eq!(unit_price, Decimal::new(350, 2));
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn second_checkout_finds_an_empty_cart() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;
    let product = create_product(&pool, Decimal::new(100, 2), 10).await;
    add_to_cart(&pool, user, product, 1).await;

    checkout(&pool, user).await.expect("first checkout");
    let err = checkout(&pool, user).await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(stock_of(&pool, product).await, 9);
    assert_eq!(order_count(&pool, user).await, 1);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn concurrent_checkouts_never_oversell() {
    let pool = test_pool().await;
    let alice = create_user(&pool).await;
    let bob = create_user(&pool).await;
    // 3 + 3 > 5, each fits individually
    let product = create_product(&pool, Decimal::new(250, 2), 5).await;
    add_to_cart(&pool, alice, product, 3).await;
    add_to_cart(&pool, bob, product, 3).await;

    let (a, b) = tokio::join!(checkout(&pool, alice), checkout(&pool, bob));

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|s| **s).count();
    assert_eq!(successes, 1, "exactly one of two racing checkouts may win");

    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(
        matches!(
            loser,
            CheckoutError::InsufficientStock { .. } | CheckoutError::Conflict { .. }
        ),
        "loser must fail with a stock error, got {loser:?}"
    );

    assert_eq!(stock_of(&pool, product).await, 2);
}

#[tokio::test]
#[ignore = "requires a live PostgreSQL database"]
async fn double_submit_from_one_user_creates_one_order() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;
    let product = create_product(&pool, Decimal::new(150, 2), 10).await;
    add_to_cart(&pool, user, product, 2).await;

    let (a, b) = tokio::join!(checkout(&pool, user), checkout(&pool, user));

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|s| **s).count();
    assert_eq!(successes, 1, "the duplicate submit must not create a second order");
    assert_eq!(order_count(&pool, user).await, 1);
    assert_eq!(stock_of(&pool, product).await, 8);
}
