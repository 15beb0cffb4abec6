//! Order completion and stock deduction over an embedded database
//! Run: cargo test -p tessera-server --test checkout_stock

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use tessera_server::cart::CartStore;
use tessera_server::checkout::CheckoutService;
use tessera_server::db::DbService;
use tessera_server::db::models::{OrderCreate, OrderLine, OrderStatus, ProductCreate};
use tessera_server::db::repository::ProductRepository;

struct Harness {
    _tmp: tempfile::TempDir,
    db: Surreal<Db>,
    cart: CartStore,
    checkout: CheckoutService,
}

async fn harness() -> Harness {
    let tmp = tempfile::tempdir().unwrap();
    let db = DbService::new(&tmp.path().join("db").to_string_lossy())
        .await
        .unwrap()
        .db;
    let cart = CartStore::open(&tmp.path().join("cart.redb")).unwrap();
    let checkout = CheckoutService::new(db.clone(), cart.clone());
    Harness {
        _tmp: tmp,
        db,
        cart,
        checkout,
    }
}

async fn seed_product(db: &Surreal<Db>, slug: &str, price: f64, stock: i64) -> Thing {
    ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: slug.to_string(),
            slug: slug.to_string(),
            price: Some(price),
            status: None,
            category: None,
            material: None,
            finish: None,
            size: None,
            thickness: None,
            application_area: None,
            brand: None,
            is_clearance: None,
            stock: Some(stock),
            image: None,
            created_at: None,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

fn line(product: Thing, quantity: i64, unit_price: f64) -> OrderLine {
    OrderLine {
        product,
        name: "test line".to_string(),
        quantity,
        unit_price,
    }
}

async fn stock_of(db: &Surreal<Db>, product: &Thing) -> i64 {
    ProductRepository::new(db.clone())
        .current_stock(product)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn completion_deducts_stock_and_marks_paid() {
    let h = harness().await;
    let product = seed_product(&h.db, "tile-a", 25.0, 10).await;

    let order = h
        .checkout
        .place_order(OrderCreate {
            session: None,
            lines: vec![line(product.clone(), 3, 25.0)],
            total: 75.0,
        })
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let completed = h.checkout.complete_order(order.id.as_ref().unwrap()).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Paid);
    assert!(completed.stock_issues.is_empty());
    assert_eq!(stock_of(&h.db, &product).await, 7);
}

#[tokio::test]
async fn shortfall_is_recorded_but_order_still_completes() {
    let h = harness().await;
    let plenty = seed_product(&h.db, "tile-a", 10.0, 100).await;
    let scarce = seed_product(&h.db, "tile-b", 10.0, 1).await;

    let order = h
        .checkout
        .place_order(OrderCreate {
            session: None,
            lines: vec![line(plenty.clone(), 2, 10.0), line(scarce.clone(), 5, 10.0)],
            total: 70.0,
        })
        .await
        .unwrap();

    let completed = h.checkout.complete_order(order.id.as_ref().unwrap()).await.unwrap();

    // The order is paid, the deductible line went through, the failed line
    // changed nothing and was recorded
    assert_eq!(completed.status, OrderStatus::Paid);
    assert_eq!(stock_of(&h.db, &plenty).await, 98);
    assert_eq!(stock_of(&h.db, &scarce).await, 1);

    let reread = h
        .checkout
        .find_order(order.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reread.stock_issues.len(), 1);
    assert_eq!(reread.stock_issues[0].requested, 5);
    assert_eq!(reread.stock_issues[0].available, Some(1));
}

#[tokio::test]
async fn completion_is_rejected_for_non_pending_orders() {
    let h = harness().await;
    let product = seed_product(&h.db, "tile-a", 25.0, 10).await;

    let order = h
        .checkout
        .place_order(OrderCreate {
            session: None,
            lines: vec![line(product.clone(), 1, 25.0)],
            total: 25.0,
        })
        .await
        .unwrap();
    let id = order.id.clone().unwrap();

    h.checkout.complete_order(&id).await.unwrap();

    // A second completion must not deduct stock again
    assert!(h.checkout.complete_order(&id).await.is_err());
    assert_eq!(stock_of(&h.db, &product).await, 9);
}

#[tokio::test]
async fn concurrent_completions_deduct_stock_once() {
    let h = harness().await;
    let product = seed_product(&h.db, "tile-a", 25.0, 10).await;

    let order = h
        .checkout
        .place_order(OrderCreate {
            session: None,
            lines: vec![line(product.clone(), 2, 25.0)],
            total: 50.0,
        })
        .await
        .unwrap();
    let id = order.id.clone().unwrap();

    // Both requests race on the pending-to-paid transition; the statement is
    // conditional so exactly one wins and only the winner deducts stock
    let (a, b) = tokio::join!(h.checkout.complete_order(&id), h.checkout.complete_order(&id));
    assert!(
        a.is_ok() != b.is_ok(),
        "exactly one completion must win: a={:?} b={:?}",
        a.is_ok(),
        b.is_ok()
    );
    assert_eq!(stock_of(&h.db, &product).await, 8);
}

#[tokio::test]
async fn orders_are_retrievable_by_number() {
    let h = harness().await;
    let product = seed_product(&h.db, "tile-a", 25.0, 10).await;

    let order = h
        .checkout
        .place_order(OrderCreate {
            session: None,
            lines: vec![line(product, 1, 25.0)],
            total: 25.0,
        })
        .await
        .unwrap();

    let found = h
        .checkout
        .find_order_by_number(&order.number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, order.id);

    assert!(
        h.checkout
            .find_order_by_number("ORD-19700101-NOPE")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn status_history_records_every_transition() {
    let h = harness().await;
    let product = seed_product(&h.db, "tile-a", 25.0, 10).await;

    let order = h
        .checkout
        .place_order(OrderCreate {
            session: None,
            lines: vec![line(product, 1, 25.0)],
            total: 25.0,
        })
        .await
        .unwrap();
    let id = order.id.clone().unwrap();
    assert_eq!(order.status_history.len(), 1);

    h.checkout.complete_order(&id).await.unwrap();
    let shipped = h
        .checkout
        .set_status(&id, OrderStatus::Shipped, Some("carrier picked up".to_string()))
        .await
        .unwrap();

    let statuses: Vec<OrderStatus> = shipped.status_history.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![OrderStatus::Pending, OrderStatus::Paid, OrderStatus::Shipped]
    );
    assert_eq!(
        shipped.status_history[2].note.as_deref(),
        Some("carrier picked up")
    );
}

#[tokio::test]
async fn mismatched_totals_are_rejected_at_placement() {
    let h = harness().await;
    let product = seed_product(&h.db, "tile-a", 25.0, 10).await;

    let result = h
        .checkout
        .place_order(OrderCreate {
            session: None,
            lines: vec![line(product, 2, 25.0)],
            total: 49.0,
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn completion_clears_the_originating_cart_session() {
    let h = harness().await;
    let product = seed_product(&h.db, "tile-a", 25.0, 10).await;
    h.cart
        .set_cart_line("s1", &product.to_string(), 2, Some(25.0))
        .unwrap();

    let order = h
        .checkout
        .place_order(OrderCreate {
            session: Some("s1".to_string()),
            lines: vec![line(product, 2, 25.0)],
            total: 50.0,
        })
        .await
        .unwrap();
    h.checkout.complete_order(order.id.as_ref().unwrap()).await.unwrap();

    assert!(h.cart.cart_lines("s1").unwrap().is_empty());
}
