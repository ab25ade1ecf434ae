// tests/checkout_flow.rs

//! End-to-end properties of the two-step checkout flow, exercised against the
//! in-memory store and the sandbox gateway.

mod common;

use uuid::Uuid;

use common::{assert_captured, auth_service, checkout_service, line_item, seed_product, shipping_address, MemoryStore};
use storefront_api::errors::AppError;
use storefront_api::models::{OrderStatus, PaymentStatus};
use storefront_api::storage::{CartStore, OrderStore};

#[tokio::test]
async fn create_order_persists_one_pending_order_and_returns_approval_url() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "Desk Lamp", 1000, 5).await;

  let user_id = Uuid::new_v4();
  let cart = store.create_cart(user_id).await.unwrap();
  let items = vec![line_item(&product, 2)];

  let created = checkout
    .create_order(user_id, cart.id, items, shipping_address(), 2000)
    .await
    .unwrap();

  assert!(!created.approval_url.is_empty());
  assert_eq!(store.order_count(), 1);

  let order = store.find_order(created.order_id).await.unwrap().unwrap();
  assert_eq!(order.order_status, OrderStatus::Pending);
  assert_eq!(order.payment_status, PaymentStatus::Pending);
  assert_eq!(order.total_amount_cents, 2000);
  assert!(order.payment_id.is_some());
  assert!(order.payer_id.is_none());
}

#[tokio::test]
async fn create_order_rejects_empty_line_items() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);

  let err = checkout
    .create_order(Uuid::new_v4(), Uuid::new_v4(), vec![], shipping_address(), 0)
    .await
    .unwrap_err();

  assert!(matches!(err, AppError::Validation(_)));
  assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn create_order_rejects_total_that_disagrees_with_line_items() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "Desk Lamp", 1000, 5).await;

  let err = checkout
    .create_order(
      Uuid::new_v4(),
      Uuid::new_v4(),
      vec![line_item(&product, 2)],
      shipping_address(),
      1999,
    )
    .await
    .unwrap_err();

  assert!(matches!(err, AppError::Validation(_)));
  assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn create_order_rejects_non_positive_quantities_even_when_the_total_balances() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "Desk Lamp", 1000, 5).await;

  // 3 * 10.00 - 1 * 10.00 balances to 20.00, but the negative line would add
  // stock back at capture time.
  let items = vec![line_item(&product, 3), line_item(&product, -1)];
  let err = checkout
    .create_order(Uuid::new_v4(), Uuid::new_v4(), items, shipping_address(), 2000)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));

  let zero_qty = vec![line_item(&product, 0)];
  let err = checkout
    .create_order(Uuid::new_v4(), Uuid::new_v4(), zero_qty, shipping_address(), 0)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));

  assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn capture_of_unknown_order_is_not_found_and_mutates_nothing() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "Desk Lamp", 1000, 5).await;

  let user_id = Uuid::new_v4();
  let cart = store.create_cart(user_id).await.unwrap();

  let err = checkout
    .capture_payment("PAY-1", "PAYER-1", Uuid::new_v4())
    .await
    .unwrap_err();

  assert!(matches!(err, AppError::NotFound(_)));
  assert_eq!(store.product_stock(product.id), Some(5));
  assert!(store.cart_exists(cart.id));
}

#[tokio::test]
async fn capture_confirms_order_decrements_stock_and_deletes_cart() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  // Scenario from the flow contract: P1 price 10.00, quantity 2, stock 5.
  let product = seed_product(&store, "P1", 1000, 5).await;

  let user_id = Uuid::new_v4();
  let cart = store.create_cart(user_id).await.unwrap();
  let created = checkout
    .create_order(user_id, cart.id, vec![line_item(&product, 2)], shipping_address(), 2000)
    .await
    .unwrap();

  let order = checkout
    .capture_payment("PAY-42", "PAYER-42", created.order_id)
    .await
    .unwrap();

  assert_captured(&order, "PAY-42", "PAYER-42");
  assert_eq!(store.product_stock(product.id), Some(3));
  assert!(!store.cart_exists(cart.id));

  // Persisted copy agrees with the returned one.
  let persisted = store.find_order(created.order_id).await.unwrap().unwrap();
  assert_captured(&persisted, "PAY-42", "PAYER-42");
}

#[tokio::test]
async fn second_capture_is_rejected_without_touching_stock() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "P1", 1000, 5).await;

  let user_id = Uuid::new_v4();
  let cart = store.create_cart(user_id).await.unwrap();
  let created = checkout
    .create_order(user_id, cart.id, vec![line_item(&product, 2)], shipping_address(), 2000)
    .await
    .unwrap();

  checkout
    .capture_payment("PAY-42", "PAYER-42", created.order_id)
    .await
    .unwrap();
  let err = checkout
    .capture_payment("PAY-42", "PAYER-42", created.order_id)
    .await
    .unwrap_err();

  assert!(matches!(err, AppError::Validation(_)));
  // Stock decremented exactly once.
  assert_eq!(store.product_stock(product.id), Some(3));
}

#[tokio::test]
async fn capture_with_vanished_product_reports_a_distinct_not_found() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "P1", 1000, 5).await;

  let user_id = Uuid::new_v4();
  let cart = store.create_cart(user_id).await.unwrap();
  let created = checkout
    .create_order(user_id, cart.id, vec![line_item(&product, 2)], shipping_address(), 2000)
    .await
    .unwrap();

  // Product disappears between checkout initiation and capture.
  use storefront_api::storage::ProductStore;
  assert!(store.delete_product(product.id).await.unwrap());

  let err = checkout
    .capture_payment("PAY-42", "PAYER-42", created.order_id)
    .await
    .unwrap_err();

  match err {
    AppError::NotFound(message) => assert!(message.contains(&product.id.to_string())),
    other => panic!("expected NotFound, got {:?}", other),
  }
  // The aborted capture never reached the cart deletion or the order write.
  assert!(store.cart_exists(cart.id));
  let order = store.find_order(created.order_id).await.unwrap().unwrap();
  assert_eq!(order.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn order_listing_and_details_follow_not_found_contract() {
  let store = MemoryStore::new();
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "P1", 1000, 5).await;

  let user_id = Uuid::new_v4();
  let cart = store.create_cart(user_id).await.unwrap();
  let created = checkout
    .create_order(user_id, cart.id, vec![line_item(&product, 1)], shipping_address(), 1000)
    .await
    .unwrap();

  let orders = checkout.orders_for_user(user_id).await.unwrap();
  assert_eq!(orders.len(), 1);

  let details = checkout.order_details(created.order_id).await.unwrap();
  assert_eq!(details.id, created.order_id);

  assert!(matches!(
    checkout.orders_for_user(Uuid::new_v4()).await.unwrap_err(),
    AppError::NotFound(_)
  ));
  assert!(matches!(
    checkout.order_details(Uuid::new_v4()).await.unwrap_err(),
    AppError::NotFound(_)
  ));
}

#[tokio::test]
async fn registered_user_can_complete_the_whole_flow() {
  let store = MemoryStore::new();
  let auth = auth_service(&store);
  let checkout = checkout_service(&store);
  let product = seed_product(&store, "P1", 1000, 5).await;

  let user = auth.register("sam", "sam@example.com", "pass-word-1").await.unwrap();
  let cart = store.create_cart(user.id).await.unwrap();

  let created = checkout
    .create_order(user.id, cart.id, vec![line_item(&product, 2)], shipping_address(), 2000)
    .await
    .unwrap();
  let order = checkout
    .capture_payment("PAY-7", "PAYER-7", created.order_id)
    .await
    .unwrap();

  assert_eq!(order.user_id, user.id);
  assert_eq!(store.product_stock(product.id), Some(3));
}
