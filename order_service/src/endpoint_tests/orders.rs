use std::{collections::HashMap, sync::Arc};

use actix_web::http::StatusCode;
use chrono::{TimeZone, Utc};
use order_engine::{
    db_types::{Item, Order},
    OrderCache,
};
use serde_json::Value;

use super::{helpers::get_request, mocks::MockReader};

fn order(order_uid: &str, day: u32) -> Order {
    Order::new(order_uid)
        .with_track_number("T1")
        .with_date_created(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap())
        .with_item(Item::new(1, 100))
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/health", MockReader::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.trim(), "👍️");
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let _ = env_logger::try_init().ok();
    let mut reader = MockReader::new();
    let a1 = order("A1", 1);
    reader.expect_get_order().times(1).returning(move |uid| (uid == "A1").then(|| Arc::new(a1.clone())));
    let (status, body) = get_request("/api/orders/A1", reader).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).expect("Response is not JSON");
    assert_eq!(json["order_uid"], "A1");
    assert_eq!(json["track_number"], "T1");
    assert_eq!(json["items"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(json["items"][0]["price"], 100);
    assert_eq!(json["date_created"], "2024-03-01T12:00:00Z");
}

#[actix_web::test]
async fn fetch_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut reader = MockReader::new();
    reader.expect_get_order().times(1).returning(|_| None);
    let (status, body) = get_request("/api/orders/UNKNOWN", reader).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. No order with id UNKNOWN"}"#);
}

#[actix_web::test]
async fn fetch_all_orders_newest_first() {
    let _ = env_logger::try_init().ok();
    let mut reader = MockReader::new();
    reader.expect_all_orders().times(1).returning(|| {
        [order("old", 1), order("b-same", 15), order("a-same", 15), order("new", 28)]
            .into_iter()
            .map(|o| (o.order_uid.clone(), Arc::new(o)))
            .collect::<HashMap<_, _>>()
    });
    let (status, body) = get_request("/api/orders", reader).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).expect("Response is not JSON");
    assert_eq!(json["count"], 4);
    let uids = json["orders"]
        .as_array()
        .expect("orders should be a list")
        .iter()
        .map(|o| o["order_uid"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(uids, vec!["new", "a-same", "b-same", "old"]);
}

#[actix_web::test]
async fn fetch_all_orders_when_empty() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/api/orders", OrderCache::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"count":0,"orders":[]}"#);
}

#[actix_web::test]
async fn cached_order_is_served() {
    let _ = env_logger::try_init().ok();
    let cache = OrderCache::new();
    cache.set(order("A1", 1));
    let (status, body) = get_request("/api/orders/A1", cache).await;
    assert_eq!(status, StatusCode::OK);
    let served: Order = serde_json::from_str(&body).expect("Response is not an order");
    assert_eq!(served, order("A1", 1));
}
