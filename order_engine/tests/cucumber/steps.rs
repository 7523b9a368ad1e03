use cucumber::{gherkin::Step, given, then, when};
use order_engine::{IngestOutcome, OrderSource};

use crate::{
    cucumber::IngestWorld,
    support::{messages::TestMessage, prepare_env::sample_order},
};

#[when("the following message is delivered:")]
async fn deliver_message(world: &mut IngestWorld, step: &Step) {
    let payload = step.docstring.as_deref().expect("This step needs a docstring payload").trim().to_string();
    let sys = world.system();
    let seq = sys.next_sequence();
    sys.deliver(TestMessage::new(seq, payload)).await;
}

#[when("the same message is delivered again")]
async fn redeliver_message(world: &mut IngestWorld) {
    let sys = world.system();
    let msg = sys.last_message.as_ref().expect("No message has been delivered yet").redeliver();
    sys.deliver(msg).await;
}

#[given(expr = "{int} orders have been ingested")]
async fn ingest_orders(world: &mut IngestWorld, count: u32) {
    let sys = world.system();
    for day in 1..=count {
        let order_uid = format!("order-{day}");
        let payload = serde_json::to_vec(&sample_order(&order_uid, day)).expect("Could not serialize order");
        let seq = sys.next_sequence();
        let outcome = sys.deliver(TestMessage::new(seq, payload)).await;
        assert_eq!(outcome, IngestOutcome::Stored { order_uid: order_uid.clone(), inserted: true });
        sys.ingested.push(order_uid);
    }
}

#[when("the service restarts")]
async fn restart(world: &mut IngestWorld) {
    world.system().restart().await;
}

#[then("the message is acknowledged")]
async fn message_acked(world: &mut IngestWorld) {
    let msg = world.system().last_message.as_ref().expect("No message has been delivered yet");
    assert_eq!(msg.acks(), 1, "Message should be acknowledged exactly once");
}

#[then("the message is not acknowledged")]
async fn message_not_acked(world: &mut IngestWorld) {
    let sys = world.system();
    let msg = sys.last_message.as_ref().expect("No message has been delivered yet");
    assert_eq!(msg.acks(), 0, "Message should be left for redelivery");
    assert!(matches!(sys.last_outcome, Some(IngestOutcome::Pending(_))));
}

#[then("the message is discarded")]
async fn message_discarded(world: &mut IngestWorld) {
    let outcome = world.system().last_outcome.clone();
    assert!(matches!(outcome, Some(IngestOutcome::Discarded(_))), "Expected a discarded message, got {outcome:?}");
}

#[then(expr = "the cache holds order {word} with {int} item priced at {int}")]
async fn cache_holds_order(world: &mut IngestWorld, order_uid: String, item_count: usize, price: i64) {
    let order = world.system().cache.get(&order_uid).expect("Order is not in the cache");
    assert_eq!(order.items.len(), item_count);
    assert!(order.items.iter().all(|item| item.price == price), "Unexpected item prices: {:?}", order.items);
}

#[then(expr = "order {word} is not in the cache")]
async fn order_not_cached(world: &mut IngestWorld, order_uid: String) {
    assert!(world.system().cache.get(&order_uid).is_none(), "Order {order_uid} should not be cached");
}

#[then(expr = "the cache holds {int} order(s)")]
async fn cache_size(world: &mut IngestWorld, count: usize) {
    assert_eq!(world.system().cache.len(), count);
}

#[then(expr = "the store holds order {word} exactly once")]
async fn stored_once(world: &mut IngestWorld, order_uid: String) {
    let sys = world.system();
    let orders = sys.db.fetch_all_orders().await.expect("Error fetching orders");
    let matching = orders.iter().filter(|o| o.order_uid == order_uid).count();
    assert_eq!(matching, 1);
    let stored = sys.db.fetch_order(&order_uid).await.expect("Error fetching order").expect("Order was not stored");
    let cached = sys.cache.get(&order_uid).expect("Order is not in the cache");
    assert_eq!(*cached, stored, "Cache and store disagree");
}

#[then("the store holds no orders")]
async fn store_is_empty(world: &mut IngestWorld) {
    let orders = world.system().db.fetch_all_orders().await.expect("Error fetching orders");
    assert!(orders.is_empty(), "Expected an empty store, found {} orders", orders.len());
}

#[then("every ingested order is in the cache")]
async fn all_ingested_cached(world: &mut IngestWorld) {
    let sys = world.system();
    for order_uid in &sys.ingested {
        let cached = sys.cache.get(order_uid).unwrap_or_else(|| panic!("Order {order_uid} was not restored"));
        let stored = sys.db.fetch_order(order_uid).await.expect("Error fetching order");
        assert_eq!(Some(cached.as_ref().clone()), stored);
    }
}
