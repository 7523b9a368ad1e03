use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

//--------------------------------------       Order         ---------------------------------------------------------
/// The order aggregate. The header fields live in the `orders` table, while [`Delivery`], [`Payment`] and the
/// [`Item`]s are stored in their own tables, keyed by `order_uid`.
///
/// `order_uid` is the only field that is required when deserializing an inbound payload. Everything else falls back to
/// its zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_uid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub track_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[sqlx(skip)]
    pub delivery: Delivery,
    #[serde(default, deserialize_with = "null_as_default")]
    #[sqlx(skip)]
    pub payment: Payment,
    #[serde(default, deserialize_with = "null_as_default")]
    #[sqlx(skip)]
    pub items: Vec<Item>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locale: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub internal_signature: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery_service: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shardkey: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sm_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_created: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub oof_shard: String,
}

impl Order {
    /// An order with the given id and every other field set to its zero value.
    pub fn new<S: Into<String>>(order_uid: S) -> Self {
        Self {
            order_uid: order_uid.into(),
            track_number: String::default(),
            entry: String::default(),
            delivery: Delivery::default(),
            payment: Payment::default(),
            items: Vec::new(),
            locale: String::default(),
            internal_signature: String::default(),
            customer_id: String::default(),
            delivery_service: String::default(),
            shardkey: String::default(),
            sm_id: 0,
            date_created: DateTime::<Utc>::default(),
            oof_shard: String::default(),
        }
    }

    pub fn with_track_number<S: Into<String>>(mut self, track_number: S) -> Self {
        self.track_number = track_number.into();
        self
    }

    pub fn with_customer_id<S: Into<String>>(mut self, customer_id: S) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    pub fn with_date_created(mut self, date_created: DateTime<Utc>) -> Self {
        self.date_created = date_created;
        self
    }

    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = payment;
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Parses an inbound message payload into an order.
    ///
    /// On top of the JSON shape, the payload must carry a non-blank `order_uid`, since an order without an identity
    /// can never be stored or looked up.
    pub fn from_payload(payload: &[u8]) -> Result<Self, OrderPayloadError> {
        let order: Order = serde_json::from_slice(payload).map_err(|e| OrderPayloadError::Malformed(e.to_string()))?;
        if order.order_uid.trim().is_empty() {
            return Err(OrderPayloadError::MissingOrderUid);
        }
        Ok(order)
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order [{}] track: {}, customer: {}, {} item(s), created {}",
            self.order_uid,
            self.track_number,
            self.customer_id,
            self.items.len(),
            self.date_created
        )
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum OrderPayloadError {
    #[error("Payload is not a valid order. {0}")]
    Malformed(String),
    #[error("Payload does not contain an order_uid")]
    MissingOrderUid,
}

/// Treats an explicit JSON `null` the same as an absent field: the value takes its zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//--------------------------------------      Delivery       ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Delivery {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub zip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

//--------------------------------------      Payment        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Payment {
    #[serde(deserialize_with = "null_as_default")]
    pub transaction: String,
    #[serde(deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: i64,
    /// Unix timestamp (seconds) of the payment
    #[serde(deserialize_with = "null_as_default")]
    pub payment_dt: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub bank: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_cost: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub goods_total: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub custom_fee: i64,
}

//--------------------------------------        Item         ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Item {
    #[serde(deserialize_with = "null_as_default")]
    pub chrt_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub track_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Discount, in percent
    #[serde(deserialize_with = "null_as_default")]
    pub sale: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_price: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub nm_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
}

impl Item {
    pub fn new(chrt_id: i64, price: i64) -> Self {
        Self { chrt_id, price, total_price: price, ..Default::default() }
    }
}
