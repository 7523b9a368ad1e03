//! Request handler definitions
//!
//! Every handler here reads from an [`OrderReader`], which is the in-memory order cache in production. None of them
//! touch the database or the queue, so they never block a worker thread.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use order_engine::OrderReader;

use crate::{data_objects::OrderList, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers every route against an `R` that the app supplies as `web::Data<R>`.
pub fn configure_routes<R: OrderReader + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(web::scope("/api").service(AllOrdersRoute::<R>::new()).service(OrderByIdRoute::<R>::new()));
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(order_by_id => Get "/orders/{order_uid}" impl OrderReader);
pub async fn order_by_id<R: OrderReader>(
    path: web::Path<String>,
    cache: web::Data<R>,
) -> Result<HttpResponse, ServerError> {
    let order_uid = path.into_inner();
    trace!("💻️ GET order [{order_uid}]");
    let order = cache
        .get_order(&order_uid)
        .ok_or_else(|| ServerError::NoRecordFound(format!("No order with id {order_uid}")))?;
    Ok(HttpResponse::Ok().json(order.as_ref()))
}

route!(all_orders => Get "/orders" impl OrderReader);
pub async fn all_orders<R: OrderReader>(cache: web::Data<R>) -> HttpResponse {
    let snapshot = cache.all_orders();
    let list = OrderList::new(snapshot.values().map(|o| o.as_ref()));
    trace!("💻️ GET all orders. {} found", list.count);
    HttpResponse::Ok().json(list)
}
