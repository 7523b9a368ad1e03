use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use log::debug;
use order_engine::OrderReader;

use crate::routes::configure_routes;

/// Makes a GET request against an app that serves every route from `reader`.
pub async fn get_request<R: OrderReader + 'static>(path: &str, reader: R) -> (StatusCode, String) {
    let app = App::new().app_data(web::Data::new(reader)).configure(configure_routes::<R>);
    let service = test::init_service(app).await;
    debug!("Making request to {path}");
    let req = TestRequest::get().uri(path).to_request();
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body = res.into_body().try_into_bytes().map(|b| String::from_utf8_lossy(&b).into_owned()).unwrap_or_default();
    (status, body)
}
