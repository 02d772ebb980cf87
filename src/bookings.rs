use crate::database::Store;
use crate::error::ServiceError;
use crate::model::{Booking, Discovery};
use actix_web::{web, HttpResponse};
use log::warn;

type Bookings = web::Data<Store<Booking>>;

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(Discovery::new(&[
        ("bookings", "/bookings"),
        ("booking", "/bookings/<username>"),
    ]))
}

async fn booking_list(bookings: Bookings) -> HttpResponse {
    HttpResponse::Ok().json(bookings.all())
}

async fn booking_record(
    path: web::Path<String>,
    bookings: Bookings,
) -> Result<HttpResponse, ServiceError> {
    let username = path.into_inner();
    let booking = bookings.get(&username).ok_or_else(|| {
        warn!("No bookings found for user {}", username);
        ServiceError::NotFound(format!("No bookings found for user {}", username))
    })?;
    Ok(HttpResponse::Ok().json(booking))
}

pub fn configure(cfg: &mut web::ServiceConfig, bookings: Bookings) {
    cfg.app_data(bookings)
        .route("/", web::get().to(index))
        .route("/bookings", web::get().to(booking_list))
        .route("/bookings/{username}", web::get().to(booking_record));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::fixtures;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn user_bookings_are_grouped_by_date() {
        let bookings = web::Data::new(fixtures::bookings());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, bookings.clone()))).await;

        let req = test::TestRequest::get().uri("/bookings/garret_heaton").to_request();
        let booking: Booking = test::call_and_read_body_json(&app, req).await;
        assert_eq!(booking.len(), 2);
        assert_eq!(booking["20151202"], vec!["276c79ec-a26a-40a6-b3d3-fb242a5947b6"]);
    }

    #[actix_web::test]
    async fn unknown_user_is_not_found() {
        let bookings = web::Data::new(fixtures::bookings());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, bookings.clone()))).await;

        let req = test::TestRequest::get().uri("/bookings/michael_scott").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["description"], "No bookings found for user michael_scott");
    }

    #[actix_web::test]
    async fn empty_store_serves_empty_collection() {
        let bookings = web::Data::new(Store::from_records(Default::default()));
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, bookings.clone()))).await;

        let req = test::TestRequest::get().uri("/bookings").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, serde_json::json!({}));
    }
}
