use crate::database::Store;
use crate::error::ServiceError;
use crate::model::{Discovery, Showtime};
use actix_web::{web, HttpResponse};
use log::warn;

type Showtimes = web::Data<Store<Showtime>>;

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(Discovery::new(&[
        ("showtimes", "/showtimes"),
        ("showtime", "/showtimes/<date>"),
    ]))
}

async fn showtimes_list(showtimes: Showtimes) -> HttpResponse {
    HttpResponse::Ok().json(showtimes.all())
}

async fn showtimes_by_date(
    path: web::Path<String>,
    showtimes: Showtimes,
) -> Result<HttpResponse, ServiceError> {
    let date = path.into_inner();
    let movie_ids = showtimes.get(&date).ok_or_else(|| {
        warn!("No showtimes found for date {}", date);
        ServiceError::NotFound(format!("No showtimes found for date {}", date))
    })?;
    Ok(HttpResponse::Ok().json(movie_ids))
}

pub fn configure(cfg: &mut web::ServiceConfig, showtimes: Showtimes) {
    cfg.app_data(showtimes)
        .route("/", web::get().to(index))
        .route("/showtimes", web::get().to(showtimes_list))
        .route("/showtimes/{date}", web::get().to(showtimes_by_date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::fixtures;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn date_lists_movies_in_order() {
        let showtimes = web::Data::new(fixtures::showtimes());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, showtimes.clone()))).await;

        let req = test::TestRequest::get().uri("/showtimes/20151203").to_request();
        let movie_ids: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            movie_ids,
            vec![
                "720d006c-3a57-4b6a-b18f-9b713b073f3c",
                "39ab85e5-5e8e-4dc5-afea-65dc368bd7ab",
            ]
        );
    }

    #[actix_web::test]
    async fn unknown_date_is_not_found() {
        let showtimes = web::Data::new(fixtures::showtimes());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, showtimes.clone()))).await;

        let req = test::TestRequest::get().uri("/showtimes/19991231").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn collection_returns_every_date() {
        let showtimes = web::Data::new(fixtures::showtimes());
        let app =
            test::init_service(App::new().configure(|cfg| configure(cfg, showtimes.clone()))).await;

        let req = test::TestRequest::get().uri("/showtimes").to_request();
        let all: std::collections::BTreeMap<String, Showtime> =
            test::call_and_read_body_json(&app, req).await;
        assert_eq!(&all, showtimes.all());
    }
}
