use crate::database::Store;
use crate::error::ServiceError;
use crate::model::{Discovery, Movie, MovieDetail};
use actix_web::{web, HttpResponse};
use log::warn;

type Movies = web::Data<Store<Movie>>;

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(Discovery::new(&[
        ("movies", "/movies"),
        ("movie", "/movies/<id>"),
    ]))
}

async fn movie_list(movies: Movies) -> HttpResponse {
    HttpResponse::Ok().json(movies.all())
}

async fn movie_info(path: web::Path<String>, movies: Movies) -> Result<HttpResponse, ServiceError> {
    let movie_id = path.into_inner();
    let movie = movies.get(&movie_id).ok_or_else(|| {
        warn!("Movie {} not found", movie_id);
        ServiceError::NotFound(format!("Movie {} not found", movie_id))
    })?;
    Ok(HttpResponse::Ok().json(MovieDetail::new(&movie_id, movie.clone())))
}

pub fn configure(cfg: &mut web::ServiceConfig, movies: Movies) {
    cfg.app_data(movies)
        .route("/", web::get().to(index))
        .route("/movies", web::get().to(movie_list))
        .route("/movies/{movie_id}", web::get().to(movie_info));
}
