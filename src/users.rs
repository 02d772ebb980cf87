use crate::client::Upstream;
use crate::database::Store;
use crate::error::ServiceError;
use crate::model::{BookedMovie, Booking, Discovery, Movie, MovieDetail, Suggestions, User};
use actix_web::{web, HttpResponse};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};

/// Minimum rating, inclusive, for a movie to be suggested.
pub const SUGGESTION_THRESHOLD: f64 = 8.0;

type Users = web::Data<Store<User>>;

/// The services the users service aggregates over.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub bookings: Upstream,
    pub movies: Upstream,
}

fn require_user(users: &Store<User>, username: &str) -> Result<(), ServiceError> {
    if users.contains(username) {
        Ok(())
    } else {
        warn!("User {} not found", username);
        Err(ServiceError::NotFound(format!("User {} not found", username)))
    }
}

/// Date -> booked movies, one movies-service call per booked id.
pub async fn booked_movies(
    upstreams: &Upstreams,
    username: &str,
) -> Result<BTreeMap<String, Vec<BookedMovie>>, ServiceError> {
    let booking: Booking = upstreams
        .bookings
        .fetch(&["bookings", username])
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("No bookings were found for {}", username)))?;

    let mut result = BTreeMap::new();
    for (date, movie_ids) in booking {
        let mut movies = Vec::with_capacity(movie_ids.len());
        for movie_id in &movie_ids {
            let movie: BookedMovie = upstreams
                .movies
                .fetch(&["movies", movie_id.as_str()])
                .await?
                .ok_or_else(|| {
                    warn!("Movie {} booked by {} on {} does not exist", movie_id, username, date);
                    ServiceError::NotFound(format!("Movie {} booked on {} not found", movie_id, date))
                })?;
            movies.push(movie);
        }
        result.insert(date, movies);
    }
    Ok(result)
}

/// Ids of every movie the user has booked. No bookings means nothing watched.
pub async fn watched_movies(
    upstreams: &Upstreams,
    username: &str,
) -> Result<HashSet<String>, ServiceError> {
    let booking: Booking = match upstreams.bookings.fetch(&["bookings", username]).await? {
        Some(booking) => booking,
        None => {
            debug!("{} has no bookings", username);
            return Ok(HashSet::new());
        }
    };

    let movie_ids = booking.values().flatten().collect::<HashSet<_>>();
    let mut watched = HashSet::with_capacity(movie_ids.len());
    for movie_id in movie_ids {
        match upstreams
            .movies
            .fetch::<MovieDetail>(&["movies", movie_id.as_str()])
            .await?
        {
            Some(_) => {
                watched.insert(movie_id.clone());
            }
            None => warn!("Skipping unknown movie {} booked by {}", movie_id, username),
        }
    }
    Ok(watched)
}

/// Highly rated catalog movies that are not in `watched`, in catalog order.
pub fn suggest(catalog: &BTreeMap<String, Movie>, watched: &HashSet<String>) -> Vec<Movie> {
    catalog
        .iter()
        .filter(|(movie_id, movie)| {
            !watched.contains(*movie_id) && movie.rating() >= SUGGESTION_THRESHOLD
        })
        .map(|(_, movie)| movie.clone())
        .collect()
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(Discovery::new(&[
        ("users", "/users"),
        ("user", "/users/<username>"),
        ("bookings", "/users/<username>/bookings"),
        ("suggested", "/users/<username>/suggested"),
    ]))
}

async fn users_list(users: Users) -> HttpResponse {
    HttpResponse::Ok().json(users.all())
}

async fn user_record(path: web::Path<String>, users: Users) -> Result<HttpResponse, ServiceError> {
    let username = path.into_inner();
    require_user(&users, &username)?;
    Ok(HttpResponse::Ok().json(users.get(&username)))
}

async fn user_bookings(
    path: web::Path<String>,
    users: Users,
    upstreams: web::Data<Upstreams>,
) -> Result<HttpResponse, ServiceError> {
    let username = path.into_inner();
    require_user(&users, &username)?;
    let bookings = booked_movies(&upstreams, &username).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

async fn user_suggested(
    path: web::Path<String>,
    users: Users,
    upstreams: web::Data<Upstreams>,
) -> Result<HttpResponse, ServiceError> {
    let username = path.into_inner();
    require_user(&users, &username)?;

    let watched = watched_movies(&upstreams, &username).await?;
    let catalog: BTreeMap<String, Movie> = upstreams
        .movies
        .fetch(&["movies"])
        .await?
        .ok_or_else(|| ServiceError::BadGateway("The movies service has no catalog.".to_owned()))?;

    let suggested_movies = suggest(&catalog, &watched);
    info!(
        "Suggesting {} movies to {} ({} watched)",
        suggested_movies.len(),
        username,
        watched.len()
    );
    Ok(HttpResponse::Ok().json(Suggestions { suggested_movies }))
}

pub fn configure(cfg: &mut web::ServiceConfig, users: Users, upstreams: web::Data<Upstreams>) {
    cfg.app_data(users)
        .app_data(upstreams)
        .route("/", web::get().to(index))
        .route("/users", web::get().to(users_list))
        .route("/users/{username}", web::get().to(user_record))
        .route("/users/{username}/bookings", web::get().to(user_bookings))
        .route("/users/{username}/suggested", web::get().to(user_suggested));
}
