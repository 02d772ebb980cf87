use crate::client::Upstream;
use crate::error::{log_error, ServiceError};
use crate::model::{BookedMovie, Booking, Movie, Showtime, Suggestions, User};
use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use log::{error, info};
use serde::Serialize;
use std::collections::BTreeMap;

type Tera = web::Data<tera::Tera>;
type Services = web::Data<UiServices>;

#[derive(Debug, Clone)]
pub struct UiServices {
    pub users: Upstream,
    pub movies: Upstream,
    pub showtimes: Upstream,
    pub bookings: Upstream,
}

impl UiServices {
    fn all(&self) -> [&Upstream; 4] {
        [&self.users, &self.movies, &self.showtimes, &self.bookings]
    }
}

#[derive(Serialize)]
struct ServiceStatus {
    name: String,
    up: bool,
}

pub fn templates() -> Result<tera::Tera, tera::Error> {
    tera::Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
}

fn render(
    tera: &tera::Tera,
    template: &str,
    ctx: &tera::Context,
    status: StatusCode,
) -> actix_web::Result<HttpResponse> {
    let body = tera
        .render(template, ctx)
        .map_err(|err| log_error(err, "Template error"))?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}

fn error_page(tera: &tera::Tera, err: ServiceError, message: String) -> actix_web::Result<HttpResponse> {
    error!("{} ({})", message, err);
    let mut ctx = tera::Context::new();
    ctx.insert("message", &message);
    render(tera, "error.html", &ctx, err.status_code())
}

/// Fetches a resource the page cannot do without.
async fn required<T: serde::de::DeserializeOwned>(
    upstream: &Upstream,
    segments: &[&str],
) -> Result<T, ServiceError> {
    upstream.fetch(segments).await?.ok_or_else(|| {
        ServiceError::NotFound(format!(
            "{} has no /{}",
            upstream.title(),
            segments.join("/")
        ))
    })
}

async fn index(tera: Tera, services: Services) -> actix_web::Result<HttpResponse> {
    let mut statuses = Vec::new();
    for upstream in services.all().iter() {
        let up = upstream.ping().await;
        info!("{} service is {}", upstream.name(), if up { "up" } else { "down" });
        statuses.push(ServiceStatus {
            name: upstream.title(),
            up,
        });
    }
    let mut ctx = tera::Context::new();
    ctx.insert("services", &statuses);
    render(&tera, "index.html", &ctx, StatusCode::OK)
}

async fn movies(tera: Tera, services: Services) -> actix_web::Result<HttpResponse> {
    match required::<BTreeMap<String, Movie>>(&services.movies, &["movies"]).await {
        Ok(movies) => {
            let mut ctx = tera::Context::new();
            ctx.insert("movies", &movies);
            render(&tera, "movies.html", &ctx, StatusCode::OK)
        }
        Err(err) => error_page(&tera, err, "Movie service is currently unavailable".to_owned()),
    }
}

async fn showtimes(tera: Tera, services: Services) -> actix_web::Result<HttpResponse> {
    match required::<BTreeMap<String, Showtime>>(&services.showtimes, &["showtimes"]).await {
        Ok(showtimes) => {
            let mut ctx = tera::Context::new();
            ctx.insert("showtimes", &showtimes);
            render(&tera, "showtimes.html", &ctx, StatusCode::OK)
        }
        Err(err) => error_page(&tera, err, "Could not fetch showtimes".to_owned()),
    }
}

async fn users(tera: Tera, services: Services) -> actix_web::Result<HttpResponse> {
    match required::<BTreeMap<String, User>>(&services.users, &["users"]).await {
        Ok(users) => {
            let mut ctx = tera::Context::new();
            ctx.insert("users", &users);
            render(&tera, "users.html", &ctx, StatusCode::OK)
        }
        Err(err) => error_page(&tera, err, "User service is currently unavailable".to_owned()),
    }
}

async fn user_bookings(
    path: web::Path<String>,
    tera: Tera,
    services: Services,
) -> actix_web::Result<HttpResponse> {
    let username = path.into_inner();
    match required::<Booking>(&services.bookings, &["bookings", username.as_str()]).await {
        Ok(bookings) => {
            let mut ctx = tera::Context::new();
            ctx.insert("username", &username);
            ctx.insert("bookings", &bookings);
            render(&tera, "bookings.html", &ctx, StatusCode::OK)
        }
        Err(err) => error_page(&tera, err, format!("Could not fetch bookings for {}", username)),
    }
}

async fn user_page(
    services: &UiServices,
    username: &str,
) -> Result<(User, BTreeMap<String, Vec<BookedMovie>>, Suggestions), ServiceError> {
    let user: User = required(&services.users, &["users", username]).await?;
    // Only a user absent from the bookings service has no bookings; any other
    // 404 from the aggregation (a dangling movie id) fails the page.
    let booked: BTreeMap<String, Vec<BookedMovie>> = match services
        .bookings
        .fetch::<Booking>(&["bookings", username])
        .await?
    {
        Some(_) => required(&services.users, &["users", username, "bookings"]).await?,
        None => BTreeMap::new(),
    };
    let suggestions: Suggestions = required(&services.users, &["users", username, "suggested"]).await?;
    Ok((user, booked, suggestions))
}

async fn user_detail(
    path: web::Path<String>,
    tera: Tera,
    services: Services,
) -> actix_web::Result<HttpResponse> {
    let username = path.into_inner();
    match user_page(&services, &username).await {
        Ok((user, booked, suggestions)) => {
            let mut ctx = tera::Context::new();
            ctx.insert("username", &username);
            ctx.insert("user", &user);
            ctx.insert("booked", &booked);
            ctx.insert("suggested", &suggestions.suggested_movies);
            render(&tera, "user.html", &ctx, StatusCode::OK)
        }
        Err(err) => error_page(&tera, err, format!("Could not fetch the profile of {}", username)),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, tera: Tera, services: Services) {
    cfg.app_data(tera)
        .app_data(services)
        .route("/", web::get().to(index))
        .route("/movies", web::get().to(movies))
        .route("/showtimes", web::get().to(showtimes))
        .route("/users", web::get().to(users))
        .route("/users/{username}", web::get().to(user_detail))
        .route("/bookings/{username}", web::get().to(user_bookings));
}
