mod bookings;
mod client;
mod config;
mod database;
mod error;
mod model;
mod movies;
mod showtimes;
mod ui;
mod users;

#[cfg(test)]
mod testing;

use actix_web::{middleware::Logger, web, App, HttpServer};
use client::Upstream;
use config::{Config, Service};
use database::Store;
use log::info;
use std::io;

fn invalid_input<E: std::fmt::Display>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}

async fn serve<F>(config: &Config, configure: F) -> io::Result<()>
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let address = config.bind_address();
    info!("Starting {} service on {}", config.service, address);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure.clone())
    })
    .bind(&address)?
    .run()
    .await
}

async fn run(config: Config) -> io::Result<()> {
    let http = reqwest::Client::new();
    match config.service {
        Service::Movies => {
            let store = web::Data::new(Store::load(config.data_file("movies")));
            serve(&config, move |cfg| movies::configure(cfg, store.clone())).await
        }
        Service::Showtimes => {
            let store = web::Data::new(Store::load(config.data_file("showtimes")));
            serve(&config, move |cfg| showtimes::configure(cfg, store.clone())).await
        }
        Service::Bookings => {
            let store = web::Data::new(Store::load(config.data_file("bookings")));
            serve(&config, move |cfg| bookings::configure(cfg, store.clone())).await
        }
        Service::Users => {
            let store = web::Data::new(Store::load(config.data_file("users")));
            let upstreams = web::Data::new(users::Upstreams {
                bookings: Upstream::new("bookings", config.bookings_url.clone(), http.clone()),
                movies: Upstream::new("movies", config.movies_url.clone(), http),
            });
            serve(&config, move |cfg| {
                users::configure(cfg, store.clone(), upstreams.clone())
            })
            .await
        }
        Service::Ui => {
            let tera = web::Data::new(ui::templates().map_err(invalid_input)?);
            let services = web::Data::new(ui::UiServices {
                users: Upstream::new("users", config.users_url.clone(), http.clone()),
                movies: Upstream::new("movies", config.movies_url.clone(), http.clone()),
                showtimes: Upstream::new("showtimes", config.showtimes_url.clone(), http.clone()),
                bookings: Upstream::new("bookings", config.bookings_url.clone(), http),
            });
            serve(&config, move |cfg| ui::configure(cfg, tera.clone(), services.clone())).await
        }
    }
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("cinema=debug,actix_web=info"),
    )
    .init();

    let service: Service = std::env::args()
        .nth(1)
        .ok_or_else(|| invalid_input("usage: cinema <users|movies|showtimes|bookings|ui>"))?
        .parse()
        .map_err(invalid_input)?;
    let config = Config::load(service).map_err(invalid_input)?;

    run(config).await
}
