use actix_web::{web, App, HttpServer};
use reqwest::Url;
use std::net::TcpListener;

/// Serves `configure` over real HTTP on an ephemeral port and returns its base URL.
pub fn spawn<F>(configure: F) -> Url
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
    actix_rt::spawn(server);
    Url::parse(&format!("http://127.0.0.1:{}", port)).unwrap()
}

/// A URL nothing listens on.
pub fn dead_url() -> Url {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    Url::parse(&format!("http://127.0.0.1:{}", port)).unwrap()
}
