mod config;
mod error;
mod proxy;
mod services;

use crate::config::Config;
use crate::proxy::cache::MessageProxy;
use crate::proxy::state::GalleryState;
use crate::proxy::upstream::HttpUpstream;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use common::clock::SystemClock;
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{info, warn};
use mime_guess::from_path;
use std::io;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Serves the embedded Trunk build of the gallery page, falling back to
/// `index.html` for unknown paths.
async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load().map_err(io::Error::other)?;
    let url = config.url();
    info!("Proxying {}", config.upstream_url);

    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            if let Err(e) = webbrowser::open(&url_clone) {
                warn!("Could not open browser: {}", e);
            }
        });
    }

    let upstream = HttpUpstream::new().map_err(io::Error::other)?;
    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(GalleryState::new(
        MessageProxy::new(upstream, SystemClock),
        config,
    ));

    info!("Server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(services::messages::configure_routes::<HttpUpstream, SystemClock>())
            .default_service(web::route().to(serve_embedded))
    })
        .bind((host, port))?
        .run()
        .await
}
