use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, HttpServer};
use error_stack::{Result, ResultExt};
use std::process;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use innkeep::{config, http::util::QuieterRootSpanBuilder, logging, App};

#[derive(Debug, Error)]
#[error("Failed to start the server")]
struct StartError;

fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(["GET", "POST", "PUT", "DELETE"])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

async fn serve() -> Result<(), StartError> {
    let cfg = config::Server::load().change_context(StartError)?;
    logging::init(&cfg.log).change_context(StartError)?;

    let app = App::new(cfg).await.change_context(StartError)?;
    let http = &app.config.http;
    let origins = http.allowed_origins.clone();

    let mut server = HttpServer::new({
        let app = app.clone();
        move || {
            actix_web::App::new()
                .app_data(web::Data::new(app.clone()))
                .wrap(cors(&origins))
                .wrap(NormalizePath::trim())
                .wrap(TracingLogger::<QuieterRootSpanBuilder>::new())
                .configure(innkeep::http::controllers::configure)
        }
    });
    if let Some(workers) = http.workers {
        server = server.workers(workers.get());
    }

    let server = server
        .bind((http.host.as_str(), http.port))
        .change_context(StartError)
        .attach_printable_lazy(|| format!("could not bind to {}:{}", http.host, http.port))?;

    tracing::info!("listening on {}:{}", http.host, http.port);
    server.run().await.change_context(StartError)
}

#[actix_web::main]
async fn main() {
    if let Err(error) = serve().await {
        eprintln!("{error:?}");
        process::exit(1);
    }
}
