use crate::{
    api::{attendance, dashboard},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/register")
                            .wrap(register_limiter.clone())
                            .route(web::post().to(handlers::register)),
                    )
                    .service(
                        web::resource("/login")
                            .wrap(login_limiter.clone())
                            .route(web::post().to(handlers::login)),
                    )
                    .service(
                        web::resource("/me")
                            .wrap(api_limiter.clone())
                            .route(web::get().to(handlers::me)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .wrap(api_limiter.clone())
                    .service(
                        web::resource("/checkin").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/checkout").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/my-history").route(web::get().to(attendance::my_history)),
                    )
                    .service(
                        web::resource("/my-summary").route(web::get().to(attendance::my_summary)),
                    )
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(web::resource("/all").route(web::get().to(attendance::all)))
                    .service(
                        web::resource("/employee/{id}")
                            .route(web::get().to(attendance::employee_attendance)),
                    )
                    .service(web::resource("/summary").route(web::get().to(attendance::summary)))
                    .service(
                        web::resource("/today-status")
                            .route(web::get().to(attendance::today_status)),
                    )
                    .service(web::resource("/export").route(web::get().to(attendance::export))),
            )
            .service(
                web::scope("/dashboard")
                    .wrap(api_limiter)
                    .service(
                        web::resource("/employee")
                            .route(web::get().to(dashboard::employee_dashboard)),
                    )
                    .service(
                        web::resource("/manager")
                            .route(web::get().to(dashboard::manager_dashboard)),
                    ),
            ),
    );
}
