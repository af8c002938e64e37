use crate::{
    api::{department, leave_approval, leave_request, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

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

    // Public routes
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(build_limiter(config.rate_login_per_min))
                .route(web::post().to(handlers::login)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(build_limiter(config.rate_protected_per_min))
            .service(
                web::scope("/leave")
                    .service(
                        web::resource("/request")
                            .route(web::post().to(leave_request::submit_leave_request)),
                    )
                    .service(
                        web::resource("/leave-request/{id}")
                            .route(web::get().to(leave_request::get_leave_request)),
                    )
                    .service(
                        web::resource("/approve/{id}")
                            .route(web::put().to(leave_approval::approve_leave_request)),
                    )
                    .service(
                        web::resource("/decline/{id}")
                            .route(web::put().to(leave_approval::decline_leave_request)),
                    )
                    .service(
                        web::resource("/history")
                            .route(web::get().to(leave_request::leave_history)),
                    )
                    .service(
                        web::resource("/export")
                            .route(web::get().to(leave_request::export_approved_leaves)),
                    ),
            )
            .service(
                web::scope("/department")
                    .service(
                        web::resource("")
                            .route(web::post().to(department::create_department))
                            .route(web::get().to(department::list_departments)),
                    )
                    .service(
                        web::resource("/assign-supervisor")
                            .route(web::put().to(department::assign_supervisor)),
                    ),
            )
            .service(
                web::scope("/users")
                    .service(web::resource("").route(web::get().to(user::list_users)))
                    .service(
                        web::resource("/update-leave/quota/{id}")
                            .route(web::put().to(user::update_leave_quota)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(user::get_user))),
            ),
    );
}
