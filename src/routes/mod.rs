use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use overseace_notification::Mailer;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    audit::AuditLog,
    pipeline::FormPipeline,
    rate_limit::{self, RateLimiter},
};

mod form;
mod health;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub pipeline: FormPipeline,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(config: crate::config::Config, mailer: Arc<dyn Mailer>) -> Self {
        let audit = config
            .audit
            .enabled
            .then(|| AuditLog::new(&config.audit.path));
        let pipeline = FormPipeline::new(config.forms.clone(), mailer, audit);
        let rate_limiter = RateLimiter::from_config(&config.rate_limit);

        Self {
            config,
            pipeline,
            rate_limiter,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let mut submit = post(form::action)
        .options(form::preflight)
        .fallback(form::method_not_allowed);

    if let Some(limiter) = app_state.rate_limiter.clone() {
        submit = submit.route_layer(axum::middleware::from_fn_with_state(
            limiter,
            rate_limit::enforce,
        ));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health))
        .route("/process-form", submit.clone())
        // path used by the static site's existing form actions
        .route("/process-form.php", submit)
        .with_state(app_state)
        .layer(cors)
}
