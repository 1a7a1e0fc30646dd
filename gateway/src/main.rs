use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use supplier_scoring::{Scorers, ScoringConfig};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod response;
mod scoring_routes;

use scoring_routes::{scoring_routes, ScoringState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "scoring_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("SCORING_CONFIG_PATH") {
        Ok(path) => ScoringConfig::from_file(&path)
            .with_context(|| format!("loading scoring config {}", path))?,
        Err(_) => {
            tracing::info!("   SCORING_CONFIG_PATH not set, using built-in tables");
            ScoringConfig::default()
        }
    };

    let app = build_app(ScoringState::new(Scorers::from_config(&config)));

    let port = std::env::var("SCORING_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "18700".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("Scoring Gateway starting on {}", addr);
    tracing::info!(
        "   Engines: economic, quality, environmental, transportation, tradeoff"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app(state: ScoringState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", scoring_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "scoring-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        build_app(ScoringState::new(Scorers::default()))
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "scoring-gateway");
    }

    #[tokio::test]
    async fn test_api_is_nested_under_v1() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/quality/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(Request::builder().uri("/quality/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
