//! JSON API over the content repository

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ContentRepository, Post};
use crate::generator::{render_robots, render_sitemap, ApiEnvelope};
use crate::helpers::{audience_from_slug, category_slug};
use crate::Site;

/// Server state
struct ServerState {
    site: Site,
    repository: ContentRepository,
}

#[derive(Debug, Deserialize)]
struct RoleQuery {
    role: Option<String>,
}

/// Build the application router
pub fn router(site: &Site) -> Result<Router> {
    let state = Arc::new(ServerState {
        site: site.clone(),
        repository: site.repository()?,
    });

    let app = Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/featured", get(featured_posts))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/:category/posts", get(category_posts))
        .route("/api/audiences", get(list_audiences))
        .route("/api/audiences/:audience/posts", get(audience_posts))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .fallback_service(ServeDir::new(&site.public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Start the API server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a repository query on the blocking pool and wrap the result in the
/// API envelope. Failures become a 500 with an empty payload.
async fn query<T, F>(key: &'static str, f: F) -> Response
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Serialize + Default + Send + 'static,
{
    let outcome = match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(anyhow::anyhow!("query task failed: {}", e)),
    };

    match outcome {
        Ok(data) => Json(ApiEnvelope::ok(key, data)).into_response(),
        Err(e) => {
            tracing::error!("Error fetching {}: {:#}", key, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiEnvelope::failed(
                    key,
                    format!("Failed to fetch {}", key),
                    T::default(),
                )),
            )
                .into_response()
        }
    }
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(q): Query<RoleQuery>,
) -> Response {
    let repository = state.repository.clone();
    query("posts", move || repository.all_posts(q.role.as_deref())).await
}

async fn get_post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
    Query(q): Query<RoleQuery>,
) -> Response {
    let repository = state.repository.clone();
    let found = tokio::task::spawn_blocking(move || {
        repository.post_by_slug(&slug, q.role.as_deref())
    })
    .await;

    match found {
        Ok(Some(post)) => Json(ApiEnvelope::ok("post", post)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiEnvelope::failed("post", "Article not found", None::<Post>)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error fetching post: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiEnvelope::failed("post", "Failed to fetch post", None::<Post>)),
            )
                .into_response()
        }
    }
}

async fn featured_posts(State(state): State<Arc<ServerState>>) -> Response {
    let repository = state.repository.clone();
    query("posts", move || repository.featured_posts()).await
}

async fn list_categories(State(state): State<Arc<ServerState>>) -> Response {
    let repository = state.repository.clone();
    query("categories", move || repository.all_categories()).await
}

async fn list_audiences(State(state): State<Arc<ServerState>>) -> Response {
    let repository = state.repository.clone();
    query("audiences", move || repository.all_audiences()).await
}

async fn category_posts(
    State(state): State<Arc<ServerState>>,
    Path(segment): Path<String>,
) -> Response {
    let repository = state.repository.clone();
    query("posts", move || posts_for_category_segment(&repository, &segment)).await
}

async fn audience_posts(
    State(state): State<Arc<ServerState>>,
    Path(segment): Path<String>,
) -> Response {
    let repository = state.repository.clone();
    query("posts", move || {
        repository.posts_by_audience(&audience_from_slug(&segment))
    })
    .await
}

async fn sitemap(State(state): State<Arc<ServerState>>) -> Response {
    let state = state.clone();
    let rendered = tokio::task::spawn_blocking(move || -> Result<String> {
        let posts = state.repository.all_posts(None)?;
        let categories = state.repository.all_categories()?;
        let audiences = state.repository.all_audiences()?;
        Ok(render_sitemap(
            &state.site.config,
            &posts,
            &categories,
            &audiences,
            chrono::Utc::now(),
        ))
    })
    .await;

    match rendered {
        Ok(Ok(xml)) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Error rendering sitemap: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
        Err(e) => {
            tracing::error!("Sitemap task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn robots(State(state): State<Arc<ServerState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.site.config),
    )
        .into_response()
}

/// Category URL segments replace `/` with `-`, which cannot be undone for
/// categories like `educational/how-to`. Match articles whose categories map
/// to the segment instead.
fn posts_for_category_segment(repository: &ContentRepository, segment: &str) -> Result<Vec<Post>> {
    Ok(repository
        .all_posts(None)?
        .into_iter()
        .filter(|p| p.categories.iter().any(|c| category_slug(c) == segment))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLoader;
    use chrono_tz::Tz;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_category_segment_resolution() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("one.mdx"),
            "---\ncategories: market-analysis\n---\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("two.mdx"),
            "---\ncategories: glossary/definition\n---\n",
        )
        .unwrap();

        fs::write(
            tmp.path().join("three.mdx"),
            "---\ncategories: educational/how-to, buyer\n---\n",
        )
        .unwrap();

        let repository = ContentRepository::new(ContentLoader::new(tmp.path(), "mdx", Tz::UTC));

        let posts = posts_for_category_segment(&repository, "market-analysis").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "one");

        let posts = posts_for_category_segment(&repository, "glossary-definition").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "two");

        let posts =
            posts_for_category_segment(&repository, &category_slug("educational/how-to")).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "three");

        assert!(posts_for_category_segment(&repository, "nothing-here")
            .unwrap()
            .is_empty());
    }
}
