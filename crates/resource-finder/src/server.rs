/// HTTP API for the resource directory.
///
/// Routes:
/// - `GET  /healthz`                  — liveness plus resource count
/// - `GET  /api/resources`            — filtered, paginated listing
/// - `GET  /api/resources/{id}`       — single resource lookup
/// - `POST /api/resources/{id}/flag`  — report a resource for review
/// - `POST /api/reload`               — re-read the dataset file if it changed
///
/// The listing pipeline per request: extract filters from the query string, look
/// up the cached result ids for this catalog revision, otherwise apply the filters
/// over the sorted catalog, then slice out the requested page. CORS is wide open
/// on purpose — the directory is made to be embedded cross-origin.
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use directory_common::flag::FlagClient;

use crate::cache::ResultCache;
use crate::catalog::Catalog;
use crate::error::AppError;
use crate::filter::{apply_filters, ActiveFilterSet, ZipMatch};
use crate::messages::{self, Locale};
use crate::model::Resource;
use crate::page::{self, PAGE_SIZE};
use crate::reload::{ReloadResult, ReloadService};
use crate::session::Session;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<Catalog>>,
    pub cache: Arc<ResultCache>,
    pub flag: Option<Arc<FlagClient>>,
    pub reload: Arc<ReloadService>,
    pub zip_match: ZipMatch,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/resources", get(list_resources))
        .route("/api/resources/{id}", get(get_resource))
        .route("/api/resources/{id}/flag", post(flag_resource))
        .route("/api/reload", post(reload_catalog))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// --- Responses ---

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub resource_count: usize,
}

/// One page of filtered results, with enough context for the embedder to render a
/// filter description and a "load more" control.
#[derive(Debug, Serialize)]
pub struct ResourcePage {
    pub filters: ActiveFilterSet,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Serialize)]
pub struct FlagOutcome {
    pub flagged: bool,
    /// Localized confirmation; absent when the report did not go through.
    pub message: Option<String>,
}

// --- Handlers ---

async fn health(State(state): State<AppState>) -> Json<Health> {
    let catalog = state.catalog.read().await;
    Json(Health {
        status: "ok",
        resource_count: catalog.len(),
    })
}

pub async fn list_resources(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<ResourcePage> {
    let query = query.unwrap_or_default();
    let session = Session::from_query(&query);
    let active = session.filters.active();
    let catalog = state.catalog.read().await;

    // An unfiltered listing is just the catalog in display order; only filter
    // combinations are worth caching.
    let ids = if active.is_empty() {
        catalog.resources.iter().map(|r| r.id.clone()).collect()
    } else {
        match state.cache.get_results(&catalog.fingerprint, &active).await {
            Some(ids) => {
                debug!(total = ids.len(), "filter cache hit");
                ids
            }
            None => {
                let matched = apply_filters(&active, &catalog.resources, state.zip_match);
                let ids: Vec<String> = matched.into_iter().map(|r| r.id.clone()).collect();
                state
                    .cache
                    .set_results(&catalog.fingerprint, &active, &ids)
                    .await;
                ids
            }
        }
    };

    let total = ids.len();
    let has_more = page::has_more(&ids, session.page);
    let resources: Vec<Resource> = page::visible_slice(&ids, session.page)
        .iter()
        .filter_map(|id| catalog.get(id).cloned())
        .collect();

    Json(ResourcePage {
        filters: active,
        total,
        page: session.page.get(),
        page_size: PAGE_SIZE,
        has_more,
        resources,
    })
}

pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resource>, AppError> {
    let catalog = state.catalog.read().await;
    catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(AppError::NotFound(id))
}

pub async fn flag_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<FlagOutcome>, AppError> {
    let query = query.unwrap_or_default();
    let locale = Locale::from_query(&query);
    let mut session = Session::from_query(&query);

    if state.catalog.read().await.get(&id).is_none() {
        return Err(AppError::NotFound(id));
    }

    let Some(client) = &state.flag else {
        warn!(resource = %id, "flag webhook not configured, dropping flag request");
        return Ok(Json(FlagOutcome {
            flagged: false,
            message: None,
        }));
    };

    match client.flag_resource(&id).await {
        Ok(()) => session.set_toast(messages::flag_success(locale)),
        Err(e) => {
            // Logged for operators, swallowed for the caller: the directory keeps
            // working whether or not the report landed, and the toast stays unset.
            error!(error = %e, resource = %id, "flag request failed");
        }
    }

    Ok(Json(FlagOutcome {
        flagged: session.toast.is_some(),
        message: session.toast,
    }))
}

async fn reload_catalog(State(state): State<AppState>) -> Result<Json<ReloadResult>, AppError> {
    let result = state.reload.reload_if_changed().await?;
    Ok(Json(result))
}
