use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use hanrei_core::filter::DEFAULT_PER_PAGE;
use hanrei_core::{paginate, Bm25Params, CaseId, Corpus, Facets, Record, SortOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub right_type: Option<String>,
    pub case_type: Option<String>,
    pub result: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}
fn default_page() -> usize { 1 }
fn default_per_page() -> usize { DEFAULT_PER_PAGE }

#[derive(Deserialize)]
pub struct SimilarParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}
fn default_limit() -> usize { 5 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub results: Vec<CaseSummary>,
}

/// What a result card shows.
#[derive(Serialize)]
pub struct CaseSummary {
    pub id: CaseId,
    pub title: String,
    pub case_number: Option<String>,
    pub decision_date: Option<String>,
    pub division: Option<String>,
    pub right_type: Option<String>,
    pub result: Option<String>,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
}

impl From<&Record> for CaseSummary {
    fn from(r: &Record) -> Self {
        Self {
            id: r.id,
            title: r.display_title().to_string(),
            case_number: r.case_number.clone(),
            decision_date: r.decision_date.clone(),
            division: r.division.clone(),
            right_type: r.right_type.clone(),
            result: r.result.clone(),
            plaintiff: r.plaintiff.clone(),
            defendant: r.defendant.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct SimilarHit {
    pub case: CaseSummary,
    pub score: f64,
}

#[derive(Serialize)]
pub struct SimilarResponse {
    pub id: CaseId,
    pub results: Vec<SimilarHit>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub num_docs: usize,
    pub vocabulary: usize,
    pub avg_doc_len: f64,
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
}

pub fn build_app(data_path: &str, params: Bm25Params) -> Result<Router> {
    // Load and index the corpus once at startup
    let corpus = Corpus::open(data_path, params)?;
    Ok(build_router(Arc::new(corpus)))
}

pub fn build_router(corpus: Arc<Corpus>) -> Router {
    let app_state = AppState { corpus };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/facets", get(facets_handler))
        .route("/stats", get(stats_handler))
        .route("/cases/:id", get(case_handler))
        .route("/cases/:id/similar", get(similar_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let query = hanrei_core::Query {
        text: Some(params.q.clone()),
        right_type: params.right_type,
        case_type: params.case_type,
        result: params.result,
        sort: params.sort,
    };
    let hits = state.corpus.search(&query);
    let page = paginate(&hits, params.page, params.per_page);
    let results = page.items.iter().map(|r| CaseSummary::from(*r)).collect();

    let elapsed = start.elapsed();
    tracing::debug!(q = %params.q, total_hits = page.total, "search");
    Json(SearchResponse {
        query: params.q,
        took_s: elapsed.as_secs_f64(),
        total_hits: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
        results,
    })
}

pub async fn case_handler(State(state): State<AppState>, Path(id): Path<CaseId>) -> Result<Json<Record>, (StatusCode, String)> {
    state
        .corpus
        .get(id)
        .map(|r| Json(r.clone()))
        .ok_or_else(|| not_found(id))
}

pub async fn similar_handler(
    State(state): State<AppState>,
    Path(id): Path<CaseId>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<SimilarResponse>, (StatusCode, String)> {
    let hits = state.corpus.find_similar_by_id(id, params.limit).ok_or_else(|| not_found(id))?;
    let results = hits
        .into_iter()
        .map(|h| SimilarHit { case: CaseSummary::from(h.record), score: h.score })
        .collect();
    Ok(Json(SimilarResponse { id, results }))
}

pub async fn facets_handler(State(state): State<AppState>) -> Json<Facets> {
    Json(state.corpus.facets())
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let index = state.corpus.index();
    Json(StatsResponse {
        num_docs: index.num_docs(),
        vocabulary: index.vocabulary_len(),
        avg_doc_len: index.avg_doc_len(),
    })
}

fn not_found(id: CaseId) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("case {id} not found"))
}
