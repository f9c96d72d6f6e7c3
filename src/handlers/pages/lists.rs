// handlers/pages/lists.rs - GET /strains/, /planning/, /experiments/

use axum::extract::{Query, State};
use serde_json::json;

use crate::app::AppState;
use crate::database::models::{CultivationPlanning, Experiment, Record, Strain};
use crate::error::ApiError;
use crate::filter::{Filter, ListQuery, ListSpec, EXPERIMENT_LIST, PLANNING_LIST, STRAIN_LIST};
use crate::middleware::PageResponse;

async fn list_page<T: Record>(
    state: &AppState,
    spec: &ListSpec,
    template: &'static str,
    query: ListQuery,
) -> Result<PageResponse, ApiError> {
    let number = query.page_number()?;
    let page = Filter::new(spec, query.filter())
        .paginate::<T>(&state.pool, number, state.config.api.page_size)
        .await?;

    Ok(PageResponse::new(
        template,
        json!({
            "page_obj": page,
            "search_type": query.search_type,
            "q": query.q,
            "date_from": query.date_from,
            "date_to": query.date_to,
            "responsible": query.created_by,
        }),
    ))
}

pub async fn strains(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<PageResponse, ApiError> {
    list_page::<Strain>(&state, &STRAIN_LIST, "strains_list.html", query).await
}

pub async fn planning(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<PageResponse, ApiError> {
    list_page::<CultivationPlanning>(&state, &PLANNING_LIST, "planning_list.html", query).await
}

pub async fn experiments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<PageResponse, ApiError> {
    list_page::<Experiment>(&state, &EXPERIMENT_LIST, "experiments_list.html", query).await
}
