// handlers/pages/home.rs - GET /home/

use axum::extract::State;
use serde_json::json;

use crate::app::AppState;
use crate::database::models::{CultivationPlanning, Experiment, Project, Strain, SubstanceIdentification};
use crate::database::Repository;
use crate::middleware::{PageResponse, SessionUser};

/// The signed-in user, their API token and the records they created
pub async fn show(
    State(state): State<AppState>,
    SessionUser { user, .. }: SessionUser,
) -> Result<PageResponse, crate::error::ApiError> {
    let pool = &state.pool;

    let strains = Repository::<Strain>::new(pool.clone()).select_by_creator(user.id).await?;
    let plans = Repository::<CultivationPlanning>::new(pool.clone()).select_by_creator(user.id).await?;
    let identifications = Repository::<SubstanceIdentification>::new(pool.clone())
        .select_by_creator(user.id)
        .await?;
    let experiments = Repository::<Experiment>::new(pool.clone()).select_by_creator(user.id).await?;
    let projects = Repository::<Project>::new(pool.clone()).select_by_creator(user.id).await?;

    Ok(PageResponse::new(
        "index.html",
        json!({
            "user": user,
            "display_name": user.display_name(),
            "token": user.token,
            "strains": strains,
            "plans": plans,
            "identifications": identifications,
            "experiments": experiments,
            "projects": projects,
        }),
    ))
}
