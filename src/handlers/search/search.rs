use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Redirect},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;
use tower_sessions::Session;

use crate::{
    data::models::{ControllerState, SearchRequest, ViewError},
    features::search::SearchController,
    features::view::ViewRegistry,
    utils::{self, render_template},
};

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
}

// Mounts the session's view, or returns the one already mounted.
async fn view_for(
    views: &ViewRegistry,
    session: &Session,
) -> Result<Arc<SearchController>, ViewError> {
    let existing = utils::current_view_id(session).await;
    let (id, controller) = views.mount(existing).await;
    if existing != Some(id) {
        utils::remember_view(session, id).await?;
    }
    Ok(controller)
}

// The path carries the ID's written form only, so it is matched against the
// displayed items rather than parsed back into a typed ID.
async fn toggle_by_id(controller: &SearchController, raw_id: &str) -> Result<(), ViewError> {
    let item = controller
        .find_by_key(raw_id)
        .await
        .ok_or_else(|| ViewError::ItemNotFound(raw_id.to_string()))?;
    controller.toggle_done(&item).await;
    Ok(())
}

// Handler for HTML page
pub async fn search_page(
    State(views): State<Arc<ViewRegistry>>,
    Extension(templates): Extension<Arc<tera::Tera>>,
    session: Session,
) -> Result<impl IntoResponse, ViewError> {
    let controller = view_for(&views, &session).await?;
    let state = controller.snapshot().await;

    let mut context = Context::new();
    context.insert("query", &state.last_query);
    context.insert("working", &state.is_working);
    context.insert("results", &state.results);
    Ok(render_template(&templates, "search.html", context))
}

pub async fn submit_search(
    State(views): State<Arc<ViewRegistry>>,
    session: Session,
    Form(form): Form<SearchForm>,
) -> Result<Redirect, ViewError> {
    let controller = view_for(&views, &session).await?;
    controller.search(&form.query).await;
    Ok(Redirect::to("/"))
}

pub async fn submit_toggle(
    State(views): State<Arc<ViewRegistry>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect, ViewError> {
    let controller = view_for(&views, &session).await?;
    toggle_by_id(&controller, &id).await?;
    Ok(Redirect::to("/"))
}

pub async fn close_view(
    State(views): State<Arc<ViewRegistry>>,
    session: Session,
) -> Result<Redirect, ViewError> {
    if let Some(id) = utils::forget_view(&session).await? {
        views.unmount(id).await;
    }
    Ok(Redirect::to("/"))
}

pub async fn state_api(
    State(views): State<Arc<ViewRegistry>>,
    session: Session,
) -> Result<Json<ControllerState>, ViewError> {
    let controller = view_for(&views, &session).await?;
    Ok(Json(controller.snapshot().await))
}

pub async fn search_api(
    State(views): State<Arc<ViewRegistry>>,
    session: Session,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ControllerState>, ViewError> {
    let controller = view_for(&views, &session).await?;
    controller.search(&request.query).await;
    Ok(Json(controller.snapshot().await))
}

pub async fn toggle_api(
    State(views): State<Arc<ViewRegistry>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ControllerState>, ViewError> {
    let controller = view_for(&views, &session).await?;
    toggle_by_id(&controller, &id).await?;
    Ok(Json(controller.snapshot().await))
}
