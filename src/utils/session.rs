use tower_sessions::Session;

use crate::data::models::ViewError;
use crate::features::view::registry::ViewId;

const VIEW_KEY: &str = "view_id";

pub async fn remember_view(session: &Session, view_id: ViewId) -> Result<(), ViewError> {
    session.insert(VIEW_KEY, view_id).await?;
    Ok(())
}

pub async fn forget_view(session: &Session) -> Result<Option<ViewId>, ViewError> {
    Ok(session.remove::<ViewId>(VIEW_KEY).await?)
}

pub async fn current_view_id(session: &Session) -> Option<ViewId> {
    match session.get::<ViewId>(VIEW_KEY).await {
        Ok(id) => id,
        Err(e) => {
            log::error!("Failed to read view id from session: {}", e);
            None
        }
    }
}
