use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ChangelogQuery {
    pub route_id: Option<Uuid>,
    #[serde(default)]
    pub include_archived: bool,
}
