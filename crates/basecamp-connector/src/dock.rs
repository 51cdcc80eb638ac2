//! Project dock resolution.
//!
//! Every Basecamp project carries a "dock": an ordered directory of
//! pointers to its enabled first-class tools (to-do set, message board,
//! chat room, vault, schedule, questionnaire, card table). The dock is
//! fetched fresh on every resolution call and never cached — a project
//! admin can toggle tools between two invocations.

use std::sync::LazyLock;

use basecamp_client::BasecampClient;
use regex::Regex;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ConnectorResult;

/// The fixed dock vocabulary. Wire names are the API's exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockTool {
    Todoset,
    MessageBoard,
    Chat,
    Vault,
    Schedule,
    Questionnaire,
    KanbanBoard,
}

impl DockTool {
    /// The wire-level dock entry name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todoset => "todoset",
            Self::MessageBoard => "message_board",
            Self::Chat => "chat",
            Self::Vault => "vault",
            Self::Schedule => "schedule",
            Self::Questionnaire => "questionnaire",
            Self::KanbanBoard => "kanban_board",
        }
    }
}

impl std::fmt::Display for DockTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dock entry: a typed pointer to a project's sub-resource.
#[derive(Debug, Clone, Deserialize)]
pub struct DockEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Bucket/todoset id pair extracted from a todoset dock URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodosetRef {
    pub bucket_id: String,
    pub todoset_id: String,
}

/// Todoset dock URLs embed both ids in the path.
static TODOSET_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"buckets/(\d+)/todosets/(\d+)").expect("todoset URL pattern is valid")
});

/// Find the first dock entry for `tool` on a project.
///
/// Absence is `Ok(None)`, never an error — dock entries are optional
/// per project (a chat room can be disabled, for example).
pub async fn resolve_dock_entry(
    client: &BasecampClient,
    account: &str,
    project_id: &str,
    tool: DockTool,
) -> ConnectorResult<Option<DockEntry>> {
    let path = format!("/buckets/{project_id}/project.json");
    let project = client
        .request(Method::GET, &path, &Map::new(), &[], account)
        .await?;

    let Some(dock) = project.get("dock").and_then(Value::as_array) else {
        debug!("Project {} has no dock array", project_id);
        return Ok(None);
    };

    for raw in dock {
        if raw.get("name").and_then(Value::as_str) == Some(tool.as_str()) {
            let entry: DockEntry = serde_json::from_value(raw.clone())?;
            return Ok(Some(entry));
        }
    }
    debug!("Project {} dock has no {} entry", project_id, tool);
    Ok(None)
}

/// Extract the bucket/todoset ids from a dock entry's URL.
///
/// A non-matching URL indicates an incompatible API version and is
/// treated exactly like an absent entry.
#[must_use]
pub fn todoset_ref(entry: &DockEntry) -> Option<TodosetRef> {
    let url = entry.url.as_deref()?;
    let caps = TODOSET_URL_RE.captures(url)?;
    Some(TodosetRef {
        bucket_id: caps[1].to_string(),
        todoset_id: caps[2].to_string(),
    })
}

/// Resolve a project's todoset down to its bucket/todoset id pair.
pub async fn resolve_todoset(
    client: &BasecampClient,
    account: &str,
    project_id: &str,
) -> ConnectorResult<Option<TodosetRef>> {
    let entry = resolve_dock_entry(client, account, project_id, DockTool::Todoset).await?;
    Ok(entry.as_ref().and_then(todoset_ref))
}
