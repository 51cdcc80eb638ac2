//! Option-list builders for dependent dropdowns.
//!
//! Each builder is a read-only query composing dock resolution and an
//! exhaustive pagination walk into the `{name, value}` pairs a
//! dependent dropdown needs. Parent ids (account, project, card table)
//! come from the host context.
//!
//! Failure policy: an absent dock entry or non-matching dock URL yields
//! an empty list, never an error — the host then shows "no matching
//! options". Transport and API failures still propagate.

use basecamp_client::pagination::{collect_by_link, collect_by_link_url, collect_by_page};
use basecamp_client::BasecampClient;
use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::ParameterSource;
use crate::dock::{resolve_dock_entry, resolve_todoset, DockEntry, DockTool};
use crate::error::ConnectorResult;

/// Account product codes this connector supports. Everything else in
/// the launchpad account list (other 37signals product lines) is
/// silently excluded.
const SUPPORTED_PRODUCTS: [&str; 2] = ["bc3", "bc4"];

/// One selectable entry: display label plus stringified id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub name: String,
    pub value: String,
}

impl OptionEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Stringify an id that may arrive as a JSON number or string.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Display label for a listed item, trying the fields Basecamp
/// actually populates per resource kind.
fn label(item: &Value, fallback: &str) -> String {
    ["title", "name", "content", "filename"]
        .iter()
        .find_map(|field| item.get(field).and_then(Value::as_str))
        .map_or_else(|| fallback.to_string(), str::to_string)
}

/// Flatten listed items into option entries; items without an id are
/// skipped.
fn to_options(items: &[Value], fallback: &str) -> Vec<OptionEntry> {
    items
        .iter()
        .filter_map(|item| {
            let value = item.get("id").and_then(id_string)?;
            Some(OptionEntry::new(label(item, fallback), value))
        })
        .collect()
}

/// Accounts the signed-in user may act on, from the launchpad
/// authorization endpoint (not the API host), filtered to supported
/// product codes.
pub async fn list_accounts(client: &BasecampClient) -> ConnectorResult<Vec<OptionEntry>> {
    let url = format!("{}/authorization.json", client.config().launchpad_origin);
    let (value, _) = client.request_url(Method::GET, &url).await?;

    let Some(accounts) = value.get("accounts").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let entries = accounts
        .iter()
        .filter(|account| {
            account
                .get("product")
                .and_then(Value::as_str)
                .is_some_and(|product| SUPPORTED_PRODUCTS.contains(&product))
        })
        .filter_map(|account| {
            let value = account.get("id").and_then(id_string)?;
            Some(OptionEntry::new(label(account, "Unnamed account"), value))
        })
        .collect();
    Ok(entries)
}

/// All projects on the account (Link-header walk).
pub async fn list_projects(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let items = collect_by_link(client, "/projects.json", &account).await?;
    Ok(to_options(&items, "Unnamed project"))
}

/// All people visible on the account (Link-header walk).
pub async fn list_people(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let items = collect_by_link(client, "/people.json", &account).await?;
    Ok(to_options(&items, "Unnamed person"))
}

/// Direct children of the project's root vault (Link-header walk).
pub async fn list_vaults(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let Some(root) = vault_root(client, &account, &project).await? else {
        return Ok(Vec::new());
    };
    let url = format!(
        "{}/{}/buckets/{}/vaults/{}/vaults.json",
        client.config().api_origin,
        account,
        project,
        root.1
    );
    let items = collect_by_link_url(client, &url).await?;
    Ok(to_options(&items, "Unnamed vault"))
}

/// The root vault followed by its direct children (count-heuristic
/// walk). The root is always the first entry, regardless of how many
/// pages of children follow.
pub async fn list_nested_vaults(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let Some((root_entry, root_id)) = vault_root(client, &account, &project).await? else {
        return Ok(Vec::new());
    };

    let path = format!("/buckets/{project}/vaults/{root_id}/vaults.json");
    let children =
        collect_by_page(client, Method::GET, &path, &Map::new(), &[], &account).await?;

    let mut entries = Vec::with_capacity(children.len() + 1);
    entries.push(OptionEntry::new(
        root_entry.title.unwrap_or_else(|| "Root vault".to_string()),
        root_id,
    ));
    entries.extend(to_options(&children, "Unnamed vault"));
    Ok(entries)
}

/// Resolve the vault dock entry to `(entry, id-as-string)`.
async fn vault_root(
    client: &BasecampClient,
    account: &str,
    project: &str,
) -> ConnectorResult<Option<(DockEntry, String)>> {
    let entry = resolve_dock_entry(client, account, project, DockTool::Vault).await?;
    Ok(entry.and_then(|entry| entry.id.map(|id| (entry.clone(), id.to_string()))))
}

/// To-do lists under the project's todoset. The bucket/todoset pair is
/// extracted from the dock URL; a non-matching URL yields an empty
/// list, same as an absent todoset.
pub async fn list_todolists(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let Some(todoset) = resolve_todoset(client, &account, &project).await? else {
        return Ok(Vec::new());
    };
    let path = format!(
        "/buckets/{}/todosets/{}/todolists.json",
        todoset.bucket_id, todoset.todoset_id
    );
    let items = collect_by_page(client, Method::GET, &path, &Map::new(), &[], &account).await?;
    Ok(to_options(&items, "Unnamed to-do list"))
}

/// Check-in questions under the project's questionnaire.
pub async fn list_questions(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_scoped_page_walk(
        client,
        ctx,
        DockTool::Questionnaire,
        "questionnaires",
        "questions.json",
        "Unnamed question",
    )
    .await
}

/// Documents in the project's vault.
pub async fn list_documents(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_scoped_page_walk(
        client,
        ctx,
        DockTool::Vault,
        "vaults",
        "documents.json",
        "Unnamed document",
    )
    .await
}

/// Uploads in the project's vault.
pub async fn list_uploads(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_scoped_page_walk(
        client,
        ctx,
        DockTool::Vault,
        "vaults",
        "uploads.json",
        "Unnamed upload",
    )
    .await
}

/// Messages on the project's message board. Unlike the other
/// bucket-scoped listings this endpoint paginates by Link header.
pub async fn list_messages(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let Some(board) =
        resolve_dock_entry(client, &account, &project, DockTool::MessageBoard).await?
    else {
        return Ok(Vec::new());
    };
    let Some(board_id) = board.id else {
        return Ok(Vec::new());
    };
    let path = format!("/buckets/{project}/message_boards/{board_id}/messages.json");
    let items = collect_by_link(client, &path, &account).await?;
    Ok(to_options(&items, "Untitled message"))
}

/// Webhooks configured on the project.
pub async fn list_webhooks(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let path = format!("/buckets/{project}/webhooks.json");
    let items = collect_by_page(client, Method::GET, &path, &Map::new(), &[], &account).await?;
    // Webhooks have no title; the payload URL is the label.
    let entries = items
        .iter()
        .filter_map(|item| {
            let value = item.get("id").and_then(id_string)?;
            let name = item
                .get("payload_url")
                .and_then(Value::as_str)
                .unwrap_or("Unnamed webhook");
            Some(OptionEntry::new(name, value))
        })
        .collect();
    Ok(entries)
}

/// Project templates on the account.
pub async fn list_templates(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let items = collect_by_page(
        client,
        Method::GET,
        "/templates.json",
        &Map::new(),
        &[],
        &account,
    )
    .await?;
    Ok(to_options(&items, "Unnamed template"))
}

/// Columns of an already-chosen card table. Fetched as a single GET
/// and flattened from the card table's `lists` field — this endpoint
/// does not paginate.
pub async fn list_columns(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let card_table = ctx.required("cardTableId")?;
    let path = format!("/buckets/{project}/card_tables/{card_table}.json");
    let table = client
        .request(Method::GET, &path, &Map::new(), &[], &account)
        .await?;
    let Some(lists) = table.get("lists").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    Ok(to_options(lists, "Unnamed column"))
}

/// Shared shape of the bucket-scoped, dock-resolved page walks.
async fn dock_scoped_page_walk(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
    tool: DockTool,
    segment: &str,
    leaf: &str,
    fallback: &str,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let Some(entry) = resolve_dock_entry(client, &account, &project, tool).await? else {
        return Ok(Vec::new());
    };
    let Some(id) = entry.id else {
        return Ok(Vec::new());
    };
    let path = format!("/buckets/{project}/{segment}/{id}/{leaf}");
    let items = collect_by_page(client, Method::GET, &path, &Map::new(), &[], &account).await?;
    Ok(to_options(&items, fallback))
}

/// At most one entry for a dock-resolved single resource, with a fixed
/// human-readable label when the remote object carries no title.
async fn dock_single_option(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
    tool: DockTool,
    fallback: &str,
) -> ConnectorResult<Vec<OptionEntry>> {
    let account = ctx.required("accountId")?;
    let project = ctx.required("projectId")?;
    let Some(entry) = resolve_dock_entry(client, &account, &project, tool).await? else {
        return Ok(Vec::new());
    };
    let Some(id) = entry.id else {
        return Ok(Vec::new());
    };
    let name = entry.title.unwrap_or_else(|| fallback.to_string());
    Ok(vec![OptionEntry::new(name, id.to_string())])
}

/// The project's message board, if enabled.
pub async fn message_board_option(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_single_option(client, ctx, DockTool::MessageBoard, "Message Board").await
}

/// The project's campfire (chat room), if enabled.
pub async fn campfire_option(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_single_option(client, ctx, DockTool::Chat, "Campfire").await
}

/// The project's schedule, if enabled.
pub async fn schedule_option(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_single_option(client, ctx, DockTool::Schedule, "Schedule").await
}

/// The project's automatic check-in questionnaire, if enabled.
pub async fn questionnaire_option(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_single_option(client, ctx, DockTool::Questionnaire, "Automatic Check-ins").await
}

/// The project's card table, if enabled.
pub async fn card_table_option(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_single_option(client, ctx, DockTool::KanbanBoard, "Card Table").await
}

/// The project's todoset, if enabled.
pub async fn todoset_option(
    client: &BasecampClient,
    ctx: &dyn ParameterSource,
) -> ConnectorResult<Vec<OptionEntry>> {
    dock_single_option(client, ctx, DockTool::Todoset, "To-dos").await
}
