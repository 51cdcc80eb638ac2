//! Execution-path dispatch: a closed (resource, action) table.
//!
//! Create/get/update/delete calls go straight through the request
//! client (and a pagination walk for listings), never through dock
//! resolution, which exists only for the option builders. The table is
//! one `match` over (resource, action): supported pairs route to a
//! handler, everything else fails with a precise error.

use basecamp_client::pagination::{collect_by_link, collect_by_page, PaginationContract};
use basecamp_client::BasecampClient;
use reqwest::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ConnectorError, ConnectorResult};

/// Resources the execution path can operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Project,
    Person,
    Message,
    TodoList,
    Todo,
    Document,
    Upload,
    Comment,
    Campfire,
    CampfireMessage,
    Webhook,
    Column,
    Card,
    Event,
    Recording,
}

impl Resource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Person => "person",
            Self::Message => "message",
            Self::TodoList => "todolist",
            Self::Todo => "todo",
            Self::Document => "document",
            Self::Upload => "upload",
            Self::Comment => "comment",
            Self::Campfire => "campfire",
            Self::CampfireMessage => "campfire message",
            Self::Webhook => "webhook",
            Self::Column => "column",
            Self::Card => "card",
            Self::Event => "event",
            Self::Recording => "recording",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions in the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Get,
    List,
    Update,
    Delete,
    Complete,
    Uncomplete,
    Trash,
    Archive,
    Unarchive,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::List => "list",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Complete => "complete",
            Self::Uncomplete => "uncomplete",
            Self::Trash => "trash",
            Self::Archive => "archive",
            Self::Unarchive => "unarchive",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation to execute against an account.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub resource: Resource,
    pub action: Action,
    /// Account id, inserted verbatim into every URL.
    pub account: String,
    /// Path parameters (ids picked by the host's parameter mechanism).
    pub params: HashMap<String, String>,
    /// JSON payload for create/update. Empty means "send no body".
    pub body: Map<String, Value>,
}

impl OperationRequest {
    #[must_use]
    pub fn new(resource: Resource, action: Action, account: impl Into<String>) -> Self {
        Self {
            resource,
            action,
            account: account.into(),
            params: HashMap::new(),
            body: Map::new(),
        }
    }

    /// Set a path parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the JSON payload.
    #[must_use]
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    fn param(&self, name: &str) -> ConnectorResult<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConnectorError::MissingParameter(name.to_string()))
    }
}

/// Which pagination contract a resource's listing endpoint uses.
///
/// Fixed per endpoint — the remote API exposes the two contracts
/// inconsistently and nothing in a response says which one applies, so
/// this table is the source of truth, never runtime detection.
#[must_use]
pub fn list_contract(resource: Resource) -> PaginationContract {
    match resource {
        Resource::Project | Resource::Person | Resource::Message | Resource::Campfire => {
            PaginationContract::LinkHeader
        }
        Resource::TodoList
        | Resource::Todo
        | Resource::Document
        | Resource::Upload
        | Resource::Comment
        | Resource::CampfireMessage
        | Resource::Webhook
        | Resource::Card
        | Resource::Event => PaginationContract::PageCounter,
        // Columns arrive embedded in the card table body; recordings
        // have no listing endpoint of their own.
        Resource::Column | Resource::Recording => PaginationContract::None,
    }
}

/// Execute one operation. Unsupported (resource, action) pairs fail
/// with a precise error; supported pairs return the remote JSON (an
/// array for listings, the resource body otherwise, `null` for
/// bodiless responses).
pub async fn execute(
    client: &BasecampClient,
    req: &OperationRequest,
) -> ConnectorResult<Value> {
    use Action as A;
    use Resource as R;

    debug!("Executing {} {}", req.resource, req.action);

    match (req.resource, req.action) {
        // ── Projects ─────────────────────────────────────────────────
        (R::Project, A::Create) => send(client, req, Method::POST, "/projects.json".into()).await,
        (R::Project, A::Get) => {
            let id = req.param("projectId")?;
            send(client, req, Method::GET, format!("/projects/{id}.json")).await
        }
        (R::Project, A::Update) => {
            let id = req.param("projectId")?;
            send(client, req, Method::PUT, format!("/projects/{id}.json")).await
        }
        (R::Project, A::Delete) => {
            let id = req.param("projectId")?;
            send(client, req, Method::DELETE, format!("/projects/{id}.json")).await
        }

        // ── People ───────────────────────────────────────────────────
        (R::Person, A::Get) => {
            let id = req.param("personId")?;
            send(client, req, Method::GET, format!("/people/{id}.json")).await
        }

        // ── Messages ─────────────────────────────────────────────────
        (R::Message, A::Create) => {
            let project = req.param("projectId")?;
            let board = req.param("messageBoardId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/message_boards/{board}/messages.json"),
            )
            .await
        }
        (R::Message, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("messageId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/messages/{id}.json"),
            )
            .await
        }
        (R::Message, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("messageId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/messages/{id}.json"),
            )
            .await
        }

        // ── To-do lists ──────────────────────────────────────────────
        (R::TodoList, A::Create) => {
            let project = req.param("projectId")?;
            let todoset = req.param("todosetId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/todosets/{todoset}/todolists.json"),
            )
            .await
        }
        (R::TodoList, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("todolistId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/todolists/{id}.json"),
            )
            .await
        }
        (R::TodoList, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("todolistId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/todolists/{id}.json"),
            )
            .await
        }

        // ── To-dos ───────────────────────────────────────────────────
        (R::Todo, A::Create) => {
            let project = req.param("projectId")?;
            let todolist = req.param("todolistId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/todolists/{todolist}/todos.json"),
            )
            .await
        }
        (R::Todo, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("todoId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/todos/{id}.json"),
            )
            .await
        }
        (R::Todo, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("todoId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/todos/{id}.json"),
            )
            .await
        }
        (R::Todo, A::Complete) => {
            let project = req.param("projectId")?;
            let id = req.param("todoId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/todos/{id}/completion.json"),
            )
            .await
        }
        (R::Todo, A::Uncomplete) => {
            let project = req.param("projectId")?;
            let id = req.param("todoId")?;
            send(
                client,
                req,
                Method::DELETE,
                format!("/buckets/{project}/todos/{id}/completion.json"),
            )
            .await
        }

        // ── Documents ────────────────────────────────────────────────
        (R::Document, A::Create) => {
            let project = req.param("projectId")?;
            let vault = req.param("vaultId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/vaults/{vault}/documents.json"),
            )
            .await
        }
        (R::Document, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("documentId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/documents/{id}.json"),
            )
            .await
        }
        (R::Document, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("documentId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/documents/{id}.json"),
            )
            .await
        }

        // ── Uploads ──────────────────────────────────────────────────
        (R::Upload, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("uploadId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/uploads/{id}.json"),
            )
            .await
        }

        // ── Comments ─────────────────────────────────────────────────
        (R::Comment, A::Create) => {
            let project = req.param("projectId")?;
            let recording = req.param("recordingId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/recordings/{recording}/comments.json"),
            )
            .await
        }
        (R::Comment, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("commentId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/comments/{id}.json"),
            )
            .await
        }
        (R::Comment, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("commentId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/comments/{id}.json"),
            )
            .await
        }

        // ── Campfires ────────────────────────────────────────────────
        (R::Campfire, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("campfireId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/chats/{id}.json"),
            )
            .await
        }

        // ── Campfire lines ───────────────────────────────────────────
        (R::CampfireMessage, A::Create) => {
            let project = req.param("projectId")?;
            let campfire = req.param("campfireId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/chats/{campfire}/lines.json"),
            )
            .await
        }
        (R::CampfireMessage, A::Get) => {
            let project = req.param("projectId")?;
            let campfire = req.param("campfireId")?;
            let id = req.param("lineId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/chats/{campfire}/lines/{id}.json"),
            )
            .await
        }

        // ── Webhooks ─────────────────────────────────────────────────
        (R::Webhook, A::Create) => {
            let project = req.param("projectId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/webhooks.json"),
            )
            .await
        }
        (R::Webhook, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("webhookId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/webhooks/{id}.json"),
            )
            .await
        }
        (R::Webhook, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("webhookId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/webhooks/{id}.json"),
            )
            .await
        }
        (R::Webhook, A::Delete) => {
            let project = req.param("projectId")?;
            let id = req.param("webhookId")?;
            send(
                client,
                req,
                Method::DELETE,
                format!("/buckets/{project}/webhooks/{id}.json"),
            )
            .await
        }

        // ── Card table columns ───────────────────────────────────────
        (R::Column, A::Create) => {
            let project = req.param("projectId")?;
            let card_table = req.param("cardTableId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/card_tables/{card_table}/columns.json"),
            )
            .await
        }
        (R::Column, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("columnId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/card_tables/columns/{id}.json"),
            )
            .await
        }
        (R::Column, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("columnId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/card_tables/columns/{id}.json"),
            )
            .await
        }

        // ── Cards ────────────────────────────────────────────────────
        (R::Card, A::Create) => {
            let project = req.param("projectId")?;
            let column = req.param("columnId")?;
            send(
                client,
                req,
                Method::POST,
                format!("/buckets/{project}/card_tables/lists/{column}/cards.json"),
            )
            .await
        }
        (R::Card, A::Get) => {
            let project = req.param("projectId")?;
            let id = req.param("cardId")?;
            send(
                client,
                req,
                Method::GET,
                format!("/buckets/{project}/card_tables/cards/{id}.json"),
            )
            .await
        }
        (R::Card, A::Update) => {
            let project = req.param("projectId")?;
            let id = req.param("cardId")?;
            send(
                client,
                req,
                Method::PUT,
                format!("/buckets/{project}/card_tables/cards/{id}.json"),
            )
            .await
        }

        // ── Recording lifecycle ──────────────────────────────────────
        (R::Recording, A::Trash) => recording_status(client, req, "trashed").await,
        (R::Recording, A::Archive) => recording_status(client, req, "archived").await,
        (R::Recording, A::Unarchive) => recording_status(client, req, "active").await,

        // ── Listings ─────────────────────────────────────────────────
        (resource, A::List) => list(client, req, resource).await,

        (resource, action) => Err(ConnectorError::Unsupported { resource, action }),
    }
}

/// Listing endpoint path for a resource, from the request's parent ids.
fn list_path(req: &OperationRequest, resource: Resource) -> ConnectorResult<String> {
    let path = match resource {
        Resource::Project => "/projects.json".to_string(),
        Resource::Person => "/people.json".to_string(),
        Resource::Message => {
            let project = req.param("projectId")?;
            let board = req.param("messageBoardId")?;
            format!("/buckets/{project}/message_boards/{board}/messages.json")
        }
        Resource::TodoList => {
            let project = req.param("projectId")?;
            let todoset = req.param("todosetId")?;
            format!("/buckets/{project}/todosets/{todoset}/todolists.json")
        }
        Resource::Todo => {
            let project = req.param("projectId")?;
            let todolist = req.param("todolistId")?;
            format!("/buckets/{project}/todolists/{todolist}/todos.json")
        }
        Resource::Document => {
            let project = req.param("projectId")?;
            let vault = req.param("vaultId")?;
            format!("/buckets/{project}/vaults/{vault}/documents.json")
        }
        Resource::Upload => {
            let project = req.param("projectId")?;
            let vault = req.param("vaultId")?;
            format!("/buckets/{project}/vaults/{vault}/uploads.json")
        }
        Resource::Comment => {
            let project = req.param("projectId")?;
            let recording = req.param("recordingId")?;
            format!("/buckets/{project}/recordings/{recording}/comments.json")
        }
        Resource::Campfire => "/chats.json".to_string(),
        Resource::CampfireMessage => {
            let project = req.param("projectId")?;
            let campfire = req.param("campfireId")?;
            format!("/buckets/{project}/chats/{campfire}/lines.json")
        }
        Resource::Webhook => {
            let project = req.param("projectId")?;
            format!("/buckets/{project}/webhooks.json")
        }
        Resource::Card => {
            let project = req.param("projectId")?;
            let column = req.param("columnId")?;
            format!("/buckets/{project}/card_tables/lists/{column}/cards.json")
        }
        // The recording id is a required, independent parameter here;
        // it is never the project id reused.
        Resource::Event => {
            let project = req.param("projectId")?;
            let recording = req.param("recordingId")?;
            format!("/buckets/{project}/recordings/{recording}/events.json")
        }
        Resource::Column | Resource::Recording => {
            return Err(ConnectorError::Unsupported {
                resource,
                action: Action::List,
            })
        }
    };
    Ok(path)
}

async fn list(
    client: &BasecampClient,
    req: &OperationRequest,
    resource: Resource,
) -> ConnectorResult<Value> {
    let path = list_path(req, resource)?;
    let items = match list_contract(resource) {
        PaginationContract::LinkHeader => collect_by_link(client, &path, &req.account).await?,
        PaginationContract::PageCounter => {
            collect_by_page(client, Method::GET, &path, &Map::new(), &[], &req.account).await?
        }
        PaginationContract::None => {
            return Err(ConnectorError::Unsupported {
                resource,
                action: Action::List,
            })
        }
    };
    Ok(Value::Array(items))
}

async fn send(
    client: &BasecampClient,
    req: &OperationRequest,
    method: Method,
    path: String,
) -> ConnectorResult<Value> {
    let value = client
        .request(method, &path, &req.body, &[], &req.account)
        .await?;
    Ok(value)
}

async fn recording_status(
    client: &BasecampClient,
    req: &OperationRequest,
    status: &str,
) -> ConnectorResult<Value> {
    let project = req.param("projectId")?;
    let recording = req.param("recordingId")?;
    send(
        client,
        req,
        Method::PUT,
        format!("/buckets/{project}/recordings/{recording}/status/{status}.json"),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_contract_is_fixed_per_resource() {
        assert_eq!(
            list_contract(Resource::Project),
            PaginationContract::LinkHeader
        );
        assert_eq!(
            list_contract(Resource::Message),
            PaginationContract::LinkHeader
        );
        assert_eq!(
            list_contract(Resource::TodoList),
            PaginationContract::PageCounter
        );
        assert_eq!(
            list_contract(Resource::Event),
            PaginationContract::PageCounter
        );
        assert_eq!(
            list_contract(Resource::Campfire),
            PaginationContract::LinkHeader
        );
        assert_eq!(
            list_contract(Resource::Card),
            PaginationContract::PageCounter
        );
        assert_eq!(list_contract(Resource::Column), PaginationContract::None);
        assert_eq!(list_contract(Resource::Recording), PaginationContract::None);
    }

    #[test]
    fn missing_path_parameter_is_reported_by_name() {
        let req = OperationRequest::new(Resource::Event, Action::List, "1")
            .with_param("projectId", "123");
        let err = list_path(&req, Resource::Event).unwrap_err();
        assert!(
            matches!(err, ConnectorError::MissingParameter(name) if name == "recordingId")
        );
    }

    #[test]
    fn event_listing_uses_independent_recording_id() {
        let req = OperationRequest::new(Resource::Event, Action::List, "1")
            .with_param("projectId", "123")
            .with_param("recordingId", "456");
        assert_eq!(
            list_path(&req, Resource::Event).unwrap(),
            "/buckets/123/recordings/456/events.json"
        );
    }
}
