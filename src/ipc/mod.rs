//! IPC Route Table
//!
//! Named request handlers the UI invokes for session-file bookkeeping:
//!
//! | route                      | arguments              | response            |
//! |----------------------------|------------------------|---------------------|
//! | `save-temp-file`           | `fileName`, `buffer`   | absolute path       |
//! | `get-current-session-path` | none                   | path or `""`        |
//! | `list-sessions`            | none                   | folder names        |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error};

use crate::storage::sessions::SessionIndex;
use crate::storage::temp_files::save_temp_file;

/// Every route the router answers
pub const ROUTES: [&str; 3] = ["save-temp-file", "get-current-session-path", "list-sessions"];

/// A request for one of the routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "kebab-case")]
pub enum IpcRequest {
    SaveTempFile {
        #[serde(rename = "fileName")]
        file_name: String,
        buffer: Vec<u8>,
    },
    GetCurrentSessionPath,
    ListSessions,
}

impl IpcRequest {
    pub fn route(&self) -> &'static str {
        match self {
            IpcRequest::SaveTempFile { .. } => "save-temp-file",
            IpcRequest::GetCurrentSessionPath => "get-current-session-path",
            IpcRequest::ListSessions => "list-sessions",
        }
    }

    /// Build a request from a route name and its JSON arguments
    pub fn from_route(route: &str, args: Value) -> Result<Self, IpcError> {
        if !ROUTES.contains(&route) {
            return Err(IpcError::UnknownRoute(route.to_string()));
        }

        let mut object = match args {
            Value::Object(object) => object,
            Value::Null => serde_json::Map::new(),
            other => {
                return Err(IpcError::InvalidArguments {
                    route: route.to_string(),
                    message: format!("expected an object, got {}", other),
                })
            }
        };
        object.insert("route".to_string(), Value::String(route.to_string()));

        serde_json::from_value(Value::Object(object)).map_err(|e| IpcError::InvalidArguments {
            route: route.to_string(),
            message: e.to_string(),
        })
    }
}

/// Successful route result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IpcResponse {
    /// A filesystem path; empty when there is nothing to point at
    Path(String),
    /// Session folder names
    Sessions(Vec<String>),
}

/// Route failures
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("unknown IPC route: {0}")]
    UnknownRoute(String),

    #[error("invalid arguments for {route}: {message}")]
    InvalidArguments { route: String, message: String },

    #[error("{route} failed: {source}")]
    Io {
        route: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Handles IPC requests against the session root and temp directory
#[derive(Debug, Clone)]
pub struct IpcRouter {
    sessions: SessionIndex,
    temp_dir: PathBuf,
}

impl IpcRouter {
    pub fn new(sessions_root: impl Into<PathBuf>, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions: SessionIndex::new(sessions_root),
            temp_dir: temp_dir.into(),
        }
    }

    pub fn sessions(&self) -> &SessionIndex {
        &self.sessions
    }

    /// Run a typed request
    pub async fn handle(&self, request: IpcRequest) -> Result<IpcResponse, IpcError> {
        let route = request.route();
        debug!("IPC {} invoked", route);

        let result = match request {
            IpcRequest::SaveTempFile { file_name, buffer } => {
                debug!("save-temp-file: {} ({} bytes)", file_name, buffer.len());
                save_temp_file(&self.temp_dir, &file_name, &buffer)
                    .await
                    .map(|path| IpcResponse::Path(path.to_string_lossy().into_owned()))
            }
            IpcRequest::GetCurrentSessionPath => {
                self.sessions.current_session_path().await.map(|path| {
                    IpcResponse::Path(
                        path.map(|p| p.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                    )
                })
            }
            IpcRequest::ListSessions => self.sessions.list_sessions().await.map(IpcResponse::Sessions),
        };

        result.map_err(|source| {
            error!("IPC {} failed: {}", route, source);
            IpcError::Io { route, source }
        })
    }

    /// Resolve `route` by name and run it with JSON arguments
    pub async fn invoke(&self, route: &str, args: Value) -> Result<IpcResponse, IpcError> {
        let request = IpcRequest::from_route(route, args)?;
        self.handle(request).await
    }
}
