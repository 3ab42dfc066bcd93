//! Request and response bodies of the backend's JSON endpoints.

use serde::{Deserialize, Serialize};

use super::ProcessRecord;

/// Body of `POST /execute`.
#[derive(Debug, Serialize)]
pub struct CommandRequest<'a> {
    pub command: &'a str,
}

/// Reply from `POST /execute`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandReply {
    #[serde(default)]
    pub output: Option<String>,
    pub prompt: String,
}

/// Reply from `GET /get_processes`.
#[derive(Debug, Deserialize)]
pub struct ProcessList {
    #[serde(default)]
    pub processes: Vec<ProcessRecord>,
}

/// Body of `POST /cancel_processes`.
#[derive(Debug, Serialize)]
pub struct CancelRequest<'a> {
    pub pids: &'a [u32],
}

/// Reply from `POST /cancel_processes`.
///
/// `success` means the server accepted the request; individual pids that
/// could not be cancelled are listed in `errors`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CancelReply {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CancelFailure>,
}

/// One pid the backend could not cancel, with its reason.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CancelFailure {
    pub pid: u32,
    pub error: String,
}
