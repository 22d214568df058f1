pub mod config;
pub mod dashboard;
pub mod drive;
pub mod format;
pub mod transition;

use docflow_client::ClientError;
use docflow_core::config::{AppConfig, LoadOptions};
use docflow_core::domain::approval::Actor;
use docflow_core::domain::document::{DocumentKind, ResourceDescriptor};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    /// Success carrying a structured `data` payload next to the message.
    pub fn success_with<T: Serialize>(command: &str, message: impl Into<String>, data: &T) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Local refusals exit 2 like bad input; anything the backend or the
    /// network produced exits 4.
    pub fn client_failure(command: &str, error: &ClientError) -> Self {
        let exit_code = if error.is_local() { 2 } else { 4 };
        let message = match error {
            ClientError::Transport(_) | ClientError::Decode(_) => error.to_string(),
            _ => error.dialog_message(),
        };
        Self::failure(command, error.error_class(), message, exit_code)
    }
}

/// Arguments naming a single document and who is acting on it.
#[derive(Debug, Clone, Default)]
pub struct DocumentArgs {
    pub kind: String,
    pub id: String,
    /// Current status; when absent it is read from the stored document.
    pub from: Option<String>,
    pub actor: String,
    pub actor_name: Option<String>,
}

impl DocumentArgs {
    pub(crate) fn resource(&self) -> Result<ResourceDescriptor, String> {
        let kind: DocumentKind = self.kind.parse().map_err(|error| format!("{error}"))?;
        Ok(ResourceDescriptor::for_kind(kind))
    }

    pub(crate) fn actor(&self) -> Result<Actor, String> {
        let id = self.actor.trim();
        if id.is_empty() {
            return Err("an acting user id is required".to_string());
        }
        let name = self.actor_name.as_deref().map(str::trim).filter(|name| !name.is_empty());
        Ok(Actor::new(id, name.unwrap_or(id)))
    }
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn build_runtime(command: &str) -> Result<tokio::runtime::Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

pub(crate) fn invalid_argument(command: &str, message: impl Into<String>) -> CommandResult {
    CommandResult::failure(command, "invalid_argument", message, 2)
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use docflow_client::ClientError;
    use docflow_core::errors::DomainError;
    use serde_json::{json, Value};

    use super::{CommandResult, DocumentArgs};

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).expect("command output is json")
    }

    #[test]
    fn success_with_embeds_data_and_plain_success_omits_it() {
        let with = CommandResult::success_with("words", "ok", &json!({ "amount": "10" }));
        assert_eq!(parse(&with.output)["data"]["amount"], "10");

        let without = CommandResult::success("words", "ok");
        assert!(parse(&without.output).get("data").is_none());
    }

    #[test]
    fn client_failures_split_local_from_remote_exit_codes() {
        let local = CommandResult::client_failure(
            "advance",
            &ClientError::Validation(DomainError::MissingDocumentId),
        );
        assert_eq!(local.exit_code, 2);
        assert_eq!(parse(&local.output)["error_class"], "validation");

        let remote = CommandResult::client_failure(
            "advance",
            &ClientError::Http { status: 409, message: "Already approved".to_string() },
        );
        assert_eq!(remote.exit_code, 4);
        assert_eq!(parse(&remote.output)["message"], "Already approved");
    }

    #[test]
    fn actor_name_falls_back_to_id() {
        let args = DocumentArgs { actor: " u-9 ".to_string(), ..DocumentArgs::default() };
        let actor = args.actor().expect("actor");
        assert_eq!(actor.id, "u-9");
        assert_eq!(actor.name, "u-9");

        let blank = DocumentArgs::default();
        assert!(blank.actor().is_err());
    }
}
