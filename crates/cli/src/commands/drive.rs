use docflow_client::{ApiClient, ClientError, TransitionService, WorkflowDriver};
use docflow_core::domain::approval::ApprovalStatus;
use docflow_core::domain::document::DocumentId;

use crate::commands::{
    build_runtime, invalid_argument, load_config, CommandResult, DocumentArgs,
};

const COMMAND: &str = "drive";

pub fn run(args: DocumentArgs) -> CommandResult {
    let resource = match args.resource() {
        Ok(resource) => resource,
        Err(message) => return invalid_argument(COMMAND, message),
    };
    let actor = match args.actor() {
        Ok(actor) => actor,
        Err(message) => return invalid_argument(COMMAND, message),
    };
    let expected = match args.from.as_deref().map(str::parse::<ApprovalStatus>).transpose() {
        Ok(expected) => expected,
        Err(error) => return invalid_argument(COMMAND, error.to_string()),
    };
    let document_id = DocumentId(args.id.trim().to_string());
    if document_id.is_blank() {
        return invalid_argument(COMMAND, "a document id is required");
    }

    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let client = match ApiClient::from_config(&config.api) {
        Ok(client) => client,
        Err(error) => return CommandResult::client_failure(COMMAND, &error),
    };
    let service = TransitionService::new(client);

    let report = runtime.block_on(async {
        let current = service.resolve_current(&resource, &document_id, expected).await?;
        let driver = WorkflowDriver::from_config(service, &config.workflow);
        Ok::<_, ClientError>(driver.drive(&resource, &document_id, current, &actor).await)
    });

    match report {
        Ok(report) => match &report.failure {
            None => {
                let message = format!(
                    "{} {} driven from {} to {} in {} step(s)",
                    resource.kind,
                    document_id,
                    report.start,
                    report.final_status,
                    report.steps.len()
                );
                CommandResult::success_with(COMMAND, message, &report)
            }
            Some(error) => CommandResult::failure(
                COMMAND,
                error.error_class(),
                format!(
                    "stopped at {} after {} step(s): {}",
                    report.final_status,
                    report.steps.len(),
                    error.dialog_message()
                ),
                if error.is_local() { 2 } else { 4 },
            ),
        },
        Err(error) => CommandResult::client_failure(COMMAND, &error),
    }
}
