//! Pull request description rendering.

use crate::task::domain::Task;
use minijinja::{Environment, context};
use thiserror::Error;

const PR_DESCRIPTION_TEMPLATE: &str = "\
## Description
{{ description or \"Add a description of the changes...\" }}

## JIRA Ticket
{% if ticket_id %}[{{ ticket_id }}]({{ ticket_link or \"#\" }}){% else %}Add JIRA ticket reference...{% endif %}

## Testing Plan
{{ testing_plan or \"Explain how these changes were tested...\" }}

## Checklist
{% for item in checklist %}- [{% if item.checked %}x{% else %} {% endif %}] {{ item.text }}
{% endfor %}";

/// Failure while rendering a pull request description.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render pull request description: {reason}")]
pub struct PrDescriptionError {
    /// Renderer message.
    pub reason: String,
}

/// Renders the markdown body of a pull request for `task`.
///
/// Empty metadata fields are replaced by placeholders; checked checklist
/// items render as `- [x]`.
///
/// # Errors
///
/// Returns [`PrDescriptionError`] when the template fails to render.
pub fn render_pr_description(task: &Task) -> Result<String, PrDescriptionError> {
    let metadata = task.pr_metadata();
    let field = |value: Option<&str>| value.unwrap_or_default().trim().to_owned();
    let checklist: Vec<_> = task
        .checklist()
        .iter()
        .map(|item| context! { text => item.text(), checked => item.checked() })
        .collect();

    let environment = Environment::new();
    environment
        .render_str(
            PR_DESCRIPTION_TEMPLATE,
            context! {
                description => field(metadata.map(|m| m.description())),
                ticket_id => field(metadata.map(|m| m.ticket_id())),
                ticket_link => field(metadata.map(|m| m.ticket_link())),
                testing_plan => field(metadata.map(|m| m.testing_plan())),
                checklist => checklist,
            },
        )
        .map_err(|error| PrDescriptionError {
            reason: error.to_string(),
        })
}
