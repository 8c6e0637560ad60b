//! Text and JSON renderings of the bus state.

use crate::announcement::domain::AnnouncementRecord;
use crate::freshness::TrackedService;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Text returned by the history render when nothing has been announced.
pub const EMPTY_HISTORY_SENTINEL: &str = "No services have announced themselves yet.";

const HISTORY_TEMPLATE: &str = "\
=== Services Available ===
{% for record in records %}

{{ record.service }} announces:
I can:
{% for capability in record.capabilities %}
  - {{ capability }}
{% else %}
  (none)
{% endfor %}
Examples:
{% for example in record.examples %}
  - {{ example }}
{% else %}
  (none)
{% endfor %}
{% endfor %}";

const DIRECTORY_TEMPLATE: &str = "\
Services ({{ services | length }}):
{% for service in services %}
  {{ service.name }}: {{ service.capabilities[:2] | join(\", \") }}
{% endfor %}";

/// Output format for [`AnnouncementBus::render_directory`](super::AnnouncementBus::render_directory).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryFormat {
    /// One line per service with its first two capabilities.
    #[default]
    Text,
    /// Pretty-printed JSON array of tracked services.
    Json,
}

impl fmt::Display for DirectoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

fn environment() -> Environment<'static> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    environment
}

/// Renders the full announcement history as prose, oldest first.
pub(crate) fn render_history(records: &[AnnouncementRecord]) -> Result<String, minijinja::Error> {
    if records.is_empty() {
        return Ok(EMPTY_HISTORY_SENTINEL.to_owned());
    }

    let rows: Vec<Value> = records
        .iter()
        .map(|record| {
            let announcement = record.announcement();
            json!({
                "service": announcement.service_name().as_str(),
                "capabilities": announcement.capabilities(),
                "examples": announcement.examples(),
            })
        })
        .collect();
    environment().render_str(HISTORY_TEMPLATE, json!({ "records": rows }))
}

/// Renders tracked services in the requested format.
pub(crate) fn render_directory(
    services: &[TrackedService],
    format: DirectoryFormat,
) -> Result<String, String> {
    let entries: Vec<Value> = services.iter().map(directory_entry).collect();
    match format {
        DirectoryFormat::Text => environment()
            .render_str(DIRECTORY_TEMPLATE, json!({ "services": entries }))
            .map_err(|err| err.to_string()),
        DirectoryFormat::Json => {
            serde_json::to_string_pretty(&entries).map_err(|err| err.to_string())
        }
    }
}

fn directory_entry(tracked: &TrackedService) -> Value {
    json!({
        "name": tracked.service_name().as_str(),
        "capabilities": tracked.capabilities(),
        "examples": tracked.examples(),
        "first_seen": tracked.first_seen().to_rfc3339(),
        "last_seen": tracked.last_seen().to_rfc3339(),
    })
}
