//! Document commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::{Table, Tabled};

use crate::backend::Backend;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::{apply_table_style, format_opt, truncate_with_ellipsis};

#[derive(Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Tabled)]
struct DocumentDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    doc_type: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Document> for DocumentDisplay {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.clone(),
            title: truncate_with_ellipsis(&document.title, 50),
            doc_type: format_opt(document.doc_type.as_deref()),
            updated: format_opt(document.updated_at.as_deref()),
        }
    }
}

pub async fn list(
    backend: &dyn Backend,
    default_project: &str,
    project_id: Option<&str>,
    format: &str,
) -> CliResult<String> {
    let query = vec![(
        "project_id".to_string(),
        project_id.unwrap_or(default_project).to_string(),
    )];

    let response = backend.get("/api/documents", &query).await?;
    let documents: Vec<Document> = serde_json::from_value(
        response.get("data").cloned().unwrap_or(Value::Array(vec![])),
    )?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&documents)?),
        "table" => {
            if documents.is_empty() {
                return Ok("No documents found".to_string());
            }
            let rows: Vec<DocumentDisplay> = documents.iter().map(DocumentDisplay::from).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
        other => Err(CliError::InvalidFormat {
            format: other.to_string(),
        }),
    }
}

pub async fn get(backend: &dyn Backend, id: &str) -> CliResult<String> {
    let document = backend.get(&format!("/api/documents/{id}"), &[]).await?;
    Ok(serde_json::to_string_pretty(&document)?)
}
