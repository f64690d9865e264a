//! Document tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::Args;
use crate::mcp::envelope;
use crate::mcp::resources::{DocumentResource, ReadOutcome, ResourceHandler};

use super::{FieldSpec, InputSchema, ToolError, ToolHandler, string_arg};

const DOC_TYPES: &[&str] = &["note", "spec", "design", "meeting", "other"];

static LIST_DOCUMENTS_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::optional(
            "project_id",
            "string",
            "Project to list documents from. Defaults to the configured project.",
        ),
        FieldSpec::optional("doc_type", "string", "Filter by document type.").with_enum(DOC_TYPES),
        FieldSpec::optional("search", "string", "Full-text search query."),
    ],
};

static GET_DOCUMENT_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::required("document_id", "string", "Document ID")],
};

static CREATE_DOCUMENT_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::required("title", "string", "Document title"),
        FieldSpec::required("content", "string", "Document body (markdown)"),
        FieldSpec::optional("doc_type", "string", "Document type. Defaults to 'note'.")
            .with_enum(DOC_TYPES)
            .with_default("note"),
        FieldSpec::optional(
            "project_id",
            "string",
            "Project to file the document under. Defaults to the configured project.",
        ),
    ],
};

static UPDATE_DOCUMENT_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::required("document_id", "string", "Document ID to update"),
        FieldSpec::optional("title", "string", "New title."),
        FieldSpec::optional("content", "string", "New body."),
        FieldSpec::optional("doc_type", "string", "New type.").with_enum(DOC_TYPES),
    ],
};

pub fn document_tools(resource: Arc<DocumentResource>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ListDocuments {
            resource: Arc::clone(&resource),
        }),
        Arc::new(GetDocument {
            resource: Arc::clone(&resource),
        }),
        Arc::new(CreateDocument {
            resource: Arc::clone(&resource),
        }),
        Arc::new(UpdateDocument { resource }),
    ]
}

struct ListDocuments {
    resource: Arc<DocumentResource>,
}

#[async_trait]
impl ToolHandler for ListDocuments {
    fn name(&self) -> &'static str {
        "list_documents"
    }

    fn description(&self) -> &'static str {
        "List documents in a project. Defaults to the configured project."
    }

    fn schema(&self) -> &'static InputSchema {
        &LIST_DOCUMENTS_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let documents = self.resource.list(&args).await;
        let count = documents.len();

        Ok(json!({
            "success": true,
            "documents": documents,
            "count": count,
            "message": format!("Found {count} documents"),
        }))
    }
}

struct GetDocument {
    resource: Arc<DocumentResource>,
}

#[async_trait]
impl ToolHandler for GetDocument {
    fn name(&self) -> &'static str {
        "get_document"
    }

    fn description(&self) -> &'static str {
        "Get a document by ID, including its full content."
    }

    fn schema(&self) -> &'static InputSchema {
        &GET_DOCUMENT_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let document_id = string_arg(&args, "document_id");

        match self.resource.read(&document_id, None).await {
            ReadOutcome::Entity(document) => Ok(json!({
                "success": true,
                "document": document,
                "message": format!("Retrieved document {document_id}"),
            })),
            _ => Ok(envelope::failure(format!(
                "Document {document_id} not found"
            ))),
        }
    }
}

struct CreateDocument {
    resource: Arc<DocumentResource>,
}

#[async_trait]
impl ToolHandler for CreateDocument {
    fn name(&self) -> &'static str {
        "create_document"
    }

    fn description(&self) -> &'static str {
        "Create a document. Type defaults to 'note'; the configured project is used unless project_id is given."
    }

    fn schema(&self) -> &'static InputSchema {
        &CREATE_DOCUMENT_SCHEMA
    }

    async fn call(&self, mut args: Args) -> Result<Value, ToolError> {
        let title = string_arg(&args, "title");

        args.entry("doc_type").or_insert(json!("note"));

        let document = self.resource.create(args).await?;

        Ok(json!({
            "success": true,
            "document": document,
            "message": format!("Document created: {title}"),
        }))
    }
}

struct UpdateDocument {
    resource: Arc<DocumentResource>,
}

#[async_trait]
impl ToolHandler for UpdateDocument {
    fn name(&self) -> &'static str {
        "update_document"
    }

    fn description(&self) -> &'static str {
        "Update a document. Only title, content, doc_type and tags are forwarded."
    }

    fn schema(&self) -> &'static InputSchema {
        &UPDATE_DOCUMENT_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let document_id = string_arg(&args, "document_id");

        match self.resource.update(&document_id, args).await? {
            Some(document) => Ok(json!({
                "success": true,
                "document": document,
                "message": format!("Document {document_id} updated"),
            })),
            None => Ok(envelope::failure(format!(
                "Document {document_id} not found or could not be updated"
            ))),
        }
    }
}
