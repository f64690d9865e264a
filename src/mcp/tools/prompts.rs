//! Prompt tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::Args;
use crate::mcp::envelope;
use crate::mcp::resources::{PromptResource, ReadOutcome, ResourceHandler};

use super::{FieldSpec, InputSchema, ToolError, ToolHandler, string_arg};

static LIST_PROMPTS_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::optional("category", "string", "Filter by prompt category."),
        FieldSpec::optional("search", "string", "Full-text search query."),
    ],
};

static GET_PROMPT_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::required("prompt_id", "string", "Prompt ID")],
};

static CREATE_PROMPT_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::required("title", "string", "Prompt title"),
        FieldSpec::required("content", "string", "Prompt template body"),
        FieldSpec::optional("category", "string", "Category for organization."),
    ],
};

pub fn prompt_tools(resource: Arc<PromptResource>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ListPrompts {
            resource: Arc::clone(&resource),
        }),
        Arc::new(GetPrompt {
            resource: Arc::clone(&resource),
        }),
        Arc::new(CreatePrompt { resource }),
    ]
}

struct ListPrompts {
    resource: Arc<PromptResource>,
}

#[async_trait]
impl ToolHandler for ListPrompts {
    fn name(&self) -> &'static str {
        "list_prompts"
    }

    fn description(&self) -> &'static str {
        "List reusable prompt templates."
    }

    fn schema(&self) -> &'static InputSchema {
        &LIST_PROMPTS_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let prompts = self.resource.list(&args).await;
        let count = prompts.len();

        Ok(json!({
            "success": true,
            "prompts": prompts,
            "count": count,
            "message": format!("Found {count} prompts"),
        }))
    }
}

struct GetPrompt {
    resource: Arc<PromptResource>,
}

#[async_trait]
impl ToolHandler for GetPrompt {
    fn name(&self) -> &'static str {
        "get_prompt"
    }

    fn description(&self) -> &'static str {
        "Get a prompt template by ID."
    }

    fn schema(&self) -> &'static InputSchema {
        &GET_PROMPT_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let prompt_id = string_arg(&args, "prompt_id");

        match self.resource.read(&prompt_id, None).await {
            ReadOutcome::Entity(prompt) => Ok(json!({
                "success": true,
                "prompt": prompt,
                "message": format!("Retrieved prompt {prompt_id}"),
            })),
            _ => Ok(envelope::failure(format!("Prompt {prompt_id} not found"))),
        }
    }
}

struct CreatePrompt {
    resource: Arc<PromptResource>,
}

#[async_trait]
impl ToolHandler for CreatePrompt {
    fn name(&self) -> &'static str {
        "create_prompt"
    }

    fn description(&self) -> &'static str {
        "Create a reusable prompt template."
    }

    fn schema(&self) -> &'static InputSchema {
        &CREATE_PROMPT_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let title = string_arg(&args, "title");

        let prompt = self.resource.create(args).await?;

        Ok(json!({
            "success": true,
            "prompt": prompt,
            "message": format!("Prompt created: {title}"),
        }))
    }
}
