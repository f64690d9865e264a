//! Task tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::mcp::Args;
use crate::mcp::envelope;
use crate::mcp::resources::{ReadOutcome, ResourceHandler, TaskResource};

use super::{FieldSpec, InputSchema, ToolError, ToolHandler, string_arg};

const TASK_STATUSES: &[&str] = &["todo", "in_progress", "review", "done", "blocked"];
const LIST_STATUSES: &[&str] = &["todo", "in_progress", "review", "done", "blocked", "all"];
const PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

static LIST_TASKS_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::optional(
            "status",
            "string",
            "Status filter. Defaults to 'in_progress'; pass 'all' to list every status.",
        )
        .with_enum(LIST_STATUSES)
        .with_default("in_progress"),
        FieldSpec::optional(
            "project_id",
            "string",
            "Project to list tasks from. Defaults to the configured project.",
        ),
        FieldSpec::optional("assignee_id", "string", "Filter by assignee."),
        FieldSpec::optional("phase_id", "string", "Filter by project phase."),
        FieldSpec::optional("limit", "number", "Maximum number of tasks to return."),
    ],
};

static GET_TASK_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::required("task_id", "string", "Task ID")],
};

static CREATE_TASK_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::required("title", "string", "Task title (what needs to be done)"),
        FieldSpec::optional("description", "string", "Longer task description."),
        FieldSpec::optional("status", "string", "Initial status. Defaults to 'todo'.")
            .with_enum(TASK_STATUSES)
            .with_default("todo"),
        FieldSpec::optional("priority", "string", "Priority. Defaults to 'medium'.")
            .with_enum(PRIORITIES)
            .with_default("medium"),
        FieldSpec::optional(
            "project_id",
            "string",
            "Project to create the task in. Defaults to the configured project.",
        ),
        FieldSpec::optional("phase_id", "string", "Phase to attach the task to."),
        FieldSpec::optional("parent_task_id", "string", "Parent task for subtasks."),
        FieldSpec::optional("assignee_id", "string", "Assignee."),
    ],
};

static UPDATE_TASK_SCHEMA: InputSchema = InputSchema {
    fields: &[
        FieldSpec::required("task_id", "string", "Task ID to update"),
        FieldSpec::optional("title", "string", "New title."),
        FieldSpec::optional("description", "string", "New description."),
        FieldSpec::optional("status", "string", "New status.").with_enum(TASK_STATUSES),
        FieldSpec::optional("priority", "string", "New priority.").with_enum(PRIORITIES),
        FieldSpec::optional("assignee_id", "string", "New assignee."),
        FieldSpec::optional("phase_id", "string", "New phase."),
        FieldSpec::optional("due_date", "string", "New due date (ISO 8601)."),
    ],
};

static DELETE_TASK_SCHEMA: InputSchema = InputSchema {
    fields: &[FieldSpec::required("task_id", "string", "Task ID to delete")],
};

pub fn task_tools(resource: Arc<TaskResource>) -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(ListTasks {
            resource: Arc::clone(&resource),
        }),
        Arc::new(GetTask {
            resource: Arc::clone(&resource),
        }),
        Arc::new(CreateTask {
            resource: Arc::clone(&resource),
        }),
        Arc::new(UpdateTask {
            resource: Arc::clone(&resource),
        }),
        Arc::new(DeleteTask { resource }),
    ]
}

struct ListTasks {
    resource: Arc<TaskResource>,
}

#[async_trait]
impl ToolHandler for ListTasks {
    fn name(&self) -> &'static str {
        "list_tasks"
    }

    fn description(&self) -> &'static str {
        "List tasks in a project. Defaults to in_progress tasks in the configured project; pass status 'all' to see everything."
    }

    fn schema(&self) -> &'static InputSchema {
        &LIST_TASKS_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let status_applied = TaskResource::applied_status(&args);
        let project_applied = self.resource.applied_project(&args);

        let tasks = self.resource.list(&args).await;
        let count = tasks.len();

        Ok(json!({
            "success": true,
            "tasks": tasks,
            "count": count,
            "filter_applied": {
                "status": status_applied,
                "project_id": project_applied,
            },
            "message": format!("Found {count} tasks (status: {status_applied})"),
        }))
    }
}

struct GetTask {
    resource: Arc<TaskResource>,
}

#[async_trait]
impl ToolHandler for GetTask {
    fn name(&self) -> &'static str {
        "get_task"
    }

    fn description(&self) -> &'static str {
        "Get a single task by ID, including its current status and assignment."
    }

    fn schema(&self) -> &'static InputSchema {
        &GET_TASK_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let task_id = string_arg(&args, "task_id");

        match self.resource.read(&task_id, None).await {
            ReadOutcome::Entity(task) => Ok(json!({
                "success": true,
                "task": task,
                "message": format!("Retrieved task {task_id}"),
            })),
            _ => Ok(envelope::failure(format!("Task {task_id} not found"))),
        }
    }
}

struct CreateTask {
    resource: Arc<TaskResource>,
}

#[async_trait]
impl ToolHandler for CreateTask {
    fn name(&self) -> &'static str {
        "create_task"
    }

    fn description(&self) -> &'static str {
        "Create a task. Status defaults to 'todo' and priority to 'medium'; the configured project is used unless project_id is given."
    }

    fn schema(&self) -> &'static InputSchema {
        &CREATE_TASK_SCHEMA
    }

    async fn call(&self, mut args: Args) -> Result<Value, ToolError> {
        let title = string_arg(&args, "title");

        args.entry("status").or_insert(json!("todo"));
        args.entry("priority").or_insert(json!("medium"));

        let task = self.resource.create(args).await?;

        Ok(json!({
            "success": true,
            "task": task,
            "message": format!("Task created: {title}"),
        }))
    }
}

struct UpdateTask {
    resource: Arc<TaskResource>,
}

#[async_trait]
impl ToolHandler for UpdateTask {
    fn name(&self) -> &'static str {
        "update_task"
    }

    fn description(&self) -> &'static str {
        "Update task fields. Only title, description, status, priority, assignee_id, phase_id and due_date are forwarded."
    }

    fn schema(&self) -> &'static InputSchema {
        &UPDATE_TASK_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let task_id = string_arg(&args, "task_id");

        match self.resource.update(&task_id, args).await? {
            Some(task) => Ok(json!({
                "success": true,
                "task": task,
                "message": format!("Task {task_id} updated"),
            })),
            None => Ok(envelope::failure(format!(
                "Task {task_id} not found or could not be updated"
            ))),
        }
    }
}

struct DeleteTask {
    resource: Arc<TaskResource>,
}

#[async_trait]
impl ToolHandler for DeleteTask {
    fn name(&self) -> &'static str {
        "delete_task"
    }

    fn description(&self) -> &'static str {
        "Delete a task permanently."
    }

    fn schema(&self) -> &'static InputSchema {
        &DELETE_TASK_SCHEMA
    }

    async fn call(&self, args: Args) -> Result<Value, ToolError> {
        let task_id = string_arg(&args, "task_id");

        self.resource.delete(&task_id).await?;

        Ok(json!({
            "success": true,
            "message": format!("Task {task_id} deleted"),
        }))
    }
}
