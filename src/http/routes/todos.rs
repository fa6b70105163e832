use std::sync::Arc;

use axum::extract::{rejection::RawFormRejection, RawForm, State};
use axum::response::{Html, IntoResponse, Response};
use axum::{routing::get, Router};
use chrono::FixedOffset;
use http::{header::LOCATION, StatusCode};

use crate::application::todo_service::TodoService;
use crate::http::form::{TodoCommand, TodoForm};
use crate::http::types::{Operation, UserError};
use crate::http::view::{PageData, View};

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
    pub view: Arc<View>,
    pub deadline_offset: FixedOffset,
}

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(list_todos::<S>).post(mutate_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Response {
    match state.service.list().await {
        Ok(todos) => render(&state.view, StatusCode::OK, PageData::list(todos)),
        Err(err) => {
            tracing::error!(error = %err, "cannot list todos");
            render(&state.view, StatusCode::BAD_REQUEST, PageData::errors([UserError::CannotList]))
        }
    }
}

async fn mutate_todo<S: TodoService>(
    State(state): State<AppState<S>>,
    body: Result<RawForm, RawFormRejection>,
) -> Response {
    let decoded = match body {
        Ok(RawForm(bytes)) => TodoForm::from_urlencoded(&bytes).map_err(|err| err.to_string()),
        Err(rejection) => Err(rejection.body_text()),
    };
    let form = match decoded {
        Ok(form) => form,
        Err(message) => {
            tracing::warn!(error = %message, "unreadable form");
            return render(&state.view, StatusCode::BAD_REQUEST, PageData::errors([message]));
        }
    };
    let command = match form.bind(state.deadline_offset) {
        Ok(command) => command,
        Err(errors) => {
            tracing::warn!(?errors, "form binding failed");
            return render(&state.view, StatusCode::BAD_REQUEST, PageData::errors(errors));
        }
    };
    match apply(&state.service, command).await {
        Ok(()) => (StatusCode::FOUND, [(LOCATION, "/")]).into_response(),
        Err(err) => render(&state.view, StatusCode::BAD_REQUEST, PageData::errors([err])),
    }
}

async fn apply<S: TodoService>(service: &S, command: TodoCommand) -> Result<(), UserError> {
    let (op, result) = match command {
        TodoCommand::Create { content, until } => (Operation::Create, service.create(content, until).await.map(drop)),
        TodoCommand::SetDone { id, done } => (Operation::Update, service.set_done(id, done).await.map(drop)),
        TodoCommand::Delete { id } => (Operation::Delete, service.delete(id).await),
        TodoCommand::Noop => {
            tracing::debug!("form carried no action");
            return Ok(());
        }
    };
    result.map_err(|err| {
        tracing::error!(error = %err, ?op, "todo mutation failed");
        UserError::from_todo_error(op, &err)
    })
}

fn render(view: &View, status: StatusCode, data: PageData) -> Response {
    match view.render_index(&data) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            tracing::error!(error = ?err, "cannot render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "cannot render page").into_response()
        }
    }
}
