use axum::{
    Form,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;

use crate::app::errors::{core_error_to_page, page_error};
use crate::app::layout::render_page;
use crate::app::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub description: String,
}

pub async fn list(Extension(state): Extension<AppState>) -> Response {
    let session = state.session();
    let Some(account) = &session.account else {
        let body = "<p class=\"prompt\">Please sign in to see your todo list.</p>";
        return render_page("Todo list", &session, body).into_response();
    };

    let items = state.todos.list(account.object_id());
    let mut body = String::from("<ul class=\"todos\">");
    for item in &items {
        body.push_str(&format!(
            "<li id=\"{}\">{}</li>",
            encode_double_quoted_attribute(&item.id.to_string()),
            encode_text(&item.description)
        ));
    }
    body.push_str("</ul>");
    if items.is_empty() {
        body.push_str("<p class=\"empty\">Nothing to do yet.</p>");
    }
    body.push_str(
        "<form method=\"post\" action=\"/todolist\">\
         <input name=\"description\" placeholder=\"Enter a task\" required>\
         <button type=\"submit\">Add</button>\
         </form>",
    );

    render_page("Todo list", &session, &body).into_response()
}

pub async fn create(Extension(state): Extension<AppState>, Form(form): Form<NewTodo>) -> Response {
    let session = state.session();
    let Some(account) = &session.account else {
        return page_error(StatusCode::UNAUTHORIZED, &session, "sign in to add tasks");
    };

    match state.todos.add(account.object_id(), &form.description) {
        Ok(item) => {
            tracing::info!(todo_id = %item.id, owner = %item.owner, "todo item added");
            Redirect::to("/todolist").into_response()
        }
        Err(e) => core_error_to_page(e, &session),
    }
}
