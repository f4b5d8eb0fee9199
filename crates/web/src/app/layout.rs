//! Page chrome shared by every page.

use axum::response::Html;
use html_escape::encode_text;

use super::state::SessionView;

pub const APP_TITLE: &str = "Project Management Front End";

/// Wrap `body` (already-escaped HTML) in the navigation bar, header and,
/// for signed-in sessions, the footer.
pub fn render_page(title: &str, session: &SessionView, body: &str) -> Html<String> {
    let footer = if session.is_authenticated() {
        "<footer><p>This is the footer</p></footer>"
    } else {
        ""
    };

    Html(format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} | {APP_TITLE}</title></head>\n\
         <body>\n\
         {nav}\n\
         <h5 class=\"app-title\">{APP_TITLE}</h5>\n\
         <main>\n{body}\n</main>\n\
         {footer}\n\
         </body>\n\
         </html>\n",
        title = encode_text(title),
        nav = navigation_bar(session),
    ))
}

fn navigation_bar(session: &SessionView) -> String {
    let account = match session.display_name() {
        Some(name) => format!(
            "<span class=\"account\">Signed in as {}</span>",
            encode_text(name)
        ),
        None => "<span class=\"account\">Sign in</span>".to_string(),
    };

    format!(
        "<nav>\
         <a class=\"brand\" href=\"/\">Project Management</a> \
         <a href=\"/\">Home</a> \
         <a href=\"/todolist\">Todo list</a> \
         {account}\
         </nav>"
    )
}
