use axum::{extract::Extension, response::Html};
use html_escape::encode_text;
use serde_json::Value;

use taskdesk_auth::IdTokenClaims;

use crate::app::layout::render_page;
use crate::app::state::AppState;

pub async fn home(Extension(state): Extension<AppState>) -> Html<String> {
    let session = state.session();
    let status = state.reconciler.status();

    let mut body = String::new();
    if let Some(status) = status {
        body.push_str(&format!("<p class=\"status\">{}</p>\n", encode_text(&status)));
    }

    match &session.account {
        Some(account) => body.push_str(&claims_table(&account.id_token_claims)),
        None => body.push_str(
            "<p class=\"prompt\">Please sign in to see your profile information.</p>",
        ),
    }

    render_page("Home", &session, &body)
}

fn claims_table(claims: &IdTokenClaims) -> String {
    let mut rows = vec![
        ("sub".to_string(), claims.sub.to_string()),
        ("oid".to_string(), claims.oid.to_string()),
    ];
    if let Some(tfp) = &claims.tfp {
        rows.push(("tfp".to_string(), tfp.clone()));
    }
    if let Some(acr) = &claims.acr {
        rows.push(("acr".to_string(), acr.clone()));
    }
    rows.extend(claims.extra.iter().map(|(name, value)| {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        (name.clone(), rendered)
    }));

    let body: String = rows
        .iter()
        .map(|(name, value)| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                encode_text(name),
                encode_text(value)
            )
        })
        .collect();

    format!(
        "<table class=\"claims\"><thead><tr><th>Claim</th><th>Value</th></tr></thead>\
         <tbody>{body}</tbody></table>"
    )
}
