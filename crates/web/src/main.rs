use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    taskdesk_observability::init();

    let config = taskdesk_web::WebConfig::from_env().context("invalid configuration")?;
    if config.dev_events {
        tracing::warn!("dev event endpoints enabled; do not expose this instance");
    }

    tracing::info!(
        authority_domain = %config.auth.policies.authority_domain,
        sign_up_sign_in = %config.auth.policies.sign_up_sign_in,
        edit_profile = %config.auth.policies.edit_profile,
        "identity policies configured"
    );

    let app = taskdesk_web::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
