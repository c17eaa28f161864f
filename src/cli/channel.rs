use std::path::{Path, PathBuf};

use crate::{
    cli::{Console, ListOptions, validate_config},
    config::{self, Config, Credential},
    line::OAuthApi,
    management::TokenStore,
    prompt::Prompter,
    render::Format,
    types::Row,
    utils,
};

pub const TOKEN_USAGE: &str = "\
Issue/Revoke/Verify channel access token

  After channel ID and secret are configured, issue a channel access token and save it.

    linecli line token --issue

  To revoke the saved access token, run with --revoke option.

    linecli line token --revoke

  To verify the saved access token, run with --verify option.

    linecli line token --verify";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    Issue,
    Revoke,
    Verify,
}

/// Asks for the channel ID and secret and writes them to the credentials file.
pub async fn init(env_path: &Path, console: &mut Console<'_>) -> bool {
    if env_path.is_file() {
        let question = format!(
            "Credentials already exist at {}. Overwrite?",
            env_path.display()
        );
        if console.prompter.confirm(&question) != Some(true) {
            return console.cancelled();
        }
    }

    let Some(channel_id) = console
        .prompter
        .text("Channel ID", &utils::validate_required)
    else {
        return console.cancelled();
    };
    let Some(channel_secret) = console
        .prompter
        .text("Channel secret", &utils::validate_required)
    else {
        return console.cancelled();
    };

    match config::save_credentials(env_path, &channel_id, &channel_secret).await {
        Ok(()) => {
            console.renderer.success(&format!(
                "Channel credentials saved to {}",
                env_path.display()
            ));
            true
        }
        Err(e) => {
            console
                .renderer
                .error(&format!("Cannot write {}: {}", env_path.display(), e));
            false
        }
    }
}

/// Issues, revokes or verifies the channel access token.
///
/// Without an action the usage is printed and `false` returned.
pub async fn token(
    action: Option<TokenAction>,
    options: ListOptions,
    config: &Config,
    api: &dyn OAuthApi,
    token_path: PathBuf,
    console: &mut Console<'_>,
) -> bool {
    let Some(action) = action else {
        console.renderer.text(TOKEN_USAGE);
        return false;
    };

    match action {
        TokenAction::Issue => issue(options, config, api, token_path, console).await,
        TokenAction::Revoke => revoke(config, api, token_path, console).await,
        TokenAction::Verify => verify(options, config, api, console).await,
    }
}

async fn issue(
    options: ListOptions,
    config: &Config,
    api: &dyn OAuthApi,
    token_path: PathBuf,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(
        config,
        &[Credential::ChannelId, Credential::ChannelSecret],
        console.renderer,
    ) {
        return false;
    }

    let response = match api
        .issue_token(config.channel_id(), config.channel_secret())
        .await
    {
        Ok(response) => response,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return false;
        }
    };

    if options.format == Format::Json {
        console.renderer.json(&response.raw);
    }

    let store = TokenStore::from_response(response.data, token_path);
    let token = store.current_token();
    if options.format == Format::Table {
        let expires_at = store
            .expires_at()
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        console.renderer.table(&[Row::new()
            .cell("Access Token", &token.access_token)
            .cell("Token Type", &token.token_type)
            .cell("Expires In", utils::format_duration(token.expires_in))
            .cell("Expires At", utils::cell(expires_at))]);
    }

    if let Err(e) = store.persist().await {
        console
            .renderer
            .error(&format!("Cannot save access token: {}", e));
        return false;
    }

    console.renderer.success(&format!(
        "Access token saved to {}",
        store.path().display()
    ));
    true
}

async fn revoke(
    config: &Config,
    api: &dyn OAuthApi,
    token_path: PathBuf,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, &[Credential::AccessToken], console.renderer) {
        return false;
    }

    if !confirm_revoke(console.prompter) {
        return console.cancelled();
    }

    if let Err(e) = api.revoke_token(config.access_token()).await {
        console.renderer.error(&e.to_string());
        return false;
    }

    // only drop the cache when it holds the token that was just revoked
    if let Ok(store) = TokenStore::load_from(token_path).await
        && store.current_token().access_token == config.access_token()
        && let Err(e) = store.remove().await
    {
        console
            .renderer
            .warning(&format!("Cannot remove cached access token: {}", e));
    }

    console.renderer.success("Access token revoked");
    true
}

fn confirm_revoke(prompter: &mut dyn Prompter) -> bool {
    prompter.confirm("Revoke the channel access token?") == Some(true)
}

async fn verify(
    options: ListOptions,
    config: &Config,
    api: &dyn OAuthApi,
    console: &mut Console<'_>,
) -> bool {
    if !validate_config(config, &[Credential::AccessToken], console.renderer) {
        return false;
    }

    let response = match api.verify_token(config.access_token()).await {
        Ok(response) => response,
        Err(e) => {
            console.renderer.error(&e.to_string());
            return false;
        }
    };

    match options.format {
        Format::Json => console.renderer.json(&response.raw),
        Format::Table => {
            let verified = &response.data;
            console.renderer.table(&[Row::new()
                .cell("Client ID", &verified.client_id)
                .cell("Scope", utils::cell(verified.scope.as_deref()))
                .cell("Expires In", utils::format_duration(verified.expires_in))]);
        }
    }
    true
}
