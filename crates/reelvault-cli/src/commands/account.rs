use super::context::AppContext;
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;

fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .interact_text()?;
    Ok(value)
}

pub async fn run_login(email: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    let email = match email {
        Some(email) => email,
        None => prompt_text("Email")?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    let session = ctx
        .client
        .login(&email, &password)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Login failed: {}", e))?;

    let mut store = ctx.session_store()?;
    store.set_session(&session);
    store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save session file: {}", e))?;

    // Auth state just transitioned to authenticated: bring the local
    // snapshot in line with the account
    let coordinator = ctx.coordinator(output);
    if ctx.config.sync.pull_on_login {
        coordinator.attach_session(session.clone()).await;
    } else {
        coordinator.set_session(Some(session.clone()));
    }

    output.success(format!("Welcome back, {}!", session.user.name));
    output.info(format!("{} items in your list", coordinator.entries().len()));
    Ok(())
}

pub async fn run_register(email: Option<String>, name: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    let email = match email {
        Some(email) => email,
        None => prompt_text("Email")?,
    };
    let name = match name {
        Some(name) => name,
        None => prompt_text("Name")?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    let session = ctx
        .client
        .register(&email, &password, &name)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("Registration failed: {}", e))?;

    let mut store = ctx.session_store()?;
    store.set_session(&session);
    store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save session file: {}", e))?;

    let coordinator = ctx.coordinator(output);
    if ctx.config.sync.pull_on_login {
        coordinator.attach_session(session.clone()).await;
    } else {
        coordinator.set_session(Some(session.clone()));
    }

    output.success(format!("Welcome to Reelvault, {}!", session.user.name));
    Ok(())
}

pub async fn run_logout(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    let mut store = ctx.session_store()?;
    store
        .clear()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear session file: {}", e))?;

    // The original client discards the device-local list with the token
    let coordinator = ctx.coordinator(output);
    coordinator.sign_out();

    output.success("Logged out");
    Ok(())
}

pub async fn run_whoami(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    match ctx.restore_session().await? {
        Some(session) => {
            match output.format() {
                crate::output::OutputFormat::Human => {
                    output.info(format!("{} <{}>", session.user.name, session.user.email));
                }
                _ => {
                    output.json(&json!({
                        "id": session.user.id,
                        "email": session.user.email,
                        "name": session.user.name,
                        "avatar": session.user.avatar,
                    }));
                }
            }
            Ok(())
        }
        None => {
            output.warn("Not signed in");
            Ok(())
        }
    }
}
