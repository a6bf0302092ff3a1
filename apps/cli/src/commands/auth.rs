//! `login`, `register`, `logout`, `whoami`.

use portos_client::ClientError;
use portos_core::{Credentials, Registration};

use crate::app::App;
use crate::error::CliResult;
use crate::{prompt, render};

pub async fn login(app: &App, username: String, password: Option<String>) -> CliResult<()> {
    let password = match password {
        Some(password) => password,
        None => prompt::ask("Password: ").await?,
    };

    let result = app.client.login(&Credentials { username, password }).await;
    app.out.emit(result, |user| println!("Logged in as {}", user.username))
}

pub async fn register(
    app: &App,
    username: String,
    email: String,
    password: Option<String>,
) -> CliResult<()> {
    let (password, confirm) = match password {
        Some(password) => (password.clone(), password),
        None => (
            prompt::ask("Password: ").await?,
            prompt::ask("Confirm password: ").await?,
        ),
    };

    let form = Registration {
        username,
        email,
        password,
    };
    let result = app.client.register(&form, &confirm).await;
    app.out.emit(result, |()| {
        println!("Account created. Log in with `portos login -u {}`.", form.username)
    })
}

pub async fn logout(app: &App) -> CliResult<()> {
    let result = app.client.logout().await;
    app.out.emit(result, |()| println!("Logged out"))
}

pub async fn whoami(app: &App) -> CliResult<()> {
    let result = app.client.whoami().await.ok_or(ClientError::Unauthorized);
    app.out.emit(result, render::session)
}
