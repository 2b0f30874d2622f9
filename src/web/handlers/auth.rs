//! Registration, login, logout, and the gated example page

use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tracing::info;

use crate::app::App;
use crate::core::forms::{FormErrors, LoginForm, RegistrationForm};
use crate::error::AppError;
use crate::traits::{CategoryStore, PageStore, SessionStore, UserStore};
use crate::types::UserProfile;
use crate::web::session::{attach_cookie, open_session};

use super::{USER_KEY, base_context, logged_in_user};

pub async fn register_form<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let session = open_session(&app.session_store, &headers).await?;
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let mut context = base_context(&session.data);
    context.insert("form", &RegistrationForm::default());
    context.insert("errors", &FormErrors::default());
    context.insert("registered", &false);

    let body = app.state().render("register.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

/// Create the account and its profile in one submission. A taken username
/// comes back as a form error, not a failure page.
pub async fn register_submit<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let session = open_session(&app.session_store, &headers).await?;
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let mut errors = form.validate();
    let mut registered = false;
    if errors.is_empty() {
        let username = form.username.trim();
        let profile = UserProfile {
            username: username.to_string(),
            website: form.website_field(),
            picture: form.picture_field(),
        };

        match app
            .user_store
            .register(username, form.email.trim(), &form.password, profile)
            .await
        {
            Ok(user) => {
                info!(username = %user.username, "registration complete");
                registered = true;
            }
            Err(AppError::DuplicateUser { username }) => {
                errors.add("username", format!("Username '{username}' is already taken."));
            }
            Err(other) => return Err(other),
        }
    }

    let mut context = base_context(&session.data);
    context.insert("form", &form);
    context.insert("errors", &errors);
    context.insert("registered", &registered);

    let body = app.state().render("register.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

pub async fn login_form<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let session = open_session(&app.session_store, &headers).await?;
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let mut context = base_context(&session.data);
    context.insert("error", &Option::<String>::None);

    let body = app.state().render("login.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

/// Bind the username into the session on a credential match and bounce to
/// the landing page; anything else re-renders the form with one error line.
pub async fn login_submit<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let mut session = open_session(&app.session_store, &headers).await?;

    let error = if form.validate().is_empty() {
        match app
            .user_store
            .authenticate(form.username.trim(), &form.password)
            .await?
        {
            Some(user) => {
                session.data.set(USER_KEY, user.username.clone());
                app.session_store
                    .save(&session.id, session.data.clone())
                    .await?;
                info!(username = %user.username, "login");
                return Ok(attach_cookie(Redirect::to("/").into_response(), &session));
            }
            None => "Invalid login details supplied.",
        }
    } else {
        "Both a username and password are required."
    };

    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let mut context = base_context(&session.data);
    context.insert("error", &Some(error));

    let body = app.state().render("login.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

pub async fn logout<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let mut session = open_session(&app.session_store, &headers).await?;
    if logged_in_user(&session.data).is_none() {
        return Ok(attach_cookie(Redirect::to("/login").into_response(), &session));
    }

    if let Some(username) = session.data.remove(USER_KEY) {
        info!(username, "logout");
    }
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    Ok(attach_cookie(Redirect::to("/").into_response(), &session))
}

pub async fn restricted<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let session = open_session(&app.session_store, &headers).await?;
    if logged_in_user(&session.data).is_none() {
        return Ok(attach_cookie(Redirect::to("/login").into_response(), &session));
    }
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let context = base_context(&session.data);
    let body = app.state().render("restricted.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}
