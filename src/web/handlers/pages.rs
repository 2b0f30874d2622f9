//! Browsing and contribution handlers
//!
//! The landing and about pages run the visit tracker before rendering;
//! the contribution forms are gated on a logged-in session.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Local;
use serde::Deserialize;

use crate::app::App;
use crate::core::forms::{CategoryForm, FormErrors, PageForm};
use crate::error::AppError;
use crate::traits::{CategoryStore, PageStore, SessionStore, UserStore};
use crate::types::Category;
use crate::web::session::{attach_cookie, open_session};

use super::{base_context, logged_in_user};

/// How many categories and pages the landing page surfaces.
const TOP_ENTRIES: usize = 5;

/// Landing page: most-liked categories, most-viewed pages, visit counter.
pub async fn index<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let categories = app.category_store.top_by_likes(TOP_ENTRIES).await?;
    let pages = app.page_store.top_by_views(TOP_ENTRIES).await?;

    let mut session = open_session(&app.session_store, &headers).await?;
    let visits = app
        .state()
        .tracker
        .record(&mut session.data, Local::now().naive_local())?;
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let mut context = base_context(&session.data);
    context.insert("boldmessage", "Crunchy, creamy, cookie, candy, cupcake!");
    context.insert("categories", &categories);
    context.insert("pages", &pages);
    context.insert("visits", &visits);

    let body = app.state().render("index.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

/// About page, sharing the landing page's visit counter.
pub async fn about<C, P, U, S>(
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
    let visits = app
        .state()
        .tracker
        .record(&mut session.data, Local::now().naive_local())?;
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let mut context = base_context(&session.data);
    context.insert("visits", &visits);

    let body = app.state().render("about.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

/// One category and its pages. Unknown slugs render the same template in
/// its "no such category" state rather than erroring.
pub async fn show_category<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    // every render of the category page counts as a view
    let category = app.category_store.record_view(&slug).await?;
    let pages = match &category {
        Some(found) => app.page_store.for_category(&found.slug).await?,
        None => Vec::new(),
    };

    let session = open_session(&app.session_store, &headers).await?;
    app.session_store
        .save(&session.id, session.data.clone())
        .await?;

    let mut context = base_context(&session.data);
    context.insert("category", &category);
    context.insert("pages", &pages);

    let body = app.state().render("category.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

pub async fn add_category_form<C, P, U, S>(
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

    let mut context = base_context(&session.data);
    context.insert("form", &CategoryForm::default());
    context.insert("errors", &FormErrors::default());

    let body = app.state().render("add_category.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

pub async fn add_category_submit<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    headers: HeaderMap,
    Form(form): Form<CategoryForm>,
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

    let mut errors = form.validate();
    if errors.is_empty() {
        match app.category_store.add(Category::new(form.name.trim())).await {
            Ok(_) => {
                return Ok(attach_cookie(Redirect::to("/").into_response(), &session));
            }
            Err(AppError::DuplicateCategory { name }) => {
                errors.add("name", format!("Category '{name}' already exists."));
            }
            Err(other) => return Err(other),
        }
    }

    let mut context = base_context(&session.data);
    context.insert("form", &form);
    context.insert("errors", &errors);

    let body = app.state().render("add_category.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

pub async fn add_page_form<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    Path(slug): Path<String>,
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

    // no adding pages to a category that does not exist
    let Some(category) = app.category_store.by_slug(&slug).await? else {
        return Ok(attach_cookie(Redirect::to("/").into_response(), &session));
    };

    let mut context = base_context(&session.data);
    context.insert("category", &category);
    context.insert("form", &PageForm::default());
    context.insert("errors", &FormErrors::default());

    let body = app.state().render("add_page.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

pub async fn add_page_submit<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(form): Form<PageForm>,
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

    let Some(category) = app.category_store.by_slug(&slug).await? else {
        return Ok(attach_cookie(Redirect::to("/").into_response(), &session));
    };

    let errors = form.validate();
    if errors.is_empty() {
        app.page_store
            .add(&category.slug, form.title.trim(), &form.normalized_url())
            .await?;
        let target = format!("/category/{}", category.slug);
        return Ok(attach_cookie(Redirect::to(&target).into_response(), &session));
    }

    let mut context = base_context(&session.data);
    context.insert("category", &category);
    context.insert("form", &form);
    context.insert("errors", &errors);

    let body = app.state().render("add_page.html", &context)?;
    Ok(attach_cookie(Html(body).into_response(), &session))
}

#[derive(Debug, Deserialize)]
pub struct GotoParams {
    pub page_id: Option<u64>,
}

/// Click-through redirect: count the visit, then send the browser to the
/// stored URL. Falls back to the landing page on a missing or unknown id.
pub async fn goto_page<C, P, U, S>(
    State(app): State<App<C, P, U, S>>,
    Query(params): Query<GotoParams>,
) -> Result<Response, AppError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let target = match params.page_id {
        Some(id) => app.page_store.record_click(id).await?,
        None => None,
    };

    Ok(match target {
        Some(url) => Redirect::to(&url).into_response(),
        None => Redirect::to("/").into_response(),
    })
}
