use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::models::{AddEventForm, Credentials, CurrentUser};
use crate::services::{auth, events};
use crate::session::{removal_cookie, session_cookie};
use crate::state::AppState;
use crate::utils::error::{AppError, LOGIN_PATH};
use crate::utils::response::success;

mod pages;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "webbeep-server",
    };

    success(payload, "Health check successful").into_response()
}

pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = events::list_events(state.repo.as_ref()).await?;
    let message = format!("{} event(s)", events.len());
    Ok(success(events, message).into_response())
}

pub async fn register_form() -> Html<&'static str> {
    Html(pages::REGISTER_PAGE)
}

pub async fn register(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Redirect, AppError> {
    auth::register(state.repo.as_ref(), credentials, state.auth.bcrypt_cost).await?;
    Ok(Redirect::to(LOGIN_PATH))
}

pub async fn login_form() -> Html<&'static str> {
    Html(pages::LOGIN_PAGE)
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<(CookieJar, Redirect), AppError> {
    let session = auth::login(
        state.repo.as_ref(),
        &state.sessions,
        credentials,
        state.auth.bcrypt_cost,
    )
    .await?;
    let jar = jar.add(session_cookie(
        session.session_id,
        state.auth.secure_cookies,
    ));
    Ok((jar, Redirect::to("/")))
}

pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    auth::logout(&state.sessions, &user).await?;
    Ok((jar.remove(removal_cookie()), Redirect::to("/")))
}

pub async fn add_event_form(_user: CurrentUser) -> Html<&'static str> {
    Html(pages::ADD_EVENT_PAGE)
}

pub async fn add_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<AddEventForm>,
) -> Result<Redirect, AppError> {
    let event = form.into_new_event(user.user_id)?;
    events::add_event(state.repo.as_ref(), event).await?;
    Ok(Redirect::to("/"))
}
