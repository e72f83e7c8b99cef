use std::sync::Arc;

use http::StatusCode;
use routekit::{Context, HttpError, Router};

use crate::context::CallContext;
use crate::error::UserError;
use crate::models::{CreateUser, UpdateUser};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Register the user endpoints under `prefix` (e.g. `/api/v1/users`):
///
/// - `POST   {prefix}`      create → 201
/// - `GET    {prefix}`      list → 200
/// - `GET    {prefix}/:id`  fetch → 200
/// - `PUT    {prefix}/:id`  patch → 200
/// - `DELETE {prefix}/:id`  remove → 204
pub fn register<R: UserRepository + 'static>(
    router: &mut Router,
    prefix: &str,
    service: Arc<UserService<R>>,
) {
    let mut api = router.group(prefix);

    let svc = service.clone();
    api.post("", move |ctx: Context| {
        let svc = svc.clone();
        async move { create_user(ctx, svc).await }
    });

    let svc = service.clone();
    api.get("", move |ctx: Context| {
        let svc = svc.clone();
        async move { list_users(ctx, svc).await }
    });

    let svc = service.clone();
    api.get("/:id", move |ctx: Context| {
        let svc = svc.clone();
        async move { get_user(ctx, svc).await }
    });

    let svc = service.clone();
    api.put("/:id", move |ctx: Context| {
        let svc = svc.clone();
        async move { update_user(ctx, svc).await }
    });

    let svc = service;
    api.delete("/:id", move |ctx: Context| {
        let svc = svc.clone();
        async move { delete_user(ctx, svc).await }
    });
}

async fn create_user<R: UserRepository>(
    ctx: Context,
    service: Arc<UserService<R>>,
) -> Result<(), HttpError> {
    let input: CreateUser = ctx.bind()?;
    let call = call_context(&ctx);

    let user = service
        .create_user(&call, input)
        .await
        .map_err(into_http_error)?;
    ctx.json(StatusCode::CREATED, &user)
}

async fn list_users<R: UserRepository>(
    ctx: Context,
    service: Arc<UserService<R>>,
) -> Result<(), HttpError> {
    let call = call_context(&ctx);

    let users = service.list_users(&call).await.map_err(into_http_error)?;
    ctx.json(StatusCode::OK, &users)
}

async fn get_user<R: UserRepository>(
    ctx: Context,
    service: Arc<UserService<R>>,
) -> Result<(), HttpError> {
    let id = path_id(&ctx)?;
    let call = call_context(&ctx);

    let user = service
        .get_user(&call, &id)
        .await
        .map_err(into_http_error)?;
    ctx.json(StatusCode::OK, &user)
}

async fn update_user<R: UserRepository>(
    ctx: Context,
    service: Arc<UserService<R>>,
) -> Result<(), HttpError> {
    let id = path_id(&ctx)?;
    let patch: UpdateUser = ctx.bind()?;
    let call = call_context(&ctx);

    let user = service
        .update_user(&call, &id, patch)
        .await
        .map_err(into_http_error)?;
    ctx.json(StatusCode::OK, &user)
}

async fn delete_user<R: UserRepository>(
    ctx: Context,
    service: Arc<UserService<R>>,
) -> Result<(), HttpError> {
    let id = path_id(&ctx)?;
    let call = call_context(&ctx);

    service
        .delete_user(&call, &id)
        .await
        .map_err(into_http_error)?;
    ctx.no_content(StatusCode::NO_CONTENT)
}

fn path_id(ctx: &Context) -> Result<String, HttpError> {
    ctx.param("id")
        .map(str::to_string)
        .ok_or_else(|| HttpError::new(StatusCode::BAD_REQUEST, "missing id parameter"))
}

fn call_context(ctx: &Context) -> CallContext {
    CallContext::new().with_deadline_opt(ctx.deadline())
}

/// Map domain error kinds to transport statuses: validation kinds → 400,
/// not-found → 404, conflicts → 409, everything else an opaque 500.
fn into_http_error(err: UserError) -> HttpError {
    match err {
        UserError::EmptyName
        | UserError::InvalidName
        | UserError::EmptyEmail
        | UserError::InvalidEmail
        | UserError::InvalidPhone
        | UserError::NoUpdateData => HttpError::new(StatusCode::BAD_REQUEST, err.to_string()),
        UserError::NotFound => HttpError::new(StatusCode::NOT_FOUND, err.to_string()),
        UserError::AlreadyExists => HttpError::new(StatusCode::CONFLICT, err.to_string()),
        UserError::Cancelled | UserError::DeadlineExceeded | UserError::Internal(_) => {
            HttpError::internal(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (UserError::EmptyName, StatusCode::BAD_REQUEST),
            (UserError::InvalidName, StatusCode::BAD_REQUEST),
            (UserError::EmptyEmail, StatusCode::BAD_REQUEST),
            (UserError::InvalidEmail, StatusCode::BAD_REQUEST),
            (UserError::InvalidPhone, StatusCode::BAD_REQUEST),
            (UserError::NoUpdateData, StatusCode::BAD_REQUEST),
            (UserError::NotFound, StatusCode::NOT_FOUND),
            (UserError::AlreadyExists, StatusCode::CONFLICT),
            (UserError::Cancelled, StatusCode::INTERNAL_SERVER_ERROR),
            (UserError::DeadlineExceeded, StatusCode::INTERNAL_SERVER_ERROR),
            (
                UserError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(into_http_error(err).status, status);
        }
    }

    #[test]
    fn test_internal_errors_do_not_leak_detail() {
        let http = into_http_error(UserError::Internal("lock poisoned".to_string()));
        assert_eq!(http.message, "Internal Server Error");
        assert!(http.internal.unwrap().contains("lock poisoned"));
    }
}
