use axum::{
    extract::State,
    http::{
        HeaderMap, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, SET_COOKIE},
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{
    accounts::processor_enums::AccountsProcessorOutput,
    action_router::{ActionKind, ActionRouterOutput, handle_action},
    api::{
        error::ApiError,
        extractors::ActionPayload,
        middleware::session::{clear_session_cookie, session_cookie, session_from_headers},
        response::ApiResponse,
    },
    expenses::{export::EXPORT_FILENAME, processor_enums::ExpensesProcessorOutput},
    utils::{app_config::AppConfig, error::ActionError},
};

/// GET|POST /api?action=<name> - the single action endpoint
///
/// Register, login and add take a JSON body; update and delete are sent
/// form-encoded by the browser client. Both are accepted everywhere.
/// `get` reads its `id` from the query string.
pub async fn dispatch_action(
    State(app_config): State<AppConfig>,
    headers: HeaderMap,
    ActionPayload { action, fields }: ActionPayload,
) -> Response {
    let kind = match action.as_deref().unwrap_or_default().parse::<ActionKind>() {
        Ok(kind) => kind,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let session = session_from_headers(&headers, &app_config.cookie.name);

    match handle_action(&app_config, kind, &fields, session).await {
        Ok(output) => render_output(&app_config, output).unwrap_or_else(IntoResponse::into_response),
        Err(ActionError::NotLoggedIn) if kind == ActionKind::Export => StatusCode::FORBIDDEN.into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

fn render_output(app_config: &AppConfig, output: ActionRouterOutput) -> Result<Response, ApiError> {
    let response = match output {
        ActionRouterOutput::Accounts(output) => match output {
            AccountsProcessorOutput::Register(signed_in) | AccountsProcessorOutput::Login(signed_in) => {
                let cookie = session_cookie(&app_config.cookie, &signed_in.session)?;
                ([(SET_COOKIE, cookie)], Json(ApiResponse::success(signed_in))).into_response()
            }
            AccountsProcessorOutput::Logout => {
                let cookie = clear_session_cookie(&app_config.cookie)?;
                ([(SET_COOKIE, cookie)], Json(ApiResponse::<Value>::ok())).into_response()
            }
        },
        ActionRouterOutput::Expenses(output) => match output {
            ExpensesProcessorOutput::Add(created) => Json(ApiResponse::success(created)).into_response(),
            ExpensesProcessorOutput::List(rows) => Json(rows).into_response(),
            ExpensesProcessorOutput::Get(row) => Json(row).into_response(),
            ExpensesProcessorOutput::Update | ExpensesProcessorOutput::Delete => {
                Json(ApiResponse::<Value>::ok()).into_response()
            }
            ExpensesProcessorOutput::Export(csv) => (
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", EXPORT_FILENAME)),
                ],
                csv,
            )
                .into_response(),
            ExpensesProcessorOutput::Report(report) => Json(ApiResponse::success(report)).into_response(),
        },
    };

    Ok(response)
}
