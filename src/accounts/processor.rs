use crate::accounts::db_types::CreateUser;
use crate::accounts::operations::{hash_password, start_session, verify_password};
use crate::utils::app_config::AppConfig;
use crate::utils::error::{ActionError, StoreError};
use crate::utils::traits::ActionProcessor;
use super::processor_enums::*;

impl ActionProcessor<SessionContext, AccountsProcessorOutput> for AccountsProcessorInput {
    async fn process(&self, app_config: &AppConfig, context: &mut SessionContext) -> Result<AccountsProcessorOutput, ActionError> {
        match self {
            AccountsProcessorInput::Register(args) => {
                let username = args.username.clone();
                let password = args.password.clone();

                let user = app_config
                    .with_repository(move |repository| {
                        let password_hash = hash_password(&password)
                            .map_err(|e| ActionError::Internal(e.to_string()))?;

                        repository
                            .create_user(&CreateUser {
                                username,
                                password_hash,
                            })
                            .map_err(|err| match err {
                                StoreError::UniqueViolation => ActionError::UsernameTaken,
                                other => ActionError::Store(other),
                            })
                    })
                    .await?;

                tracing::info!(user_id = user.id, "registered {}", user.username);

                let signed_in = start_session(app_config, context, &user).await?;
                Ok(AccountsProcessorOutput::Register(signed_in))
            }
            AccountsProcessorInput::Login(args) => {
                let username = args.username.clone();
                let password = args.password.clone();

                let user = app_config
                    .with_repository(move |repository| {
                        Ok(repository
                            .find_user_by_username(&username)?
                            .filter(|user| verify_password(&password, &user.password_hash)))
                    })
                    .await?;

                // unknown user and wrong password are reported identically
                let Some(user) = user else {
                    tracing::warn!("failed login for {}", args.username);
                    return Err(ActionError::InvalidCredentials);
                };

                let signed_in = start_session(app_config, context, &user).await?;
                Ok(AccountsProcessorOutput::Login(signed_in))
            }
            AccountsProcessorInput::Logout => {
                if let Some(token) = context.presented.take() {
                    app_config.sessions.destroy(&token).await?;
                }
                Ok(AccountsProcessorOutput::Logout)
            }
        }
    }
}
