/**
 * Authentication Operations
 *
 * Account creation, sign in and sign out. Account creation is a two-step
 * write (auth account, then identity document); what happens to the auth
 * account when the second step fails is decided by `AccountRollback`.
 */

use serde_json::{Map, Value};

use crate::backend::{BackendError, RemoteBackend, CURRENT_SESSION};
use crate::client::error::{Operation, OperationError};
use crate::client::Client;
use crate::shared::models::unique_id;
use crate::shared::{AccountRollback, Identity, NewUser, Session};

impl<B: RemoteBackend> Client<B> {
    /// Create an auth account and its identity document
    pub async fn create_account(&self, user: NewUser) -> Result<Identity, OperationError> {
        if let Err(e) = user.validate() {
            tracing::warn!(error = %e, "create account: input rejected");
            return Err(OperationError::Validation(e));
        }

        let account = self
            .backend
            .create_account(&unique_id(), &user.email, &user.password, &user.name)
            .await
            .map_err(|source| {
                tracing::warn!(error = %source, "create account: backend rejected account");
                OperationError::AuthFailed { source }
            })?;

        let image_url = self.backend.avatar_initials_url(&user.name);

        let mut data = Map::new();
        data.insert("accountId".into(), Value::String(account.id.clone()));
        data.insert("name".into(), Value::String(account.name.clone()));
        data.insert("email".into(), Value::String(account.email.clone()));
        data.insert("imageUrl".into(), Value::String(image_url));
        if let Some(username) = &user.username {
            data.insert("username".into(), Value::String(username.clone()));
        }

        let created = self
            .backend
            .create_document(&self.config.user_collection_id, &unique_id(), data)
            .await
            .and_then(|document| document.decode::<Identity>());

        match created {
            Ok(identity) => {
                tracing::info!(account_id = %account.id, identity_id = %identity.id, "account created");
                Ok(identity)
            }
            // the identity document exists, so the account is kept
            Err(source) if source.is_unreadable_response() => {
                tracing::error!(
                    account_id = %account.id,
                    error = %source,
                    "create account: stored identity could not be read back"
                );
                Err(OperationError::backend(Operation::CreateAccount, source))
            }
            Err(source) => Err(self.roll_back_account(&account.id, source).await),
        }
    }

    async fn roll_back_account(&self, account_id: &str, source: BackendError) -> OperationError {
        let orphaned = match self.config.account_rollback {
            AccountRollback::LeaveOrphan => {
                tracing::error!(
                    account_id,
                    error = %source,
                    "identity document not created; auth account left without identity"
                );
                true
            }
            AccountRollback::DeleteAccount => match self.backend.delete_account(account_id).await {
                Ok(()) => {
                    tracing::warn!(account_id, error = %source, "identity document not created; auth account deleted");
                    false
                }
                Err(e) => {
                    tracing::error!(
                        account_id,
                        error = %source,
                        rollback_error = %e,
                        "identity document not created and auth account could not be deleted"
                    );
                    true
                }
            },
        };

        OperationError::ProfileCreateFailed {
            account_id: account_id.to_string(),
            orphaned,
            source,
        }
    }

    /// Start an email/password session. The session manager is not
    /// refreshed here; call `check_current_user` afterwards.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, OperationError> {
        self.backend
            .create_email_session(email, password)
            .await
            .map_err(|source| {
                tracing::warn!(error = %source, "sign in failed");
                OperationError::AuthFailed { source }
            })
    }

    /// End the current session. Local state is cleared even when the
    /// backend call fails.
    pub async fn sign_out(&self) -> Result<(), OperationError> {
        let result = self.backend.delete_session(CURRENT_SESSION).await;
        self.session.clear().await;

        result.map_err(|source| {
            tracing::warn!(error = %source, "sign out: session not deleted on backend");
            OperationError::backend(Operation::SignOut, source)
        })
    }
}
