use tokio::sync::OnceCell;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::Repository;
use crate::models::{Credentials, CurrentUser, NewUser, Session, User};
use crate::session::SessionStore;
use crate::utils::error::AppError;

/// bcrypt is CPU bound, so hashing runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Hash checked when the username is unknown so both failures cost one bcrypt
/// verification. Built with the cost of the first lookup that needs it.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

async fn dummy_hash(cost: u32) -> Result<&'static str, AppError> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password("webbeep-dummy-password".to_string(), cost))
        .await?;
    Ok(hash.as_str())
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

pub async fn register(
    repo: &dyn Repository,
    credentials: Credentials,
    cost: u32,
) -> Result<User, AppError> {
    let credentials = credentials.normalized();
    credentials.validate()?;

    if repo
        .find_user_by_username(&credentials.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "username '{}' is already taken",
            credentials.username
        )));
    }

    let password_hash = hash_password(credentials.password, cost).await?;
    // The unique index still catches a registration racing this one.
    let user = repo
        .insert_user(NewUser {
            username: credentials.username,
            password_hash,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "Registered user");
    Ok(user)
}

/// Unknown user and wrong password are indistinguishable to the caller.
pub async fn login(
    repo: &dyn Repository,
    sessions: &SessionStore,
    credentials: Credentials,
    cost: u32,
) -> Result<Session, AppError> {
    let credentials = credentials.normalized();
    credentials.validate()?;

    let user = match repo.find_user_by_username(&credentials.username).await? {
        Some(user) => user,
        None => {
            let hash = dummy_hash(cost).await?.to_string();
            verify_password(credentials.password, hash).await?;
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(credentials.password, user.password_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    let session = sessions.create(user.id).await?;
    info!(user_id = user.id, "User logged in");
    Ok(session)
}

pub async fn logout(sessions: &SessionStore, principal: &CurrentUser) -> Result<(), AppError> {
    if !sessions.revoke(principal.session_id).await {
        return Err(AppError::Unauthorized);
    }
    info!(user_id = principal.user_id, "User logged out");
    Ok(())
}

/// Maps a session id onto the user it belongs to.
pub async fn resolve_principal(
    repo: &dyn Repository,
    sessions: &SessionStore,
    session_id: Uuid,
) -> Result<CurrentUser, AppError> {
    let session = sessions
        .resolve(session_id)
        .await
        .ok_or(AppError::Unauthorized)?;
    let user = repo
        .find_user_by_id(session.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(CurrentUser {
        user_id: user.id,
        username: user.username,
        session_id: session.session_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryRepository;
    use chrono::Duration;

    const COST: u32 = 4;

    fn sessions() -> SessionStore {
        SessionStore::new(Duration::hours(1))
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let repo = MemoryRepository::new();
        let first = register(&repo, Credentials::new("ada", "hunter2"), COST)
            .await
            .unwrap();
        assert_ne!(first.password_hash, "hunter2");

        let second = register(&repo, Credentials::new(" ada ", "other"), COST).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(repo.row_counts().await.0, 1);
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let repo = MemoryRepository::new();
        let result = register(&repo, Credentials::new("   ", "pw"), COST).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        let result = register(&repo, Credentials::new("ada", ""), COST).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let repo = MemoryRepository::new();
        let store = sessions();
        register(&repo, Credentials::new("ada", "hunter2"), COST)
            .await
            .unwrap();

        for attempt in ["hunter3", "HUNTER2", "hunter2 "] {
            let result = login(&repo, &store, Credentials::new("ada", attempt), COST).await;
            assert!(matches!(result, Err(AppError::InvalidCredentials)));
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_login_unknown_user_fails() {
        let repo = MemoryRepository::new();
        let result = login(&repo, &sessions(), Credentials::new("ghost", "pw"), COST).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
        // The unknown user still went through a bcrypt verification.
        let dummy = DUMMY_HASH.get().unwrap();
        assert!(dummy.starts_with("$2"));
        assert!(!verify_password("pw".to_string(), dummy.clone()).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let repo = MemoryRepository::new();
        let store = sessions();
        let user = register(&repo, Credentials::new("ada", "hunter2"), COST)
            .await
            .unwrap();

        let session = login(&repo, &store, Credentials::new("ada", "hunter2"), COST)
            .await
            .unwrap();
        assert_eq!(session.user_id, user.id);

        let principal = resolve_principal(&repo, &store, session.session_id)
            .await
            .unwrap();
        assert_eq!(principal.username, "ada");

        logout(&store, &principal).await.unwrap();
        assert!(matches!(
            resolve_principal(&repo, &store, session.session_id).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            logout(&store, &principal).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_session_for_missing_user_is_unauthorized() {
        let repo = MemoryRepository::new();
        let store = sessions();
        let session = store.create(42).await.unwrap();
        assert!(matches!(
            resolve_principal(&repo, &store, session.session_id).await,
            Err(AppError::Unauthorized)
        ));
    }
}
