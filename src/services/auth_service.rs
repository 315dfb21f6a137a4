use crate::entities::{
    PlanId, chain_transaction_entity as chain_transactions, draft_entity as drafts,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthService {
    // Arc keeps the service `Clone` even with sea-orm's `mock` feature,
    // which strips `Clone` from `DatabaseConnection` itself.
    pool: Arc<DatabaseConnection>,
    jwt_service: JwtService,
}

fn validate_email(email: &str) -> AppResult<()> {
    let looks_valid = email.len() <= 254
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });
    if !looks_valid {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

impl AuthService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>, jwt_service: JwtService) -> Self {
        Self {
            pool: pool.into(),
            jwt_service,
        }
    }

    /// Create an account. New accounts always start on the Starter plan
    /// with the Starter quota set.
    pub async fn sign_up(&self, request: SignUpRequest) -> AppResult<AuthResponse> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        if request.name.is_empty() || request.name.len() > 60 {
            return Err(AppError::ValidationError(
                "Name must be between 1 and 60 characters".to_string(),
            ));
        }

        let email = request.email.to_lowercase();
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&*self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Email is already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let defaults = PlanId::Starter.default_quotas();
        let now = Utc::now();

        let inserted = users::ActiveModel {
            email: Set(email),
            name: Set(request.name),
            password_hash: Set(password_hash),
            plan: Set(PlanId::Starter),
            posts_used: Set(defaults.posts.used),
            posts_total: Set(defaults.posts.total),
            images_used: Set(defaults.images.used),
            images_total: Set(defaults.images.total),
            scripts_used: Set(defaults.scripts.used),
            scripts_total: Set(defaults.scripts.total),
            agents_used: Set(defaults.agents.used),
            agents_total: Set(defaults.agents.total),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await;

        // A racing registration can slip past the lookup above; the unique
        // index on email settles it, and the caller sees the same message.
        let user = match inserted {
            Ok(user) => user,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::ValidationError(
                    "Email is already registered".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        self.issue_tokens(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        validate_email(&request.email)?;

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(request.email.to_lowercase()))
            .one(&*self.pool)
            .await?;

        // One message for both misses; don't reveal which part was wrong.
        let user =
            user.ok_or_else(|| AppError::AuthError("Unknown email or wrong password".to_string()))?;

        let is_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::AuthError(
                "Unknown email or wrong password".to_string(),
            ));
        }

        self.issue_tokens(user)
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        let user = self.get_user_by_id(user_id).await?;
        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.email)?;
        let expires_in = self.jwt_service.get_access_token_expires_in();

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in,
        })
    }

    /// Delete the account and everything it owns. Drafts and transactions
    /// are composition, not reference; they go with the user.
    pub async fn delete_account(&self, user_id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;

        drafts::Entity::delete_many()
            .filter(drafts::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        chain_transactions::Entity::delete_many()
            .filter(chain_transactions::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        let result = users::Entity::delete_by_id(user_id).exec(&txn).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        txn.commit().await?;
        log::info!("Deleted account {user_id} and its drafts/transactions");
        Ok(())
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&*self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let access_token = self
            .jwt_service
            .generate_access_token(user.id, &user.email)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(user.id, &user.email)?;
        let expires_in = self.jwt_service.get_access_token_expires_in();

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@nodot").is_err());
    }

    fn existing_user() -> users::Model {
        let defaults = PlanId::Starter.default_quotas();
        users::Model {
            id: 1,
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: "x".into(),
            plan: PlanId::Starter,
            posts_used: defaults.posts.used,
            posts_total: defaults.posts.total,
            images_used: defaults.images.used,
            images_total: defaults.images.total,
            scripts_used: defaults.scripts.used,
            scripts_total: defaults.scripts.total,
            agents_used: defaults.agents.used,
            agents_total: defaults.agents.total,
            current_period_end: None,
            pending_order_id: None,
            pending_plan: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_with_one_message() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_user()]])
            .into_connection();
        let svc = AuthService::new(db, JwtService::new("test-secret", 60, 120));

        let err = svc
            .sign_up(SignUpRequest {
                email: "Ada@Example.com".into(),
                password: "Password123".into(),
                name: "Ada".into(),
            })
            .await
            .unwrap_err();

        match err {
            AppError::ValidationError(msg) => assert_eq!(msg, "Email is already registered"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
