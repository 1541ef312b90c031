use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{AuthResponse, CreateUserRequest, LoginRequest, User, UserInfo, UserRole};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub exp: i64,
}

pub struct AuthService {
    db: SqlitePool,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub async fn register(&self, req: CreateUserRequest) -> Result<AuthResponse> {
        let password_hash = self.hash_password(&req.password)?;

        // First user runs the station
        let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        let role = if user_count == 0 {
            UserRole::Admin
        } else {
            UserRole::Listener
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.username)
        .bind(&req.email)
        .bind(&password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false);
            if unique {
                AppError::Validation("Username or email already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!("Registered user '{}' ({:?})", user.username, user.role);
        self.issue(user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(&req.username)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        self.verify_password(&req.password, &user.password_hash)?;

        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(user.id)
            .execute(&self.db)
            .await?;

        self.issue(user)
    }

    /// Resolve a bearer token to the listener it was issued to. Tokens for
    /// users that no longer exist are rejected like bad signatures.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?
        .claims;

        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(claims.sub)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Token for unknown user {}", claims.sub);
                AppError::Unauthorized
            })
    }

    /// Users in name order, as listed on the station page
    pub async fn users_by_name(&self) -> Result<Vec<UserInfo>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username COLLATE NOCASE")
            .fetch_all(&self.db)
            .await?;

        Ok(users.into_iter().map(UserInfo::from).collect())
    }

    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::InvalidCredentials)
    }

    fn issue(&self, user: User) -> Result<AuthResponse> {
        let claims = Claims {
            sub: user.id,
            role: user.role.clone(),
            exp: (Utc::now() + Duration::days(7)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }
}
