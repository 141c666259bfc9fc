use std::sync::Arc;

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use uuid::Uuid;

use crate::database::{
    OvertimeStore,
    models::{Profile, Role, Staffing},
};
use crate::error::AppError;
use crate::middleware::RequestIdExt;
use crate::services::auth::Claims;

/// The authenticated caller: profile, staffing and the request's
/// correlation id.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub profile: Profile,
    pub staffing: Option<Staffing>,
    pub correlation_id: Option<String>,
}

impl UserContext {
    pub fn user_id(&self) -> Uuid {
        self.profile.id
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    pub fn is_manager(&self) -> bool {
        self.role() == Role::Manager
    }

    /// Managers are employees too; only `new_user` is still awaiting approval.
    pub fn is_approved(&self) -> bool {
        matches!(self.role(), Role::Employee | Role::Manager)
    }

    pub fn team(&self) -> Option<&str> {
        self.staffing.as_ref().and_then(|s| s.team.as_deref())
    }

    pub fn requires_manager(&self) -> Result<(), AppError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Manager role required".to_string()))
        }
    }

    pub fn requires_employee(&self) -> Result<(), AppError> {
        if self.is_approved() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Your account is awaiting manager approval".to_string(),
            ))
        }
    }
}

/// Builds a `UserContext` from the bearer token of a request.
#[derive(Clone)]
pub struct UserContextService {
    store: Arc<dyn OvertimeStore>,
}

impl UserContextService {
    pub fn new(store: Arc<dyn OvertimeStore>) -> Self {
        Self { store }
    }

    pub async fn extract_context(&self, req: &HttpRequest) -> Result<UserContext, AppError> {
        let mut payload = Payload::None;
        let claims = Claims::from_request(req, &mut payload).into_inner()?;

        self.from_claims(&claims, req.correlation_id()).await
    }

    pub async fn from_claims(
        &self,
        claims: &Claims,
        correlation_id: Option<String>,
    ) -> Result<UserContext, AppError> {
        let profile = self
            .store
            .find_profile(claims.user_id())
            .await?
            .ok_or_else(|| AppError::Forbidden("No profile exists for this account".to_string()))?;
        let staffing = self.store.find_staffing(profile.id).await?;

        Ok(UserContext {
            profile,
            staffing,
            correlation_id,
        })
    }
}
