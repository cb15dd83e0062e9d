//! 登录 / 注册 / 登出流程

use std::sync::Arc;
use tracing::info;

use crate::clients::{AuthProvider, ProfileClient};
use crate::error::{AppError, AuthError};
use crate::infrastructure::TokenCache;
use crate::models::{Profile, RoleName, SignupRequest};
use crate::services::ProfileCache;
use crate::workflow::bootstrap::{ROOT_ROUTE, SIGN_IN_ROUTE};

/// 第三方登录按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Microsoft,
}

const SOCIAL_PROVIDERS: [SocialProvider; 2] = [SocialProvider::Google, SocialProvider::Microsoft];

/// 登录表单
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::InvalidForm(
                "Please enter your email and password.".to_string(),
            ));
        }
        Ok(())
    }
}

/// 注册表单
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub surname: String,
    pub username: String,
    pub class_level: String,
    pub role: RoleName,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        SignInForm {
            email: self.email.clone(),
            password: self.password.clone(),
        }
        .validate()?;

        if self.password != self.confirm_password {
            return Err(AuthError::InvalidForm("Passwords do not match.".to_string()));
        }

        let required = [&self.first_name, &self.surname, &self.username, &self.class_level];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AuthError::InvalidForm("Please fill in all fields.".to_string()));
        }
        Ok(())
    }

    fn to_signup_request(&self, user_id: &str) -> SignupRequest {
        SignupRequest {
            user_id: user_id.to_string(),
            first_name: self.first_name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            username: self.username.trim().to_string(),
            role_name: self.role,
            class_level: Some(self.class_level.trim().to_string()),
            organization_id: None,
        }
    }
}

/// 注册结果
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// 已登录且资料已创建
    SignedIn { profile: Profile },
    /// 需要先确认邮箱，资料在确认后首次登录时创建
    ConfirmationRequired { email: String },
}

/// 登录页流程
pub struct SignInFlow {
    auth: Arc<dyn AuthProvider>,
    profiles: ProfileClient,
    cache: ProfileCache,
    tokens: TokenCache,
    show_social_login: bool,
}

impl SignInFlow {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: ProfileClient,
        cache: ProfileCache,
        tokens: TokenCache,
        show_social_login: bool,
    ) -> Self {
        Self {
            auth,
            profiles,
            cache,
            tokens,
            show_social_login,
        }
    }

    /// 第三方登录按钮，开关关闭时为空
    pub fn social_providers(&self) -> &'static [SocialProvider] {
        if self.show_social_login {
            &SOCIAL_PROVIDERS
        } else {
            &[]
        }
    }

    /// 密码登录，成功后返回要跳转的路由
    pub async fn sign_in(&self, form: &SignInForm) -> Result<&'static str, AppError> {
        form.validate()?;
        let session = self
            .auth
            .sign_in_with_password(form.email.trim(), &form.password)
            .await?;
        self.cache.clear();
        info!("✓ 登录成功: {}", session.user.email.as_deref().unwrap_or(&session.user.id));
        Ok(ROOT_ROUTE)
    }

    /// 注册并创建资料
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpOutcome, AppError> {
        form.validate()?;
        let response = self.auth.sign_up(form.email.trim(), &form.password).await?;

        if response.session.is_none() {
            info!("📧 注册成功，等待邮箱确认: {}", form.email.trim());
            return Ok(SignUpOutcome::ConfirmationRequired {
                email: form.email.trim().to_string(),
            });
        }

        let profile = self
            .profiles
            .create_profile(&form.to_signup_request(&response.user.id))
            .await?;
        self.cache.clear();
        info!("✓ 注册成功: {}", profile.display_name());
        Ok(SignUpOutcome::SignedIn { profile })
    }

    /// 登出，返回登录页路由
    ///
    /// 令牌缓存在返回前清空，不等待监听任务处理登出事件
    pub async fn sign_out(&self) -> Result<&'static str, AppError> {
        self.auth.sign_out().await?;
        self.tokens.set(None);
        self.cache.clear();
        info!("👋 已登出");
        Ok(SIGN_IN_ROUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up_form() -> SignUpForm {
        SignUpForm {
            email: "t@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            first_name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            username: "ada".to_string(),
            class_level: "Year 7".to_string(),
            role: RoleName::Teacher,
        }
    }

    #[test]
    fn test_sign_in_form_requires_both_fields() {
        let form = SignInForm {
            email: " ".to_string(),
            password: "x".to_string(),
        };
        assert!(matches!(form.validate(), Err(AuthError::InvalidForm(_))));
    }

    #[test]
    fn test_sign_up_form_checks_passwords_and_fields() {
        assert!(sign_up_form().validate().is_ok());

        let mut mismatch = sign_up_form();
        mismatch.confirm_password = "other".to_string();
        assert_eq!(
            mismatch.validate().unwrap_err().to_string(),
            "Passwords do not match."
        );

        let mut missing = sign_up_form();
        missing.class_level = String::new();
        assert_eq!(
            missing.validate().unwrap_err().to_string(),
            "Please fill in all fields."
        );
    }

    #[test]
    fn test_signup_request_is_trimmed() {
        let mut form = sign_up_form();
        form.username = "  ada  ".to_string();
        let request = form.to_signup_request("user-1");
        assert_eq!(request.user_id, "user-1");
        assert_eq!(request.username, "ada");
        assert_eq!(request.role_name, RoleName::Teacher);
    }
}
