//! Human-readable messages shown by hooks and the auth flow.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Ru => write!(f, "ru"),
        }
    }
}

impl Locale {
    /// Message for a failed data request. A server-provided message wins.
    pub fn describe(self, err: &ApiError) -> String {
        match err {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Api {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::Api {
                status,
                message: None,
            } => self.request_failed(*status),
            ApiError::Network(_) => self.no_connectivity().to_string(),
            ApiError::Unexpected(_) => self.unexpected().to_string(),
        }
    }

    /// Like `describe`, but a structured error without a message reads as
    /// rejected credentials.
    pub fn describe_auth(self, err: &ApiError) -> String {
        match err {
            ApiError::Api { message: None, .. } => self.invalid_credentials().to_string(),
            other => self.describe(other),
        }
    }

    pub fn invalid_credentials(self) -> &'static str {
        match self {
            Locale::En => "Invalid email or password.",
            Locale::Ru => "Неверный email или пароль.",
        }
    }

    pub fn no_connectivity(self) -> &'static str {
        match self {
            Locale::En => "No response from the server. Check your connection.",
            Locale::Ru => "Нет ответа от сервера. Проверьте ваше подключение.",
        }
    }

    pub fn unexpected(self) -> &'static str {
        match self {
            Locale::En => "An unexpected error occurred. Please try again.",
            Locale::Ru => "Произошла непредвиденная ошибка. Попробуйте снова.",
        }
    }

    pub fn password_mismatch(self) -> &'static str {
        match self {
            Locale::En => "Passwords do not match!",
            Locale::Ru => "Пароли не совпадают!",
        }
    }

    pub fn login_success(self) -> &'static str {
        match self {
            Locale::En => "Login success!",
            Locale::Ru => "Вход выполнен успешно!",
        }
    }

    pub fn register_success(self) -> &'static str {
        match self {
            Locale::En => "Registration successful!",
            Locale::Ru => "Регистрация прошла успешно!",
        }
    }

    pub fn logout_success(self) -> &'static str {
        match self {
            Locale::En => "Logged out.",
            Locale::Ru => "Вы вышли из системы.",
        }
    }

    fn request_failed(self, status: u16) -> String {
        match self {
            Locale::En => format!("Request failed with status {status}."),
            Locale::Ru => format!("Запрос завершился с ошибкой (код {status})."),
        }
    }
}
