// errors.rs
use chrono::NaiveDate;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum FudCourtError {
    #[error("Ошибка HTTP запроса: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Ошибка парсинга JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Ошибка конфигурации: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Ошибка выполнения задачи: {0}")]
    TaskError(#[from] JoinError),

    #[error("Некорректное поле `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Некорректные веса оценки: {0}")]
    InvalidWeights(String),

    #[error("Некорректный формат данных: {0}")]
    InvalidDataFormat(String),

    #[error("API вернул ошибку: {0}")]
    ApiError(String),

    #[error("Нет снимка за {0}")]
    SnapshotNotFound(NaiveDate),

    #[error("Недостаточно данных для оценки настроений: {0}")]
    InsufficientData(String),
}

impl FudCourtError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FudCourtError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Имя некорректного поля для ошибок валидации.
    pub fn field(&self) -> Option<&str> {
        match self {
            FudCourtError::InvalidInput { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

// Определяем псевдоним Result с фиксированным типом ошибки
pub type Result<T> = std::result::Result<T, FudCourtError>;
