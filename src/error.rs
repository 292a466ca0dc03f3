use serde::Serialize;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub detail: Option<String>,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl StdError for AppError {}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_should_join_code_and_message() {
        let error = AppError::new("receive_write_failed", "写入文件失败");
        assert_eq!(error.to_string(), "receive_write_failed: 写入文件失败");
    }

    #[test]
    fn with_detail_should_keep_code_and_message() {
        let error = AppError::new("receive_dir_create_failed", "创建保存目录失败")
            .with_detail("/tmp/airx: permission denied");
        assert_eq!(error.code, "receive_dir_create_failed");
        assert_eq!(
            error.detail.as_deref(),
            Some("/tmp/airx: permission denied")
        );
    }
}
