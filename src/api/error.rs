// ==========================================
// 设施预测性维护 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户友好的错误消息
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 配置与导入错误
    // ==========================================
    #[error("配置读取失败: {0}")]
    ConfigError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 数据库错误
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }

            // 业务规则错误
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }

            // 数据质量错误
            RepositoryError::SerializationError(msg) => ApiError::ValidationError(msg),

            // 通用错误
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_conversion() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "MaintenanceTask".to_string(),
            id: "T-1".to_string(),
        }
        .into();
        match err {
            ApiError::NotFound(msg) => assert!(msg.contains("T-1")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_transition_is_preserved() {
        let err: ApiError = RepositoryError::InvalidStateTransition {
            from: "pending".to_string(),
            to: "in-progress".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
        assert!(err.to_string().contains("in-progress"));
    }

    #[test]
    fn test_constraint_violations_become_business_rule_errors() {
        let unique: ApiError =
            RepositoryError::UniqueConstraintViolation("maintenance_task.task_id".to_string()).into();
        assert!(matches!(unique, ApiError::BusinessRuleViolation(ref m) if m.contains("唯一约束")));

        let fk: ApiError =
            RepositoryError::ForeignKeyViolation("maintenance_log.task_id".to_string()).into();
        assert!(matches!(fk, ApiError::BusinessRuleViolation(ref m) if m.contains("外键约束")));

        let json: ApiError = RepositoryError::SerializationError("bad list".to_string()).into();
        assert!(matches!(json, ApiError::ValidationError(_)));
    }
}
