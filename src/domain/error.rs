//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Invalid connection string: {0}")]
    InvalidUrl(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),
}

#[derive(Error, Debug, Clone)]
pub enum BlockchainError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("API call failed: {0}")]
    Api(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Timeout: {0}")]
    Timeout(String),
}

#[derive(Error, Debug, Clone)]
pub enum ContractError {
    #[error("Function '{0}' is not exposed by module")]
    UnknownFunction(String),
    #[error("Function '{0}' is not a view function")]
    NotView(String),
    #[error("Function '{0}' is not an entry function")]
    NotEntry(String),
    #[error("Function '{function}' expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },
    #[error("Function '{function}' expects {expected} type arguments, got {actual}")]
    TypeArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },
    #[error("Unexpected return value from '{function}': {message}")]
    UnexpectedReturn { function: String, message: String },
}

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Environment variable '{0}' is still set to its placeholder value")]
    PlaceholderValue(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted("Pool timed out".to_string()),
            sqlx::Error::Configuration(e) => DatabaseError::InvalidUrl(e.to_string()),
            sqlx::Error::Io(e) => DatabaseError::Connection(e.to_string()),
            sqlx::Error::Tls(e) => DatabaseError::Connection(e.to_string()),
            sqlx::Error::Database(db_err) => DatabaseError::Query(db_err.message().to_string()),
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_conversions() {
        let not_found = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(not_found, DatabaseError::NotFound(_)));

        let pool_timeout = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(pool_timeout, DatabaseError::PoolExhausted(_)));

        let config = DatabaseError::from(sqlx::Error::Configuration("bad url".into()));
        assert!(matches!(config, DatabaseError::InvalidUrl(msg) if msg == "bad url"));

        // Simulate fallback for unknown errors
        let generic = DatabaseError::from(sqlx::Error::WorkerCrashed);
        assert!(matches!(generic, DatabaseError::Query(_)));
    }

    #[test]
    fn test_validation_conversion() {
        use validator::Validate;

        #[derive(Validate)]
        struct TestStruct {
            #[validate(range(min = 1))]
            val: u32,
        }

        let s = TestStruct { val: 0 };
        let err = s.validate().unwrap_err();
        let app_err = AppError::from(err);

        assert!(matches!(app_err, AppError::Validation(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<String>("invalid json").unwrap_err();
        let app_err = AppError::from(json_err);
        assert!(matches!(app_err, AppError::Serialization(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("DATABASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: DATABASE_URL"
        );

        let err = ConfigError::PlaceholderValue("PRIVATE_KEY".to_string());
        assert_eq!(
            err.to_string(),
            "Environment variable 'PRIVATE_KEY' is still set to its placeholder value"
        );

        let err = ConfigError::InvalidValue {
            key: "DB_POOL_SIZE".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'DB_POOL_SIZE': not a number"
        );
    }

    #[test]
    fn test_blockchain_error_display() {
        let err = BlockchainError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");

        let err = BlockchainError::Api("500: boom".to_string());
        assert_eq!(err.to_string(), "API call failed: 500: boom");

        let err = BlockchainError::NotFound("account_not_found".to_string());
        assert_eq!(err.to_string(), "Resource not found: account_not_found");

        let err = BlockchainError::Timeout("30s".to_string());
        assert_eq!(err.to_string(), "Timeout: 30s");
    }

    #[test]
    fn test_contract_error_display() {
        let err = ContractError::ArgumentCount {
            function: "post_message".to_string(),
            expected: 1,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Function 'post_message' expects 1 arguments, got 2"
        );

        let err = ContractError::NotView("post_message".to_string());
        assert_eq!(err.to_string(), "Function 'post_message' is not a view function");
    }

    #[test]
    fn test_app_error_from_config_error() {
        let cfg_err = ConfigError::MissingEnvVar("PRIVATE_KEY".to_string());
        let app_err: AppError = cfg_err.into();
        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_app_error_is_transparent() {
        let app_err: AppError = DatabaseError::Connection("timeout".to_string()).into();
        assert_eq!(app_err.to_string(), "Connection failed: timeout");
    }
}
