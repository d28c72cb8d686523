use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortlinkError {
    InvalidInput(String),
    SlugAllocationExhausted(String),
    StorageUnavailable(String),
    Serialization(String),
}

impl ShortlinkError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortlinkError::InvalidInput(_) => "Invalid Input",
            ShortlinkError::SlugAllocationExhausted(_) => "Slug Allocation Exhausted",
            ShortlinkError::StorageUnavailable(_) => "Storage Unavailable",
            ShortlinkError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ShortlinkError::InvalidInput(msg) => msg,
            ShortlinkError::SlugAllocationExhausted(msg) => msg,
            ShortlinkError::StorageUnavailable(msg) => msg,
            ShortlinkError::Serialization(msg) => msg,
        }
    }
}

impl fmt::Display for ShortlinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for ShortlinkError {}

// 便捷的构造函数
impl ShortlinkError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::InvalidInput(msg.into())
    }

    pub fn slug_allocation_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::SlugAllocationExhausted(msg.into())
    }

    pub fn storage_unavailable<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::StorageUnavailable(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortlinkError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for ShortlinkError {
    fn from(err: std::io::Error) -> Self {
        ShortlinkError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for ShortlinkError {
    fn from(err: serde_json::Error) -> Self {
        ShortlinkError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for ShortlinkError {
    fn from(err: redis::RedisError) -> Self {
        ShortlinkError::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortlinkError>;
