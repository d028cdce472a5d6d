use std::fmt;

#[derive(Debug)]
pub enum SerializerError {
    Json(serde_json::Error),
    Bitcode(bitcode::Error),

    /// Raised by a format registered through
    /// [`register_serializer`](crate::serializer::register_serializer).
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl SerializerError {
    pub fn custom<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        SerializerError::Custom(error.into())
    }
}

impl fmt::Display for SerializerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializerError::Json(e) => write!(f, "json serializer error: {}", e),
            SerializerError::Bitcode(e) => write!(f, "bitcode serializer error: {}", e),
            SerializerError::Custom(e) => write!(f, "serializer error: {}", e),
        }
    }
}

impl std::error::Error for SerializerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializerError::Json(e) => Some(e),
            SerializerError::Bitcode(e) => Some(e),
            SerializerError::Custom(e) => Some(e.as_ref()),
        }
    }
}

impl From<serde_json::Error> for SerializerError {
    fn from(e: serde_json::Error) -> Self {
        SerializerError::Json(e)
    }
}

impl From<bitcode::Error> for SerializerError {
    fn from(e: bitcode::Error) -> Self {
        SerializerError::Bitcode(e)
    }
}
