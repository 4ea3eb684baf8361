#![forbid(unsafe_code)]

const MAX_ID_LEN: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BeatId(String);

impl BeatId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self(value.trim().to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependencyId(String);

impl DependencyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self(value.trim().to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong,
    ContainsControl,
}

impl IdError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "id must not be empty",
            Self::TooLong => "id is too long",
            Self::ContainsControl => "id contains control characters",
        }
    }
}

fn validate_id(value: &str) -> Result<(), IdError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }
    if trimmed.len() > MAX_ID_LEN {
        return Err(IdError::TooLong);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(IdError::ContainsControl);
    }
    Ok(())
}
