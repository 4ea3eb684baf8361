#![forbid(unsafe_code)]

pub mod graph;

pub mod ids {
    /// Key of one story project; the host keeps one beat graph per project.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ProjectId(String);

    impl ProjectId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, ProjectIdError> {
            let value = value.into();
            validate_project_id(&value)?;
            Ok(Self(value))
        }
    }

    impl std::fmt::Display for ProjectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ProjectIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    impl ProjectIdError {
        pub fn message(&self) -> String {
            match self {
                Self::Empty => "project id must not be empty".to_string(),
                Self::TooLong => "project id is too long".to_string(),
                Self::InvalidFirstChar => {
                    "project id must start with an ASCII letter or digit".to_string()
                }
                Self::InvalidChar { ch, index } => {
                    format!("project id contains invalid character {ch:?} at {index}")
                }
            }
        }
    }

    fn validate_project_id(value: &str) -> Result<(), ProjectIdError> {
        if value.is_empty() {
            return Err(ProjectIdError::Empty);
        }
        if value.len() > 128 {
            return Err(ProjectIdError::TooLong);
        }
        let Some(first) = value.chars().next() else {
            return Err(ProjectIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(ProjectIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate().skip(1) {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '/' | '-') {
                continue;
            }
            return Err(ProjectIdError::InvalidChar { ch, index });
        }
        Ok(())
    }

}
