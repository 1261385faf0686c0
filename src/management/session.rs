use std::path::{Path, PathBuf};

use crate::{Error, Res, config};

/// The signed-in user whose releases and likes are read and written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Res<Self> {
        let user_id = user_id.into();
        super::check_path_segment("user id", &user_id)?;
        Ok(Self { user_id })
    }

    /// The session of the configured user, if one is configured.
    pub fn from_env() -> Res<Option<Self>> {
        config::user_id().map(Self::new).transpose()
    }

    /// Like [`Session::from_env`], but a missing user is an error.
    pub fn require() -> Res<Self> {
        Self::from_env()?.ok_or_else(|| {
            Error::Validation("Please log in: set SPORDCLI_USER_ID.".to_string())
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `<data_dir>/users/<user_id>`
    pub fn user_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join("users").join(&self.user_id)
    }
}
