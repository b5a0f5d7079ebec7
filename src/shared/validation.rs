//! Sign-up input rules, checked before anything is sent to the backend.

use crate::shared::error::SharedError;
use crate::shared::models::NewUser;

pub const NAME_MIN: usize = 2;
pub const USERNAME_MIN: usize = 2;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;

impl NewUser {
    /// Check the sign-up rules, reporting the first field that fails
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.name.trim().chars().count() < NAME_MIN {
            return Err(SharedError::validation("name", "Too short"));
        }

        if let Some(username) = &self.username {
            let len = username.chars().count();
            if len < USERNAME_MIN {
                return Err(SharedError::validation("username", "Too short"));
            }
            if len > USERNAME_MAX {
                return Err(SharedError::validation("username", "Too long"));
            }
        }

        if !looks_like_email(&self.email) {
            return Err(SharedError::validation("email", "Invalid email address"));
        }

        if self.password.chars().count() < PASSWORD_MIN {
            return Err(SharedError::validation(
                "password",
                format!("must contain at least {} characters", PASSWORD_MIN),
            ));
        }

        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
