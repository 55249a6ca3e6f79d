/// Form validation for the group and account screens.
///
/// Each validator trims the field value and returns the cleaned value on
/// success, so callers never submit untrimmed input. Error `Display` strings
/// are the alert texts shown to the user.

use thiserror::Error;

use crate::limits::{MAX_GROUP_DESCRIPTION_LEN, MAX_GROUP_NAME_LEN};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter group name")]
    GroupNameRequired,

    #[error("Group name too long (max {0} characters)")]
    GroupNameTooLong(usize),

    #[error("Group description too long (max {0} characters)")]
    DescriptionTooLong(usize),

    #[error("Please enter email.")]
    EmailRequired,

    #[error("Please enter a valid email address.")]
    EmailInvalid,

    #[error("All fields are required")]
    PasswordFieldsRequired,

    #[error("Password must be at least {0} characters long.")]
    PasswordTooShort(usize),

    #[error("New password cannot be same as old password")]
    PasswordUnchanged,

    #[error("New password and confirm password do not match")]
    PasswordMismatch,

    #[error("Please enter a nickname.")]
    NicknameRequired,
}

// ---------------------------------------------------------------------------
// Group fields
// ---------------------------------------------------------------------------

pub fn validate_group_name(name: &str) -> Result<String, FormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::GroupNameRequired);
    }
    if name.chars().count() > MAX_GROUP_NAME_LEN {
        return Err(FormError::GroupNameTooLong(MAX_GROUP_NAME_LEN));
    }
    Ok(name.to_string())
}

/// Descriptions may be empty.
pub fn validate_group_description(description: &str) -> Result<String, FormError> {
    let description = description.trim();
    if description.chars().count() > MAX_GROUP_DESCRIPTION_LEN {
        return Err(FormError::DescriptionTooLong(MAX_GROUP_DESCRIPTION_LEN));
    }
    Ok(description.to_string())
}

/// Nicknames are trimmed and must not be blank.
pub fn validate_nickname(nickname: &str) -> Result<String, FormError> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(FormError::NicknameRequired);
    }
    Ok(nickname.to_string())
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

pub fn validate_email(email: &str) -> Result<String, FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(FormError::EmailInvalid);
    }
    Ok(email.to_string())
}

/// `local@domain.tld`. Local part `[A-Za-z0-9._%+-]+`, domain
/// `[A-Za-z0-9.-]+`, alphabetic TLD of at least 2 characters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

/// Trimmed, validated password change ready for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

/// Checks run in the order the form reports them: presence, length, reuse,
/// confirmation.
pub fn validate_password_change(
    old_password: &str,
    new_password: &str,
    confirm_password: &str,
    min_len: usize,
) -> Result<PasswordChange, FormError> {
    let old_password = old_password.trim();
    let new_password = new_password.trim();
    let confirm_password = confirm_password.trim();

    if old_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
        return Err(FormError::PasswordFieldsRequired);
    }
    if new_password.chars().count() < min_len {
        return Err(FormError::PasswordTooShort(min_len));
    }
    if new_password == old_password {
        return Err(FormError::PasswordUnchanged);
    }
    if new_password != confirm_password {
        return Err(FormError::PasswordMismatch);
    }

    Ok(PasswordChange {
        old_password: old_password.to_string(),
        new_password: new_password.to_string(),
    })
}
