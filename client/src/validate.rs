//! Payload validation.
//!
//! Each input payload can check itself before it is sent. The request
//! builder never calls these; the client's operations do, so a payload that
//! fails validation never leaves the process.

use crate::error::InputError;
use crate::types::{
    ChangeActiveHouseholdInput, HouseholdCreationRequestInput, HouseholdUpdateRequestInput,
    PasswordResetTokenCreationRequestInput, PasswordResetTokenRedemptionRequestInput,
    PasswordUpdateInput, TotpSecretRefreshInput, TotpSecretVerificationInput, UserLoginInput,
};

/// Length of a TOTP token.
pub const TOTP_TOKEN_LENGTH: usize = 6;

/// Minimum accepted username length.
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A payload that can check its own fields.
pub trait Validatable {
    /// Returns an error describing the first invalid field.
    fn validate(&self) -> Result<(), InputError> {
        Ok(())
    }
}

impl Validatable for () {}

impl<T: Validatable + ?Sized> Validatable for &T {
    fn validate(&self) -> Result<(), InputError> {
        (**self).validate()
    }
}

fn required(field: &str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        return Err(InputError::invalid(format!("{field} is required")));
    }
    Ok(())
}

fn min_length(field: &str, value: &str, min: usize) -> Result<(), InputError> {
    required(field, value)?;
    if value.chars().count() < min {
        return Err(InputError::invalid(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

fn totp_token(field: &str, value: &str) -> Result<(), InputError> {
    if value.len() != TOTP_TOKEN_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::invalid(format!(
            "{field} must be {TOTP_TOKEN_LENGTH} digits"
        )));
    }
    Ok(())
}

impl Validatable for UserLoginInput {
    fn validate(&self) -> Result<(), InputError> {
        min_length("username", &self.username, MIN_USERNAME_LENGTH)?;
        min_length("password", &self.password, MIN_PASSWORD_LENGTH)?;
        if !self.totp_token.is_empty() {
            totp_token("totpToken", &self.totp_token)?;
        }
        Ok(())
    }
}

impl Validatable for PasswordUpdateInput {
    fn validate(&self) -> Result<(), InputError> {
        if self.current_password == self.new_password {
            return Err(InputError::invalid(
                "new password cannot be the same as the current password",
            ));
        }
        min_length("currentPassword", &self.current_password, MIN_PASSWORD_LENGTH)?;
        min_length("newPassword", &self.new_password, MIN_PASSWORD_LENGTH)
    }
}

impl Validatable for TotpSecretVerificationInput {
    fn validate(&self) -> Result<(), InputError> {
        required("userID", &self.user_id)?;
        totp_token("totpToken", &self.totp_token)
    }
}

impl Validatable for TotpSecretRefreshInput {
    fn validate(&self) -> Result<(), InputError> {
        required("currentPassword", &self.current_password)?;
        totp_token("totpToken", &self.totp_token)
    }
}

impl Validatable for PasswordResetTokenCreationRequestInput {}

impl Validatable for PasswordResetTokenRedemptionRequestInput {
    fn validate(&self) -> Result<(), InputError> {
        required("token", &self.token)?;
        min_length("newPassword", &self.new_password, MIN_PASSWORD_LENGTH)
    }
}

impl Validatable for ChangeActiveHouseholdInput {
    fn validate(&self) -> Result<(), InputError> {
        required("householdID", &self.household_id)
    }
}

impl Validatable for HouseholdCreationRequestInput {
    fn validate(&self) -> Result<(), InputError> {
        required("name", &self.name)
    }
}

impl Validatable for HouseholdUpdateRequestInput {
    fn validate(&self) -> Result<(), InputError> {
        if self.is_empty() {
            return Err(InputError::invalid("update must change at least one field"));
        }
        if let Some(name) = &self.name {
            required("name", name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_rules() {
        assert!(UserLoginInput::new("cook", "hunter222").validate().is_ok());
        assert!(UserLoginInput::new("abc", "hunter222").validate().is_err());
        assert!(UserLoginInput::new("cook", "short").validate().is_err());
        assert!(UserLoginInput::new("cook", "hunter222")
            .with_totp_token("12a456")
            .validate()
            .is_err());
    }

    #[test]
    fn test_password_update_rejects_same_password() {
        let input = PasswordUpdateInput {
            new_password: "correct horse".into(),
            current_password: "correct horse".into(),
            totp_token: "123456".into(),
        };
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("same as the current"));
    }

    #[test]
    fn test_totp_verification_rules() {
        let input = TotpSecretVerificationInput {
            totp_token: "123456".into(),
            user_id: "u1".into(),
        };
        assert!(input.validate().is_ok());

        let input = TotpSecretVerificationInput {
            totp_token: "1234567".into(),
            user_id: "u1".into(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_unit_is_always_valid() {
        assert!(().validate().is_ok());
    }

    #[test]
    fn test_household_update_needs_a_change() {
        assert!(HouseholdUpdateRequestInput::default().validate().is_err());
    }
}
