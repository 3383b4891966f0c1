//! Request and response payloads used by the session, household and
//! reference-data operations.
//!
//! Field names follow the server's camelCase wire format. Response types
//! keep unknown fields in an `extra` map so they stay opaque to this crate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginInput {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub totp_token: String,
}

impl UserLoginInput {
    /// Creates login credentials without a TOTP token.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            totp_token: String::new(),
        }
    }

    /// Adds a TOTP token.
    pub fn with_totp_token(mut self, token: impl Into<String>) -> Self {
        self.totp_token = token.into();
        self
    }
}

/// Input for changing the current user's password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateInput {
    pub new_password: String,
    pub current_password: String,
    pub totp_token: String,
}

/// Input for confirming a freshly issued TOTP secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpSecretVerificationInput {
    #[serde(rename = "totpToken")]
    pub totp_token: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

/// Input for rotating the current user's TOTP secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotpSecretRefreshInput {
    pub current_password: String,
    pub totp_token: String,
}

/// The new TOTP secret issued by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpSecretRefreshResponse {
    #[serde(rename = "qrCode", default)]
    pub two_factor_qr_code: String,
    #[serde(rename = "twoFactorSecret", default)]
    pub two_factor_secret: String,
}

/// Input for requesting a password reset email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetTokenCreationRequestInput {
    pub email_address: String,
}

/// Input for redeeming a password reset token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetTokenRedemptionRequestInput {
    pub token: String,
    pub new_password: String,
}

/// Input for switching the session's active household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeActiveHouseholdInput {
    #[serde(rename = "householdID")]
    pub household_id: String,
}

/// Input for creating a household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdCreationRequestInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address_line2: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
}

/// Input for updating a household. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdUpdateRequestInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl HouseholdUpdateRequestInput {
    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A household.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub belongs_to_user: String,
    #[serde(default)]
    pub billing_status: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A registered API client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiClient {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "clientID", default)]
    pub client_id: String,
    #[serde(rename = "belongsToUser", default)]
    pub belongs_to_user: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One entry of a user's audit trail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(rename = "relevantID", default)]
    pub relevant_id: String,
    #[serde(default)]
    pub belongs_to_user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A reference-data ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidIngredient {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub plural_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
