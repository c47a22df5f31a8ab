// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Error codes for the authorizer API.
///
/// Handshake failures are rendered as terminal pages by the handshake
/// handlers; refresh and accessor failures are returned to the caller, who
/// decides on user messaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Construction-time validation failed; fatal at startup.
    RequiredOptionExcluded(String),
    /// No developer credentials configured for this Canvas host.
    NoCreds(String),
    /// Refresh attempted with no launch identity on the request.
    RefreshSessionExpired,
    /// Launch identity valid but no stored refresh token to use.
    RefreshTokenMissing,
    /// The provider rejected the refresh or the transport failed.
    RefreshFailed,
    /// Accessor called with no launch identity on the request.
    GetNoSession,
    /// Accessor called before the user completed authorization.
    GetNoAuthorization,
    /// The token pack could not be persisted after a code exchange.
    StoreWrite,
}

impl AuthError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::RequiredOptionExcluded(_) => 500,
            Self::NoCreds(_) => 404,
            Self::RefreshSessionExpired => 403,
            Self::RefreshTokenMissing => 403,
            Self::RefreshFailed => 403,
            Self::GetNoSession => 403,
            Self::GetNoAuthorization => 403,
            Self::StoreWrite => 403,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredOptionExcluded(_) => "REQUIRED_OPTION_EXCLUDED",
            Self::NoCreds(_) => "NO_CREDS",
            Self::RefreshSessionExpired => "REFRESH_FAILED_SESSION_EXPIRED",
            Self::RefreshTokenMissing => "REFRESH_FAILED_TOKEN_MISSING",
            Self::RefreshFailed => "REFRESH_FAILED",
            Self::GetNoSession => "GET_FAILED_NO_SESSION",
            Self::GetNoAuthorization => "GET_FAILED_NO_AUTHORIZATION",
            Self::StoreWrite => "STORE_WRITE_FAILED",
        }
    }

    /// End-user explanation for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::RequiredOptionExcluded(detail) => {
                format!("Token manager initialized improperly: {detail}.")
            }
            Self::NoCreds(_) => {
                "We could not get your authorization with Canvas because this app \
                 is not ready to integrate with your instance of Canvas."
                    .to_owned()
            }
            Self::RefreshSessionExpired => {
                "We could not extend your Canvas authorization because your session \
                 has expired."
                    .to_owned()
            }
            Self::RefreshTokenMissing => {
                "We could not extend your Canvas authorization because your refresh \
                 credentials could not be found."
                    .to_owned()
            }
            Self::RefreshFailed => {
                "Your Canvas session could not be extended. Please contact support."
                    .to_owned()
            }
            Self::GetNoSession => {
                "We could not find the current user's access token because the \
                 current user has no session."
                    .to_owned()
            }
            Self::GetNoAuthorization => {
                "We could not find the current user's access token because the \
                 current user is not authorized."
                    .to_owned()
            }
            Self::StoreWrite => {
                "We could not get your authorization with Canvas because your \
                 credentials could not be stored."
                    .to_owned()
            }
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.as_str(), self.user_message())
    }
}

impl std::error::Error for AuthError {}
