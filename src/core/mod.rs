pub mod middleware;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetails,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetails {
    pub code: u16,
    pub message: String,
    pub status: Option<String>,
}

impl ApiErrorResponse {
    pub fn display_message(&self) -> String {
        format!("{} (code: {})", self.error.message, self.error.code)
    }
}

pub async fn parse_error_response(response: reqwest::Response, default_msg: &str) -> String {
    let status = response.status();
    match response.json::<ApiErrorResponse>().await {
        Ok(error_resp) => error_resp.display_message(),
        Err(_) => format!("{}: {}", default_msg, status),
    }
}

/// Maps Identity Toolkit error codes onto user-facing messages.
///
/// Sign-in responses sometimes append detail after a colon
/// (`TOO_MANY_ATTEMPTS_TRY_LATER : ...`), so matching happens on the bare
/// code. Unknown codes return `None`; callers pick a generic fallback and
/// log the raw code.
pub fn translate_auth_code(code: &str) -> Option<&'static str> {
    let code = code.split(':').next().unwrap_or(code).trim();
    Some(match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Incorrect email or password."
        }
        "EMAIL_EXISTS" => "An account with this email already exists.",
        "USER_DISABLED" => "This account has been disabled.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.",
        "WEAK_PASSWORD" => "Password should be at least 6 characters.",
        "OPERATION_NOT_ALLOWED" => "Email/password sign-in is not enabled for this project.",
        "INVALID_EMAIL" => "The email address is badly formatted.",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_codes() {
        assert_eq!(
            translate_auth_code("INVALID_PASSWORD"),
            Some("Incorrect email or password.")
        );
        assert_eq!(
            translate_auth_code("EMAIL_EXISTS"),
            Some("An account with this email already exists.")
        );
    }

    #[test]
    fn strips_detail_suffix() {
        let msg = translate_auth_code(
            "TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled.",
        );
        assert_eq!(msg, Some("Too many attempts. Please try again later."));
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(translate_auth_code("SOMETHING_ELSE"), None);
    }

    #[test]
    fn translated_messages_never_echo_the_code() {
        for code in [
            "EMAIL_NOT_FOUND",
            "INVALID_PASSWORD",
            "INVALID_LOGIN_CREDENTIALS",
            "EMAIL_EXISTS",
            "USER_DISABLED",
            "TOO_MANY_ATTEMPTS_TRY_LATER",
            "WEAK_PASSWORD",
            "OPERATION_NOT_ALLOWED",
            "INVALID_EMAIL",
        ] {
            let msg = translate_auth_code(code).unwrap();
            assert!(!msg.contains(code), "{} leaked into {}", code, msg);
        }
    }
}
