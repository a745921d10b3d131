use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::{error::AppError, validation::Fields};

/// Validated body of `POST /users`.
#[derive(Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
}

impl RegisterRequest {
    pub fn parse(body: Result<Json<Value>, JsonRejection>) -> Result<Self, AppError> {
        let mut fields = Fields::from_body(body)?;
        let email = fields.email("email");
        let username = fields.non_empty_string("username");
        fields.finish()?;
        Ok(Self { email, username })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_valid_registration() {
        let req = RegisterRequest::parse(Ok(Json(json!({
            "email": "JohnDoe@gmail.com",
            "username": "john doe",
        }))))
        .expect("valid body");
        assert_eq!(req.email, "johndoe@gmail.com");
        assert_eq!(req.username, "john doe");
    }

    #[test]
    fn rejects_bad_email_and_missing_username() {
        let err = RegisterRequest::parse(Ok(Json(json!({ "email": "nope" })))).unwrap_err();
        match err {
            AppError::InvalidInput(issues) => {
                assert!(issues.contains_key("email"));
                assert!(issues.contains_key("username"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
