// src/validation.rs

//! Extractors that deserialize a request part and then run `validator` rules on it,
//! turning failures into the field error array clients expect.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, FieldError};

/// Flattens validator output into one entry per failed rule, ordered by field name.
pub fn field_errors(errors: &ValidationErrors, location: &'static str) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldError {
                location,
                param: field.to_string(),
                msg: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
                value: err.params.get("value").cloned(),
            })
        })
        .collect();
    out.sort_by(|a, b| a.param.cmp(&b.param));
    out
}

/// JSON body extractor with validation.
pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            let web::Json(data) = json
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            data.validate()
                .map_err(|e| AppError::Validation(field_errors(&e, "body")))?;
            Ok(ValidatedJson(data))
        })
    }
}

/// Query string extractor with validation.
pub struct ValidatedQuery<T>(pub T);

impl<T> FromRequest for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
{
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = web::Query::<T>::from_query(req.query_string())
            .map_err(|e| AppError::BadRequest(e.to_string()))
            .and_then(|web::Query(data)| {
                data.validate()
                    .map_err(|e| AppError::Validation(field_errors(&e, "query")))?;
                Ok(ValidatedQuery(data))
            });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[validate(email(message = "Enter a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "Password is required"))]
        password: String,
    }

    #[test]
    fn collects_errors_sorted_by_field() {
        let form = Form {
            email: "nope".into(),
            password: String::new(),
        };
        let errors = field_errors(&form.validate().unwrap_err(), "body");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].param, "email");
        assert_eq!(errors[0].msg, "Enter a valid email");
        assert_eq!(errors[0].location, "body");
        assert_eq!(errors[1].param, "password");
        assert_eq!(errors[1].msg, "Password is required");
    }

    #[test]
    fn valid_form_passes() {
        let form = Form {
            email: "a@example.com".into(),
            password: "x".into(),
        };
        assert!(form.validate().is_ok());
    }
}
