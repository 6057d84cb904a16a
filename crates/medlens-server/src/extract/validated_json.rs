//! [`ValidateJson`]: deserialization followed by `validator` checks.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor that runs [`Validate::validate`] on the decoded value.
///
/// Also see [`Json`].
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self::new(data))
    }
}

fn format_range_error(
    field: &str,
    params: &HashMap<Cow<'static, str>, serde_json::Value>,
) -> String {
    let number = |value: &serde_json::Value| value.as_f64().unwrap_or_default();

    match (params.get("min"), params.get("max")) {
        (Some(min), Some(max)) => format!(
            "Field '{}' must be between {} and {}",
            field,
            number(min),
            number(max)
        ),
        (Some(min), None) => format!("Field '{}' must be at least {}", field, number(min)),
        (None, Some(max)) => format!("Field '{}' must be at most {}", field, number(max)),
        _ => format!("Field '{}' is out of valid range", field),
    }
}

fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return format!("Field '{}': {}", field, custom_message);
    }

    match error.code.as_ref() {
        "range" => format_range_error(field, &error.params),
        "required" => format!("Field '{}' is required", field),
        code => format!("Field '{}' failed validation: {}", field, code),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();
        error_messages.sort();

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed".to_string(),
            [single_error] => single_error.clone(),
            multiple => multiple.join(". "),
        };

        tracing::warn!(
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_resource("request")
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Json::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use validator::ValidationError;

    use super::*;

    #[test]
    fn range_error_names_the_bound() {
        let mut error = ValidationError::new("range");
        error.add_param(Cow::Borrowed("min"), &1);

        assert_eq!(
            format_validation_error("max_length", &error),
            "Field 'max_length' must be at least 1"
        );
    }

    #[test]
    fn validation_errors_become_bad_request() {
        let mut errors = ValidationErrors::new();
        errors.add("max_length", ValidationError::new("range"));

        let error = Error::from(errors);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("request"));
        assert_eq!(
            error.message(),
            Some("Field 'max_length' is out of valid range")
        );
    }
}
