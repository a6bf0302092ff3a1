//! Command output: human text, or the JSON envelope with `--json`.

use portos_client::ApiResponse;
use portos_core::Money;
use serde::Serialize;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone)]
pub struct Output {
    json: bool,
    currency: String,
}

impl Output {
    pub fn new(json: bool, currency: &str) -> Self {
        Output {
            json,
            currency: currency.to_string(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with(&self.currency)
    }

    /// Prints a command result and passes its error on for the exit status.
    ///
    /// With `--json` both outcomes are printed to stdout as an envelope;
    /// otherwise `render` draws the success and the caller reports errors.
    pub fn emit<T, E>(&self, result: Result<T, E>, render: impl FnOnce(&T)) -> CliResult<()>
    where
        T: Serialize,
        E: Into<CliError>,
    {
        match result {
            Ok(data) => {
                if self.json {
                    print_json(&ApiResponse::ok(&data))?;
                } else {
                    render(&data);
                }
                Ok(())
            }
            Err(e) => {
                let err = e.into();
                if self.json {
                    print_json(&failure_envelope(&err))?;
                }
                Err(err)
            }
        }
    }
}

pub fn failure_envelope(err: &CliError) -> ApiResponse<()> {
    ApiResponse {
        success: false,
        data: None,
        error: Some(err.user_message()),
        status_code: match err {
            CliError::Client(e) => e.status_code(),
            _ => None,
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use portos_client::ClientError;
    use serde_json::json;

    #[test]
    fn test_money_uses_configured_symbol() {
        let out = Output::new(false, "Rs ");
        assert_eq!(out.money(Money::from_minor(12_050)), "Rs 120.50");
    }

    #[test]
    fn test_emit_passes_error_through() {
        let out = Output::new(false, "₹");
        let result: Result<i64, ClientError> = Err(ClientError::Unauthorized);
        let err = out.emit(result, |_| panic!("not rendered")).unwrap_err();
        assert!(matches!(err, CliError::Client(ClientError::Unauthorized)));
    }

    #[test]
    fn test_emit_renders_success() {
        let out = Output::new(false, "₹");
        let mut seen = None;
        out.emit(Ok::<_, CliError>(7), |n| seen = Some(*n)).unwrap();
        assert_eq!(seen, Some(7));
    }

    #[test]
    fn test_failure_envelope() {
        let err = CliError::from(ClientError::NotFound("Order not found".into()));
        assert_eq!(
            serde_json::to_value(failure_envelope(&err)).unwrap(),
            json!({"success": false, "error": "Order not found", "statusCode": 404})
        );
        let err = CliError::input("quantity must be a number");
        assert_eq!(failure_envelope(&err).status_code, None);
    }
}
