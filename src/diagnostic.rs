//! Turns a failed SEMP call into the details the broker reported.

use std::fmt;

use crate::error::TransportError;
use crate::semp::models::SempMetaOnlyResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    pub http_status: Option<u16>,
    pub code: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,
}

/// Never fails: a body that is missing or not a SEMP error envelope leaves
/// the broker fields empty.
pub fn classify(err: &TransportError) -> Diagnostic {
    let mut diagnostic = Diagnostic {
        http_status: err.status(),
        ..Diagnostic::default()
    };

    let Some(body) = err.body() else {
        return diagnostic;
    };

    match serde_json::from_str::<SempMetaOnlyResponse>(body) {
        Ok(response) => {
            if let Some(error) = response.meta.error {
                diagnostic.code = error.code;
                diagnostic.status = error.status;
                diagnostic.description = error.description;
            }
        }
        Err(e) => tracing::debug!("Unparseable SEMP error body: {}", e),
    }
    diagnostic
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error during operation. Details:")?;
        writeln!(f, "HTTP Status Code: {}", or_unknown(self.http_status))?;
        writeln!(f, "SEMP Error Code: {}", or_unknown(self.code))?;
        writeln!(f, "SEMP Error Status: {}", or_unknown(self.status.as_deref()))?;
        write!(f, "SEMP Error Descriptions: {}", or_unknown(self.description.as_deref()))
    }
}

fn or_unknown<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string())
}

// ==========================================
// TESTS
// ==========================================
