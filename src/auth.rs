use std::fmt;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};

use crate::errors::AppError;

/// Shared secret that admin callers present as a bearer token. Issuing it is
/// somebody else's job; this service only checks it.
#[derive(Clone)]
pub struct AdminToken(String);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Every byte of the longer input is compared, so timing does not show
    /// where the two first differ. It does follow the longer length.
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = candidate.as_bytes();
        let len = expected.len().max(candidate.len());
        let mut diff = expected.len() ^ candidate.len();
        for i in 0..len {
            let a = expected.get(i).copied().unwrap_or(0);
            let b = candidate.get(i).copied().unwrap_or(0);
            diff |= usize::from(a ^ b);
        }
        diff == 0
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(***)")
    }
}

/// Extractor that only succeeds for requests carrying the admin token.
#[derive(Debug)]
pub struct AdminGuard;

impl FromRequest for AdminGuard {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<AdminGuard, AppError> {
    let Some(token) = req.app_data::<web::Data<AdminToken>>() else {
        log::error!("Admin token missing from application data");
        return Err(AppError::Internal("admin token not configured".to_string()));
    };

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(candidate) if token.matches(candidate) => Ok(AdminGuard),
        _ => {
            log::warn!("Rejected admin request to {}", req.path());
            Err(AppError::Unauthorized)
        }
    }
}
