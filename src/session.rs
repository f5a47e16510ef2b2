//! Explicit session context.
//!
//! There is no process-wide login flag: a [`Session`] value is handed to every
//! action that needs authorization, and those actions answer
//! [`AppError::AuthRequired`] instead of proceeding.

use tracing::{info, warn, Instrument};

use crate::errors::{AppError, AppResult};
use crate::observability::session_span;
use crate::services::SessionService;

/// Whether the user has an established session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    logged_in: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { logged_in: false }
    }

    pub fn authenticated() -> Self {
        Self { logged_in: true }
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Fail with `AuthRequired` unless signed in
    pub fn require_authorized(&self) -> AppResult<()> {
        if self.logged_in {
            Ok(())
        } else {
            Err(AppError::AuthRequired)
        }
    }
}

/// Ask the session service whether we are signed in.
///
/// Any failure, including transport errors, is treated as signed out.
pub async fn establish_session<S: SessionService>(service: &S) -> Session {
    async {
        match service.check_session().await {
            Ok(true) => {
                info!("Session established");
                Session::authenticated()
            }
            Ok(false) => {
                info!("No active session");
                Session::anonymous()
            }
            Err(e) => {
                warn!(error = %e, "Session check failed, continuing signed out");
                Session::anonymous()
            }
        }
    }
    .instrument(session_span("check"))
    .await
}

/// Sign out through the session service; on success the returned session is anonymous.
pub async fn sign_out<S: SessionService>(service: &S, session: Session) -> AppResult<Session> {
    if !session.is_logged_in() {
        return Ok(session);
    }

    service
        .sign_out()
        .instrument(session_span("sign_out"))
        .await?;
    info!("Signed out");
    Ok(Session::anonymous())
}
