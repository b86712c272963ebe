//! Text shell for the session lifecycle.
//!
//! Renders one line per observed session transition and stops once the
//! session settles: profile resolved after a sign-in, signed-out when no
//! credentials were supplied.

use std::time::Duration;

use doorman_application::SessionController;
use doorman_domain::{AuthError, AuthUser, Credentials, SessionState};
use tokio::time::timeout;

/// How long the shell waits for the session to settle.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);

/// Renders one session state as a display line.
pub fn render_line(state: &SessionState) -> String {
    match state {
        SessionState::Unresolved => "waiting for the identity provider...".to_string(),
        SessionState::SignedOut => "signed out".to_string(),
        SessionState::SignedIn {
            user,
            profile: None,
        } => format!("signed in as {} (profile loading)", label_for(user)),
        SessionState::SignedIn {
            user,
            profile: Some(profile),
        } => format!(
            "signed in as {}",
            profile.display_label().unwrap_or_else(|| label_for(user))
        ),
    }
}

fn label_for(user: &AuthUser) -> &str {
    user.email.as_deref().unwrap_or(&user.uid)
}

/// Signs in when credentials are given, then follows transitions until
/// the session settles.
///
/// # Errors
///
/// Propagates the provider's `AuthError` when the sign-in is rejected;
/// session failures after that point (an unresolved profile, a provider
/// that never reports) only time out.
pub async fn run(
    controller: &SessionController,
    credentials: Option<Credentials>,
) -> Result<(), AuthError> {
    let mut rx = controller.subscribe();

    let expect_profile = credentials.is_some();
    if let Some(credentials) = credentials {
        controller.sign_in(&credentials).await?;
    }

    let deadline = tokio::time::Instant::now() + SETTLE_TIMEOUT;
    loop {
        let state = rx.borrow_and_update().clone();
        println!("{}", render_line(&state));

        let settled = if expect_profile {
            state.profile().is_some()
        } else {
            state.is_signed_out()
        };
        if settled {
            break;
        }

        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        match timeout(remaining, rx.changed()).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => break,
            Err(_) => {
                tracing::warn!("session did not settle before timeout");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use doorman_domain::{IdToken, Profile};
    use pretty_assertions::assert_eq;

    use super::*;

    fn user() -> AuthUser {
        AuthUser::new("u1", IdToken::new("t", None)).with_email("ada@example.com")
    }

    #[test]
    fn test_render_unresolved_is_the_loading_line() {
        assert_eq!(
            render_line(&SessionState::Unresolved),
            "waiting for the identity provider..."
        );
    }

    #[test]
    fn test_render_signed_out() {
        assert_eq!(render_line(&SessionState::SignedOut), "signed out");
    }

    #[test]
    fn test_render_pending_profile() {
        let state = SessionState::signed_in(user());
        assert_eq!(
            render_line(&state),
            "signed in as ada@example.com (profile loading)"
        );
    }

    #[test]
    fn test_render_resolved_profile_prefers_profile_name() {
        let profile: Profile = serde_json::from_value(serde_json::json!({"name": "Ada"})).unwrap();
        let mut state = SessionState::signed_in(user());
        assert!(state.attach_profile_for("u1", profile));
        assert_eq!(render_line(&state), "signed in as Ada");
    }
}
