// SPDX-License-Identifier: MIT

//! Role-based access control for client navigation.
//!
//! The decision logic is a pure function of (session snapshot, required
//! role) so it can be evaluated on every navigation request and unit
//! tested without any store access.

use crate::models::{Profile, UserRole};
use serde::Serialize;

/// Client-side routes the access controller knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Onboarding,
    TraineeDashboard,
    TrainerDashboard,
}

impl Route {
    /// Parse a navigation path. Unknown paths are the caller's problem.
    pub fn parse(path: &str) -> Option<Route> {
        match path {
            "/" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/onboarding" => Some(Route::Onboarding),
            "/trainee/dashboard" => Some(Route::TraineeDashboard),
            "/trainer/dashboard" => Some(Route::TrainerDashboard),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Onboarding => "/onboarding",
            Route::TraineeDashboard => "/trainee/dashboard",
            Route::TrainerDashboard => "/trainer/dashboard",
        }
    }

    /// Whether the route requires an authenticated principal.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Home | Route::Login)
    }

    /// The specific role the route requires, if any.
    pub fn required_role(&self) -> Option<UserRole> {
        match self {
            Route::TraineeDashboard => Some(UserRole::Trainee),
            Route::TrainerDashboard => Some(UserRole::Trainer),
            Route::Home | Route::Login | Route::Onboarding => None,
        }
    }
}

/// The dashboard a role lands on.
pub fn dashboard_path(role: UserRole) -> &'static str {
    match role {
        UserRole::Trainee => Route::TraineeDashboard.path(),
        UserRole::Trainer => Route::TrainerDashboard.path(),
    }
}

/// Everything the controller needs to know about the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Session or profile fetch still in flight
    pub loading: bool,
    /// Authenticated principal ID, if any
    pub principal: Option<String>,
    /// The principal's profile, if one exists
    pub profile: Option<Profile>,
}

/// Outcome of an access-control evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render a loading placeholder until session state resolves
    Loading,
    /// No principal: go sign in
    RedirectToLogin,
    /// Principal has no role yet but the route needs one
    RedirectToOnboarding,
    /// Principal has a role, but not the one this route needs
    RedirectToDashboard(UserRole),
    /// Render the requested content
    Authorized,
}

impl AccessDecision {
    /// The redirect target, if this decision is a redirect.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            AccessDecision::RedirectToLogin => Some(Route::Login.path()),
            AccessDecision::RedirectToOnboarding => Some(Route::Onboarding.path()),
            AccessDecision::RedirectToDashboard(role) => Some(dashboard_path(*role)),
            AccessDecision::Loading | AccessDecision::Authorized => None,
        }
    }
}

/// Evaluate access to a protected route.
///
/// Must be re-run whenever session or profile state changes, not just
/// once: a role can appear mid-session when onboarding completes.
pub fn evaluate(session: &SessionSnapshot, required_role: Option<UserRole>) -> AccessDecision {
    if session.loading {
        return AccessDecision::Loading;
    }

    if session.principal.is_none() {
        return AccessDecision::RedirectToLogin;
    }

    let role = session.profile.as_ref().and_then(|p| p.role);

    match (role, required_role) {
        (None, Some(_)) => AccessDecision::RedirectToOnboarding,
        (Some(actual), Some(required)) if actual != required => {
            AccessDecision::RedirectToDashboard(actual)
        }
        _ => AccessDecision::Authorized,
    }
}

/// Evaluate a full navigation request against the route table.
pub fn evaluate_route(session: &SessionSnapshot, route: Route) -> AccessDecision {
    match route {
        // The root always bounces to the login screen.
        Route::Home => AccessDecision::RedirectToLogin,
        Route::Login => AccessDecision::Authorized,
        _ => {
            if !route.requires_auth() {
                return AccessDecision::Authorized;
            }
            evaluate(session, route.required_role())
        }
    }
}

/// Serializable navigation verdict for the HTTP surface.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NavigationResponse {
    /// "render", "redirect" or "loading"
    pub action: String,
    /// Redirect target path when action is "redirect"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<AccessDecision> for NavigationResponse {
    fn from(decision: AccessDecision) -> Self {
        match decision.redirect_target() {
            Some(target) => NavigationResponse {
                action: "redirect".to_string(),
                location: Some(target.to_string()),
            },
            None => NavigationResponse {
                action: if decision == AccessDecision::Loading {
                    "loading".to_string()
                } else {
                    "render".to_string()
                },
                location: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_role(role: Option<UserRole>) -> Profile {
        let mut profile = Profile::new(
            "uid-1".to_string(),
            "user@example.com".to_string(),
            "Test User".to_string(),
        );
        profile.role = role;
        profile
    }

    fn session(principal: Option<&str>, role: Option<Option<UserRole>>) -> SessionSnapshot {
        SessionSnapshot {
            loading: false,
            principal: principal.map(|p| p.to_string()),
            profile: role.map(profile_with_role),
        }
    }

    #[test]
    fn test_loading_wins_over_everything() {
        let s = SessionSnapshot {
            loading: true,
            principal: None,
            profile: None,
        };
        assert_eq!(evaluate(&s, Some(UserRole::Trainee)), AccessDecision::Loading);
        assert_eq!(evaluate(&s, None), AccessDecision::Loading);
    }

    #[test]
    fn test_unauthenticated_redirects_to_login_for_any_route() {
        let s = session(None, None);
        for required in [None, Some(UserRole::Trainee), Some(UserRole::Trainer)] {
            assert_eq!(evaluate(&s, required), AccessDecision::RedirectToLogin);
        }
    }

    #[test]
    fn test_no_role_redirects_to_onboarding_when_role_required() {
        let s = session(Some("uid-1"), Some(None));
        assert_eq!(
            evaluate(&s, Some(UserRole::Trainee)),
            AccessDecision::RedirectToOnboarding
        );
        assert_eq!(
            evaluate(&s, Some(UserRole::Trainer)),
            AccessDecision::RedirectToOnboarding
        );
    }

    #[test]
    fn test_no_role_authorized_when_route_needs_no_role() {
        // Onboarding itself requires auth but no role
        let s = session(Some("uid-1"), Some(None));
        assert_eq!(evaluate(&s, None), AccessDecision::Authorized);
    }

    #[test]
    fn test_missing_profile_counts_as_no_role() {
        let s = session(Some("uid-1"), None);
        assert_eq!(
            evaluate(&s, Some(UserRole::Trainee)),
            AccessDecision::RedirectToOnboarding
        );
    }

    #[test]
    fn test_matching_role_is_authorized() {
        let s = session(Some("uid-1"), Some(Some(UserRole::Trainee)));
        assert_eq!(
            evaluate(&s, Some(UserRole::Trainee)),
            AccessDecision::Authorized
        );

        let s = session(Some("uid-1"), Some(Some(UserRole::Trainer)));
        assert_eq!(
            evaluate(&s, Some(UserRole::Trainer)),
            AccessDecision::Authorized
        );
    }

    #[test]
    fn test_wrong_role_redirects_to_own_dashboard() {
        let trainee = session(Some("uid-1"), Some(Some(UserRole::Trainee)));
        assert_eq!(
            evaluate(&trainee, Some(UserRole::Trainer)),
            AccessDecision::RedirectToDashboard(UserRole::Trainee)
        );
        assert_eq!(
            evaluate(&trainee, Some(UserRole::Trainer)).redirect_target(),
            Some("/trainee/dashboard")
        );

        let trainer = session(Some("uid-2"), Some(Some(UserRole::Trainer)));
        assert_eq!(
            evaluate(&trainer, Some(UserRole::Trainee)),
            AccessDecision::RedirectToDashboard(UserRole::Trainer)
        );
        assert_eq!(
            evaluate(&trainer, Some(UserRole::Trainee)).redirect_target(),
            Some("/trainer/dashboard")
        );
    }

    #[test]
    fn test_trainee_dashboard_scenarios() {
        // Linked or not, a trainee may see the trainee dashboard
        let s = session(Some("uid-1"), Some(Some(UserRole::Trainee)));
        assert_eq!(
            evaluate_route(&s, Route::TraineeDashboard),
            AccessDecision::Authorized
        );
        assert_eq!(
            evaluate_route(&s, Route::TrainerDashboard),
            AccessDecision::RedirectToDashboard(UserRole::Trainee)
        );
    }

    #[test]
    fn test_unauthenticated_trainee_dashboard_goes_to_login() {
        let s = session(None, None);
        assert_eq!(
            evaluate_route(&s, Route::TraineeDashboard),
            AccessDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_home_always_redirects_to_login() {
        let authed = session(Some("uid-1"), Some(Some(UserRole::Trainer)));
        assert_eq!(
            evaluate_route(&authed, Route::Home),
            AccessDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_login_route_is_public() {
        let s = session(None, None);
        assert_eq!(evaluate_route(&s, Route::Login), AccessDecision::Authorized);
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!(Route::parse("/trainee/dashboard"), Some(Route::TraineeDashboard));
        assert_eq!(Route::parse("/trainer/dashboard"), Some(Route::TrainerDashboard));
        assert_eq!(Route::parse("/onboarding"), Some(Route::Onboarding));
        assert_eq!(Route::parse("/nope"), None);
    }
}
