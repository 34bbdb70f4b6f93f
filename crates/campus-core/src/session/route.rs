use super::model::UserRole;
use serde::{Deserialize, Serialize};

/// Screens of the portal that are subject to the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Dashboard,
    AdminDashboard,
    Requests,
    Scholarship,
    Notifications,
    Chat,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::AdminDashboard => "/admin",
            Route::Requests => "/requests",
            Route::Scholarship => "/scholarship",
            Route::Notifications => "/notifications",
            Route::Chat => "/chat",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Where a freshly signed-in user is sent.
    pub fn landing_for(role: &UserRole) -> Route {
        if role.is_admin() {
            Route::AdminDashboard
        } else {
            Route::Dashboard
        }
    }
}

/// Outcome of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectTo(Route),
}
