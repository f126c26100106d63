//! Static route table and the pre-navigation guard.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteName {
    Tasks,
    TasksCreate,
    TasksEdit,
    Login,
    NotFound,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
}

#[derive(Debug)]
pub struct Route {
    pub path: &'static str,
    pub name: RouteName,
    pub meta: RouteMeta,
}

const AUTH_ONLY: RouteMeta = RouteMeta {
    requires_auth: true,
    guest_only: false,
};

const GUEST_ONLY: RouteMeta = RouteMeta {
    requires_auth: false,
    guest_only: true,
};

/// The application's routes, defined at startup and immutable thereafter.
/// `/` lands on the task listing, as in the original layout.
pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        name: RouteName::Tasks,
        meta: AUTH_ONLY,
    },
    Route {
        path: "/tasks",
        name: RouteName::Tasks,
        meta: AUTH_ONLY,
    },
    Route {
        path: "/task/create",
        name: RouteName::TasksCreate,
        meta: AUTH_ONLY,
    },
    Route {
        path: "/task/:id/edit",
        name: RouteName::TasksEdit,
        meta: AUTH_ONLY,
    },
    Route {
        path: "/login",
        name: RouteName::Login,
        meta: GUEST_ONLY,
    },
];

/// Catch-all for paths matching nothing above; carries neither flag, so the
/// guard always allows it.
pub const NOT_FOUND: Route = Route {
    path: "/:pathMatch(.*)*",
    name: RouteName::NotFound,
    meta: RouteMeta {
        requires_auth: false,
        guest_only: false,
    },
};

/// Match a concrete path against the route table. `:param` segments match any
/// single segment; unmatched paths resolve to the catch-all.
pub fn resolve(path: &str) -> &'static Route {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    ROUTES
        .iter()
        .find(|route| {
            let pattern: Vec<&str> = route.path.split('/').filter(|s| !s.is_empty()).collect();
            pattern.len() == segments.len()
                && pattern
                    .iter()
                    .zip(&segments)
                    .all(|(p, s)| p.starts_with(':') || p == s)
        })
        .unwrap_or(&NOT_FOUND)
}

/// Outcome of guarding a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Allow,
    Redirect(RouteName),
}

/// Gate a navigation against authentication state: auth-only routes bounce
/// logged-out visitors to Login, guest-only routes bounce logged-in users to
/// the task listing, everything else passes through.
pub fn guard(route: &Route, logged_in: bool) -> NavOutcome {
    if route.meta.requires_auth && !logged_in {
        return NavOutcome::Redirect(RouteName::Login);
    }

    if route.meta.guest_only && logged_in {
        return NavOutcome::Redirect(RouteName::Tasks);
    }

    NavOutcome::Allow
}

/// Resolve and guard a path in one step, deriving authentication state from
/// the session store.
pub async fn check_navigation(
    session: &dyn super::session::SessionStore,
    path: &str,
) -> NavOutcome {
    let logged_in = session.token().await.is_some();
    guard(resolve(path), logged_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_routes_redirect_logged_out_visitors_to_login() {
        for path in ["/", "/tasks", "/task/create", "/task/abc123/edit"] {
            assert_eq!(
                guard(resolve(path), false),
                NavOutcome::Redirect(RouteName::Login),
                "path {path}"
            );
        }
    }

    #[test]
    fn auth_routes_allow_logged_in_users() {
        for path in ["/tasks", "/task/create", "/task/abc123/edit"] {
            assert_eq!(guard(resolve(path), true), NavOutcome::Allow, "path {path}");
        }
    }

    #[test]
    fn login_redirects_to_tasks_when_logged_in() {
        assert_eq!(
            guard(resolve("/login"), true),
            NavOutcome::Redirect(RouteName::Tasks)
        );
    }

    #[test]
    fn login_is_allowed_when_logged_out() {
        assert_eq!(guard(resolve("/login"), false), NavOutcome::Allow);
    }

    #[test]
    fn unknown_paths_hit_the_catch_all_and_are_always_allowed() {
        for path in ["/no/such/page", "/tasks/extra/segments"] {
            let route = resolve(path);
            assert_eq!(route.name, RouteName::NotFound, "path {path}");
            assert_eq!(guard(route, false), NavOutcome::Allow);
            assert_eq!(guard(route, true), NavOutcome::Allow);
        }
    }

    #[test]
    fn edit_route_matches_any_id_segment() {
        let route = resolve("/task/550e8400-e29b-41d4-a716-446655440000/edit");
        assert_eq!(route.name, RouteName::TasksEdit);
    }
}
