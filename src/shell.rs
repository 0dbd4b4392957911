//! Navigation shell: route table, navigation items and page titles.

use serde::Serialize;

/// A page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    Tasks,
    Risks,
    Reports,
    Chat,
    NotFound,
}

impl Route {
    /// Routes shown in the sidebar, in order.
    pub const NAV: [Route; 5] = [
        Route::Dashboard,
        Route::Tasks,
        Route::Risks,
        Route::Reports,
        Route::Chat,
    ];

    /// Resolve a request path. Unknown paths map to [`Route::NotFound`].
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/dashboard" => Route::Dashboard,
            "/tasks" => Route::Tasks,
            "/risks" => Route::Risks,
            "/reports" => Route::Reports,
            "/chat" => Route::Chat,
            _ => Route::NotFound,
        }
    }

    pub fn href(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Tasks => "/tasks",
            Route::Risks => "/risks",
            Route::Reports => "/reports",
            Route::Chat => "/chat",
            Route::NotFound => "",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Tasks => "Tasks",
            Route::Risks => "Risk alerts",
            Route::Reports => "Health reports",
            Route::Chat => "Assistant",
            Route::NotFound => "Not found",
        }
    }

    /// Icon key used by the renderer.
    pub fn icon(self) -> &'static str {
        match self {
            Route::Dashboard => "home",
            Route::Tasks => "check-square",
            Route::Risks => "alert-triangle",
            Route::Reports => "bar-chart",
            Route::Chat => "message-square",
            Route::NotFound => "help-circle",
        }
    }

    /// One-line description shown under the header.
    pub fn subtitle(self) -> &'static str {
        match self {
            Route::Dashboard => "Portfolio overview",
            Route::Tasks => "Create, track and complete work items",
            Route::Risks => "Detected risks across projects",
            Route::Reports => "Project health and delivery metrics",
            Route::Chat => "Manage your projects through conversation",
            Route::NotFound => "The requested page does not exist",
        }
    }
}

/// A sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    pub current: bool,
}

/// Sidebar entries with `current` set for the active route.
pub fn nav_items(current: Route) -> Vec<NavItem> {
    Route::NAV
        .iter()
        .map(|&route| NavItem {
            route,
            label: route.label(),
            href: route.href(),
            icon: route.icon(),
            current: route == current,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        assert_eq!(Route::from_path("/"), Route::Dashboard);
        assert_eq!(Route::from_path("/dashboard"), Route::Dashboard);
        assert_eq!(Route::from_path("/tasks/"), Route::Tasks);
        assert_eq!(Route::from_path("/risks?refresh=1"), Route::Risks);
        assert_eq!(Route::from_path("/reports"), Route::Reports);
        assert_eq!(Route::from_path("/chat"), Route::Chat);
        assert_eq!(Route::from_path("/settings"), Route::NotFound);
        assert_eq!(Route::from_path("/tasks/extra"), Route::NotFound);
    }

    #[test]
    fn test_nav_marks_exactly_one_current() {
        let items = nav_items(Route::Risks);
        assert_eq!(items.len(), 5);
        let current: Vec<_> = items.iter().filter(|i| i.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].href, "/risks");
        assert!(nav_items(Route::NotFound).iter().all(|i| !i.current));
    }

    #[test]
    fn test_titles() {
        assert_eq!(Route::from_path("/reports").label(), "Health reports");
        assert_eq!(Route::from_path("/nope").label(), "Not found");
    }
}
