//! Route resolution and view composition
//!
//! Navigation is a path string matched against a fixed, ordered pattern
//! table; first match wins and anything unmatched resolves to the
//! not-found route. `:name` segments bind positionally into the ephemeral
//! `RouteState`, which is discarded once the route is selected. The
//! composer then binds the data each view needs from the read-only
//! registry.

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

use crate::content::registry::{PostEntry, PostRegistry};

/// User bound to the bare `/profile` route
pub const DEFAULT_PROFILE_USER: &str = "me";

/// How many posts the home view lists under "Recent"
pub const RECENT_POSTS: usize = 3;

#[derive(Debug, Clone, Copy)]
enum RouteKind {
    Home,
    BlogList,
    PostDetail,
    ProfileDefault,
    Profile,
}

/// Fixed route table in match order; first match wins.
const ROUTE_TABLE: &[(&str, RouteKind)] = &[
    ("/", RouteKind::Home),
    ("/blog", RouteKind::BlogList),
    ("/blog/:id", RouteKind::PostDetail),
    ("/profile", RouteKind::ProfileDefault),
    ("/profile/:user", RouteKind::Profile),
];

/// A resolved route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    BlogList,
    PostDetail(String),
    Profile(String),
    NotFound,
}

/// Ephemeral navigation state, rebuilt on every navigation event
#[derive(Debug, Clone)]
pub struct RouteState {
    pub path: String,
    pub params: HashMap<String, String>,
}

impl RouteState {
    fn param(&self, name: &str) -> String {
        self.params.get(name).cloned().unwrap_or_default()
    }
}

/// Resolve a navigated path to a route
pub fn resolve(path: &str) -> Route {
    for (pattern, kind) in ROUTE_TABLE {
        if let Some(params) = match_pattern(pattern, path) {
            let state = RouteState {
                path: path.to_string(),
                params,
            };
            tracing::debug!("path {:?} matched pattern {:?}", state.path, pattern);
            return route_for(*kind, &state);
        }
    }
    Route::NotFound
}

fn route_for(kind: RouteKind, state: &RouteState) -> Route {
    match kind {
        RouteKind::Home => Route::Home,
        RouteKind::BlogList => Route::BlogList,
        RouteKind::PostDetail => Route::PostDetail(state.param("id")),
        RouteKind::ProfileDefault => Route::Profile(DEFAULT_PROFILE_USER.to_string()),
        RouteKind::Profile => Route::Profile(state.param("user")),
    }
}

/// Match a path against a single pattern, binding `:name` segments.
/// Trailing slashes are tolerated on both sides.
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_segs = segments(pattern);
    let path_segs = segments(path);
    if pattern_segs.len() != path_segs.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (expected, got) in pattern_segs.iter().zip(&path_segs) {
        if let Some(name) = expected.strip_prefix(':') {
            let value = percent_decode_str(got).decode_utf8_lossy().into_owned();
            params.insert(name.to_string(), value);
        } else if expected != got {
            return None;
        }
    }
    Some(params)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Data bound to a view, composed from the registry for a resolved route
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home { recent: Vec<PostEntry> },
    BlogList { posts: Vec<PostEntry> },
    PostDetail { id: String, entry: Option<PostEntry> },
    Profile { user: String },
    NotFound,
}

/// Bind the registry data the resolved route's view needs. A registry miss
/// for a post detail is not an error; the view renders placeholder fields.
pub fn compose(route: &Route, registry: &PostRegistry) -> View {
    match route {
        Route::Home => View::Home {
            recent: registry.entries().take(RECENT_POSTS).cloned().collect(),
        },
        Route::BlogList => View::BlogList {
            posts: registry.entries().cloned().collect(),
        },
        Route::PostDetail(id) => View::PostDetail {
            id: id.clone(),
            entry: registry.get(id).cloned(),
        },
        Route::Profile(user) => View::Profile { user: user.clone() },
        Route::NotFound => View::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_posts;

    #[test]
    fn test_fixed_route_set() {
        assert_eq!(resolve("/"), Route::Home);
        assert_eq!(resolve("/blog"), Route::BlogList);
        assert_eq!(
            resolve("/blog/thinking-prpl"),
            Route::PostDetail("thinking-prpl".to_string())
        );
        assert_eq!(resolve("/profile/john"), Route::Profile("john".to_string()));
        assert_eq!(resolve("/nonexistent"), Route::NotFound);
    }

    #[test]
    fn test_bare_profile_uses_default_user() {
        assert_eq!(resolve("/profile"), Route::Profile("me".to_string()));
    }

    #[test]
    fn test_trailing_slash_tolerated() {
        assert_eq!(resolve("/blog/"), Route::BlogList);
        assert_eq!(resolve("/profile/john/"), Route::Profile("john".to_string()));
    }

    #[test]
    fn test_deeper_paths_unmatched() {
        assert_eq!(resolve("/blog/a/b"), Route::NotFound);
        assert_eq!(resolve("/profile/john/settings"), Route::NotFound);
    }

    #[test]
    fn test_params_percent_decoded() {
        assert_eq!(
            resolve("/profile/john%20doe"),
            Route::Profile("john doe".to_string())
        );
    }

    #[test]
    fn test_compose_home_takes_recent() {
        let registry = PostRegistry::new(default_posts()).unwrap();
        match compose(&Route::Home, &registry) {
            View::Home { recent } => {
                assert_eq!(recent.len(), RECENT_POSTS);
                assert_eq!(recent[0].id, "thinking-prpl");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_compose_blog_list_keeps_order() {
        let registry = PostRegistry::new(default_posts()).unwrap();
        match compose(&Route::BlogList, &registry) {
            View::BlogList { posts } => {
                let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
                assert_eq!(ids.len(), registry.len());
                assert_eq!(ids[0], "thinking-prpl");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_compose_post_detail_miss_is_none() {
        let registry = PostRegistry::new(default_posts()).unwrap();
        let route = Route::PostDetail("unknown-post".to_string());
        match compose(&route, &registry) {
            View::PostDetail { id, entry } => {
                assert_eq!(id, "unknown-post");
                assert!(entry.is_none());
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }
}
