use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use thiserror::Error;

use crate::view::ViewLoader;

/// Pattern that matches every path. Must be the last descriptor.
pub const CATCH_ALL: &str = "*";

// ── Meta ────────────────────────────────────────────────────────────

/// Free-form route metadata (`title`, permission hints, …).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta(BTreeMap<String, Value>);

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Display title of the page, if configured.
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }
}

// ── RouteDescriptor ─────────────────────────────────────────────────

pub enum RouteTarget {
    View(ViewLoader),
    Redirect(String),
}

/// One entry of the route table.
pub struct RouteDescriptor {
    pub path: String,
    /// Required for view routes; also the key of the view cache.
    pub name: Option<String>,
    pub target: RouteTarget,
    pub meta: Meta,
}

impl RouteDescriptor {
    pub fn view(path: impl Into<String>, name: impl Into<String>, loader: ViewLoader) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            target: RouteTarget::View(loader),
            meta: Meta::new(),
        }
    }

    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            target: RouteTarget::Redirect(to.into()),
            meta: Meta::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key, value);
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_meta("title", title.into())
    }

    fn is_catch_all(&self) -> bool {
        self.path == CATCH_ALL
    }
}

impl std::fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match &self.target {
            RouteTarget::View(_) => "view".to_string(),
            RouteTarget::Redirect(to) => format!("redirect -> {}", to),
        };
        f.debug_struct("RouteDescriptor")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("target", &target)
            .field("meta", &self.meta)
            .finish()
    }
}

// ── RouteSnapshot ───────────────────────────────────────────────────

/// Where the app is (or is going): the matched descriptor's identity
/// plus the concrete path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSnapshot {
    pub path: String,
    /// `None` only for the initial, not-yet-navigated location.
    pub name: Option<String>,
    pub meta: Meta,
    pub params: BTreeMap<String, String>,
}

impl RouteSnapshot {
    /// The location before the first navigation.
    pub fn initial() -> Self {
        Self {
            path: "/".to_string(),
            name: None,
            meta: Meta::new(),
            params: BTreeMap::new(),
        }
    }

    pub fn is_initial(&self) -> bool {
        self.name.is_none()
    }

    /// Name if there is one, path otherwise.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }
}

// ── RouteTable ──────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("duplicate route name '{0}'")]
    DuplicateName(String),

    #[error("view route '{0}' has no name")]
    UnnamedView(String),

    #[error("catch-all route must be last (found at position {0})")]
    CatchAllNotLast(usize),

    #[error("redirect from '{from}' loops back through '{via}'")]
    RedirectLoop { from: String, via: String },

    #[error("redirect from '{from}' to '{to}' matches no route")]
    DanglingRedirect { from: String, to: String },
}

/// A path matched against the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub index: usize,
    pub params: BTreeMap<String, String>,
}

/// Ordered, validated route descriptors.
///
/// Validation guarantees: names are unique, the catch-all (if any) is
/// last, and every redirect chain ends on a view route.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RouteTableError> {
        let mut names = HashSet::new();
        for (i, route) in routes.iter().enumerate() {
            if route.is_catch_all() && i + 1 != routes.len() {
                return Err(RouteTableError::CatchAllNotLast(i));
            }
            match (&route.name, &route.target) {
                (Some(name), _) => {
                    if !names.insert(name.clone()) {
                        return Err(RouteTableError::DuplicateName(name.clone()));
                    }
                }
                (None, RouteTarget::View(_)) => {
                    return Err(RouteTableError::UnnamedView(route.path.clone()));
                }
                (None, RouteTarget::Redirect(_)) => {}
            }
        }

        let table = Self { routes };
        table.check_redirects()?;
        Ok(table)
    }

    /// Follow every redirect statically; each chain must reach a view.
    fn check_redirects(&self) -> Result<(), RouteTableError> {
        for route in &self.routes {
            let RouteTarget::Redirect(first) = &route.target else {
                continue;
            };
            let mut seen = HashSet::from([route.path.clone()]);
            let mut to = normalize(first);
            loop {
                let Some(m) = self.resolve(&to) else {
                    return Err(RouteTableError::DanglingRedirect {
                        from: route.path.clone(),
                        to,
                    });
                };
                let next = &self.routes[m.index];
                match &next.target {
                    RouteTarget::View(_) => break,
                    RouteTarget::Redirect(again) => {
                        if !seen.insert(next.path.clone()) {
                            return Err(RouteTableError::RedirectLoop {
                                from: route.path.clone(),
                                via: to,
                            });
                        }
                        to = normalize(again);
                    }
                }
            }
        }
        Ok(())
    }

    /// First descriptor matching `path`, in table order.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize(path);
        let segments: Vec<&str> = split(&path).collect();
        self.routes.iter().enumerate().find_map(|(index, route)| {
            if route.is_catch_all() {
                return Some(RouteMatch {
                    index,
                    params: BTreeMap::new(),
                });
            }
            match_pattern(&route.path, &segments).map(|params| RouteMatch { index, params })
        })
    }

    pub fn get(&self, index: usize) -> Option<&RouteDescriptor> {
        self.routes.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.name.as_deref() == Some(name))
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Canonical form of a location: leading slash, no trailing slash, no
/// empty segments, query and fragment stripped.
pub fn normalize(path: &str) -> String {
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    let joined = split(path).collect::<Vec<_>>().join("/");
    format!("/{}", joined)
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<BTreeMap<String, String>> {
    let parts: Vec<&str> = split(pattern).collect();
    if parts.len() != segments.len() {
        return None;
    }
    let mut params = BTreeMap::new();
    for (part, segment) in parts.iter().zip(segments) {
        match part.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), segment.to_string());
            }
            None if part == segment => {}
            None => return None,
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::view::{loader, LoadError, View};

    fn never() -> ViewLoader {
        loader(|| async { Err::<Arc<dyn View>, _>(LoadError::new("unused")) })
    }

    fn table() -> RouteTable {
        RouteTable::new(vec![
            RouteDescriptor::view("/", "Dashboard", never()).with_title("仪表板"),
            RouteDescriptor::view("/products", "Products", never()).with_title("产品管理"),
            RouteDescriptor::view("/orders/:id", "OrderDetail", never()),
            RouteDescriptor::redirect("/home", "/"),
            RouteDescriptor::redirect(CATCH_ALL, "/"),
        ])
        .unwrap()
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("products"), "/products");
        assert_eq!(normalize("/products/"), "/products");
        assert_eq!(normalize("//products//42"), "/products/42");
        assert_eq!(normalize("/products?page=2#top"), "/products");
    }

    #[test]
    fn resolve_exact_and_params() {
        let t = table();
        assert_eq!(t.resolve("/").unwrap().index, 0);
        assert_eq!(t.resolve("/products/").unwrap().index, 1);

        let m = t.resolve("/orders/17").unwrap();
        assert_eq!(m.index, 2);
        assert_eq!(m.params.get("id").map(String::as_str), Some("17"));
    }

    #[test]
    fn unknown_path_hits_catch_all() {
        let t = table();
        let m = t.resolve("/unknown-path").unwrap();
        assert_eq!(m.index, 4);
        assert!(t.resolve("/orders").is_some_and(|m| m.index == 4));
    }

    #[test]
    fn meta_title() {
        let t = table();
        assert_eq!(t.by_name("Products").unwrap().meta.title(), Some("产品管理"));
        assert_eq!(t.by_name("OrderDetail").unwrap().meta.title(), None);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = RouteTable::new(vec![
            RouteDescriptor::view("/", "Dashboard", never()),
            RouteDescriptor::view("/home", "Dashboard", never()),
        ])
        .unwrap_err();
        assert_eq!(err, RouteTableError::DuplicateName("Dashboard".to_string()));
    }

    #[test]
    fn unnamed_view_rejected() {
        let route = RouteDescriptor {
            path: "/bom".to_string(),
            name: None,
            target: RouteTarget::View(never()),
            meta: Meta::new(),
        };
        assert_eq!(
            RouteTable::new(vec![route]).unwrap_err(),
            RouteTableError::UnnamedView("/bom".to_string())
        );
    }

    #[test]
    fn catch_all_must_be_last() {
        let err = RouteTable::new(vec![
            RouteDescriptor::view("/", "Dashboard", never()),
            RouteDescriptor::redirect(CATCH_ALL, "/"),
            RouteDescriptor::view("/bom", "BOM", never()),
        ])
        .unwrap_err();
        assert_eq!(err, RouteTableError::CatchAllNotLast(1));
    }

    #[test]
    fn root_redirecting_to_itself_rejected() {
        let err = RouteTable::new(vec![
            RouteDescriptor::redirect("/", "/"),
            RouteDescriptor::redirect(CATCH_ALL, "/"),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteTableError::RedirectLoop { .. }), "{:?}", err);
    }

    #[test]
    fn catch_all_to_missing_root_rejected() {
        // Without a "/" view the catch-all would redirect to itself forever.
        let err = RouteTable::new(vec![
            RouteDescriptor::view("/products", "Products", never()),
            RouteDescriptor::redirect(CATCH_ALL, "/"),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteTableError::RedirectLoop { .. }), "{:?}", err);
    }

    #[test]
    fn dangling_redirect_rejected() {
        let err = RouteTable::new(vec![
            RouteDescriptor::view("/", "Dashboard", never()),
            RouteDescriptor::redirect("/old", "/gone"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RouteTableError::DanglingRedirect {
                from: "/old".to_string(),
                to: "/gone".to_string()
            }
        );
    }
}
