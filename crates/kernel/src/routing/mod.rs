//! Named route registry and URL generation.
//!
//! Routes are registered as path patterns with `{param}` placeholders.
//! Generating a URL fills the placeholders; parameters the pattern does not
//! name are appended as the query string.

use std::collections::HashMap;

use thiserror::Error;
use url::form_urlencoded;

/// Route used by the report close link.
pub const CLOSE_REPORT_ROUTE: &str = "social_content_report.close_report";
pub const USER_REGISTER_ROUTE: &str = "user.register";
pub const USER_LOGIN_ROUTE: &str = "user.login";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route \"{0}\" does not exist")]
    UnknownRoute(String),

    #[error("route \"{route}\" requires parameter \"{param}\"")]
    MissingParameter { route: String, param: String },
}

/// Registry of named routes.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    patterns: HashMap<String, String>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the routes the kernel links to.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(USER_REGISTER_ROUTE, "/user/register");
        registry.register(USER_LOGIN_ROUTE, "/user/login");
        registry.register(CLOSE_REPORT_ROUTE, "/admin/content/reports/{flagging}/close");
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
        self.patterns.insert(name.into(), pattern.into());
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// Generate the path for a route.
    ///
    /// Placeholders are filled from `params`; every other parameter, in the
    /// order given, becomes a query parameter.
    pub fn url(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let pattern = self
            .patterns
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;

        let mut path = String::with_capacity(pattern.len());
        let mut used = Vec::new();
        let mut rest = pattern.as_str();

        while let Some(open) = rest.find('{') {
            path.push_str(&rest[..open]);
            let Some(close) = rest[open..].find('}') else {
                path.push_str(&rest[open..]);
                rest = "";
                break;
            };
            let param = &rest[open + 1..open + close];
            let value = params
                .iter()
                .find(|(key, _)| *key == param)
                .map(|(_, value)| *value)
                .ok_or_else(|| RouteError::MissingParameter {
                    route: name.to_string(),
                    param: param.to_string(),
                })?;
            path.extend(form_urlencoded::byte_serialize(value.as_bytes()));
            used.push(param);
            rest = &rest[open + close + 1..];
        }
        path.push_str(rest);

        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (key, value) in params.iter().filter(|(key, _)| !used.contains(key)) {
            query.append_pair(key, value);
            has_query = true;
        }
        if has_query {
            path.push('?');
            path.push_str(&query.finish());
        }

        Ok(path)
    }
}
