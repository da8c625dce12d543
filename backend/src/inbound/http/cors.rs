//! Cross-origin policy for browser clients.

use actix_cors::Cors;

/// Which origins may call the API from a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin; responses carry `Access-Control-Allow-Origin: *`.
    #[default]
    AllowAll,
    /// Only the listed origins.
    AllowOrigins(Vec<String>),
}

impl CorsPolicy {
    /// Parse a comma-separated origin list. Blank or `*` allows every origin.
    ///
    /// # Examples
    /// ```
    /// use homestock::inbound::http::cors::CorsPolicy;
    ///
    /// assert_eq!(CorsPolicy::from_origin_list("*"), CorsPolicy::AllowAll);
    /// assert_eq!(
    ///     CorsPolicy::from_origin_list("http://localhost:5173, https://stock.example"),
    ///     CorsPolicy::AllowOrigins(vec![
    ///         "http://localhost:5173".to_owned(),
    ///         "https://stock.example".to_owned(),
    ///     ])
    /// );
    /// ```
    pub fn from_origin_list(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();
        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            Self::AllowAll
        } else {
            Self::AllowOrigins(origins)
        }
    }

    /// Middleware enforcing this policy.
    pub fn middleware(&self) -> Cors {
        let cors = match self {
            Self::AllowAll => Cors::default().allow_any_origin().send_wildcard(),
            Self::AllowOrigins(origins) => origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin)),
        };
        cors.allow_any_method().allow_any_header().max_age(3600_usize)
    }
}
