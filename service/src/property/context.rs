//! Request [`Context`] of a properties resolution.

use serde_json::Value;

use crate::domain::{tenant, user, Tenant, User};

/// Context a [`User`] is being projected in.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Context {
    /// Incoming [`Request`].
    pub request: Request,

    /// [`Tenant`] the request is scoped to, if any.
    ///
    /// Tenant-scoped properties resolve to `null` without it.
    pub tenant: Option<Tenant>,

    /// API [`Route`] the request came through, if any.
    pub route: Option<Route>,
}

/// Incoming request.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Request {
    /// ID of the [`User`] performing the request, if authenticated.
    pub actor: Option<user::Id>,

    /// Base URL the request was addressed to, like `https://example.com`.
    pub base_url: Option<String>,
}

/// API route metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Route {
    /// Path of the [`Tenant`] in URLs.
    pub tenant_path: tenant::Path,

    /// API version, like `v1`.
    pub api_version: String,

    /// Collection [`User`]s are exposed under, like `users`.
    pub collection: String,
}

/// Builds the API link to the provided [`User`].
///
/// `null` unless both the [`Route`] and the [`Request::base_url`] are known.
pub(super) fn href(user: &User, ctx: &Context) -> Value {
    let (Some(base_url), Some(route)) =
        (ctx.request.base_url.as_deref(), ctx.route.as_ref())
    else {
        return Value::Null;
    };
    format!(
        "{}/{}/api/{}/{}/{}",
        base_url.trim_end_matches('/'),
        route.tenant_path,
        route.api_version,
        route.collection,
        user.id,
    )
    .into()
}

#[cfg(test)]
mod spec {
    use serde_json::{json, Value};

    use crate::domain::user::spec::user;

    use super::{href, Context, Request, Route};

    fn route() -> Route {
        Route {
            tenant_path: "journal".into(),
            api_version: "v1".into(),
            collection: "users".into(),
        }
    }

    #[test]
    fn builds_href() {
        let ctx = Context {
            request: Request {
                actor: None,
                base_url: Some("https://example.com/".into()),
            },
            tenant: None,
            route: Some(route()),
        };

        assert_eq!(
            href(&user(), &ctx),
            json!("https://example.com/journal/api/v1/users/1"),
        );
    }

    #[test]
    fn href_is_null_without_route_or_base_url() {
        let no_route = Context {
            request: Request {
                actor: None,
                base_url: Some("https://example.com".into()),
            },
            ..Context::default()
        };
        let no_base_url = Context {
            route: Some(route()),
            ..Context::default()
        };

        assert_eq!(href(&user(), &no_route), Value::Null);
        assert_eq!(href(&user(), &no_base_url), Value::Null);
    }
}
