//! Tower adapter for the request timer filter.
//!
//! `RequestTimerLayer` must be the outermost layer of the router so it sees
//! every request, including the ones that fall through to the 404 fallback.
//! Each call builds a fresh `RequestContext`; axum has no async re-dispatch,
//! so every request completes in the cycle that started it.

use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum::extract::MatchedPath;
use axum::http::{Request, Response, StatusCode};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use reqtimer_core::error::StatusReadError;
use reqtimer_core::request::path_within_application;
use reqtimer_core::{Chain, MetricsSink, RequestContext, RequestTimerFilter, StatusSource};

pub struct RequestTimerLayer<S> {
    filter: Arc<RequestTimerFilter<S>>,
    context_path: Arc<str>,
}

impl<S: MetricsSink> RequestTimerLayer<S> {
    pub fn new(sink: S, context_path: impl Into<String>) -> Self {
        Self {
            filter: Arc::new(RequestTimerFilter::new(sink)),
            context_path: Arc::from(context_path.into()),
        }
    }
}

impl<S> Clone for RequestTimerLayer<S> {
    fn clone(&self) -> Self {
        Self {
            filter: Arc::clone(&self.filter),
            context_path: Arc::clone(&self.context_path),
        }
    }
}

impl<Inner, S> Layer<Inner> for RequestTimerLayer<S> {
    type Service = RequestTimerService<Inner, S>;

    fn layer(&self, inner: Inner) -> Self::Service {
        RequestTimerService {
            inner,
            filter: Arc::clone(&self.filter),
            context_path: Arc::clone(&self.context_path),
        }
    }
}

pub struct RequestTimerService<Inner, S> {
    inner: Inner,
    filter: Arc<RequestTimerFilter<S>>,
    context_path: Arc<str>,
}

impl<Inner: Clone, S> Clone for RequestTimerService<Inner, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            filter: Arc::clone(&self.filter),
            context_path: Arc::clone(&self.context_path),
        }
    }
}

impl<Inner, B, ResBody, S> Service<Request<B>> for RequestTimerService<Inner, S>
where
    Inner: Service<Request<B>, Response = Response<ResBody>> + Clone + Send + 'static,
    Inner::Future: Send + 'static,
    Inner::Error: Send + 'static,
    B: Send + 'static,
    ResBody: Send + 'static,
    S: MetricsSink + 'static,
{
    type Response = Response<ResBody>;
    type Error = Inner::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Use the service that was driven to readiness; leave a clone behind.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);

        let filter = Arc::clone(&self.filter);
        let context_path = Arc::clone(&self.context_path);
        let mut ctx = RequestContext::new(
            req.method().as_str(),
            path_within_application(req.uri().path(), &context_path),
        );

        Box::pin(async move {
            let chain = ServiceChain { inner, req, context_path };
            filter.filter(&mut ctx, chain).await.map(|r| r.0)
        })
    }
}

/// `http::Response` seen through the filter's status accessor.
pub struct TimedResponse<B>(pub Response<B>);

impl<B> StatusSource for TimedResponse<B> {
    fn status(&self) -> Result<u16, StatusReadError> {
        Ok(self.0.status().as_u16())
    }
}

/// The wrapped service as the filter's next stage.
struct ServiceChain<Inner, B> {
    inner: Inner,
    req: Request<B>,
    context_path: Arc<str>,
}

#[async_trait]
impl<Inner, B, ResBody> Chain for ServiceChain<Inner, B>
where
    Inner: Service<Request<B>, Response = Response<ResBody>> + Send,
    Inner::Future: Send,
    Inner::Error: Send,
    B: Send,
    ResBody: Send,
{
    type Response = TimedResponse<ResBody>;
    type Error = Inner::Error;

    async fn proceed(self, ctx: &mut RequestContext) -> Result<Self::Response, Self::Error> {
        let Self { mut inner, req, context_path } = self;
        let pattern = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched| route_template(matched.as_str(), &context_path));

        let response = inner.call(req).await?;
        // A path match with no handler for the method is not a route match.
        if let Some(pattern) = pattern {
            if response.status() != StatusCode::METHOD_NOT_ALLOWED {
                ctx.set_route_pattern(pattern);
            }
        }
        Ok(TimedResponse(response))
    }
}

/// Translate an axum route path into brace template form, relative to the
/// context root: `/app/users/:id/*rest` -> `/users/{id}/**`.
pub fn route_template(matched: &str, context_path: &str) -> String {
    let within = match matched.strip_prefix(context_path) {
        Some(rest) if !context_path.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => matched,
    };
    if within.is_empty() {
        return "/".to_string();
    }
    within
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if segment.starts_with('*') {
                "**".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_become_brace_variables() {
        assert_eq!(route_template("/hello/:name", ""), "/hello/{name}");
        assert_eq!(route_template("/a/:x/b/:y", ""), "/a/{x}/b/{y}");
    }

    #[test]
    fn catch_all_becomes_double_star() {
        assert_eq!(route_template("/files/*path", ""), "/files/**");
    }

    #[test]
    fn context_root_is_stripped() {
        assert_eq!(route_template("/app/hello/:name", "/app"), "/hello/{name}");
        assert_eq!(route_template("/app", "/app"), "/");
        assert_eq!(route_template("/apple/:id", "/app"), "/apple/{id}");
    }

    #[test]
    fn static_routes_are_unchanged() {
        assert_eq!(route_template("/healthz", ""), "/healthz");
        assert_eq!(route_template("/", ""), "/");
    }
}
