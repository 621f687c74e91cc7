//! Motion context
//!
//! A [`MotionContext`] is created once per application root and handed down
//! to whatever needs to animate. It owns the configuration, the host and a
//! lazily constructed [`Animator`]:
//!
//! - the animator is built on first use, at most once;
//! - concurrent first callers await the same in-flight construction;
//! - a failed construction is logged and returned to the caller, and the
//!   next caller tries again.
//!
//! Tests substitute the animator with
//! [`with_animator_factory`](MotionContext::with_animator_factory).

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::OnceCell;
use wake_core::Host;

use crate::animator::{create_animator, Animator};
use crate::config::MotionConfig;
use crate::error::Result;

/// Builds the animator for a context
pub type AnimatorFactory =
    Arc<dyn Fn(Arc<MotionConfig>, Host) -> BoxFuture<'static, Result<Arc<dyn Animator>>> + Send + Sync>;

struct ContextInner {
    config: Arc<MotionConfig>,
    host: Host,
    factory: AnimatorFactory,
    animator: OnceCell<Arc<dyn Animator>>,
    constructions: AtomicUsize,
}

/// Shared motion configuration and animator
#[derive(Clone)]
pub struct MotionContext {
    inner: Arc<ContextInner>,
}

impl MotionContext {
    /// Context with design tokens and the host's reduced-motion preference
    pub fn new(host: Host) -> Self {
        let config = MotionConfig::detect(&host);
        Self::with_config(host, config)
    }

    /// Context with explicit tokens; the host can still force reduced motion
    pub fn with_config(host: Host, config: MotionConfig) -> Self {
        let config = config.resolve(&host);
        Self::build(host, config, default_factory())
    }

    /// Replace the animator factory (before first use)
    pub fn with_animator_factory<F>(self, factory: F) -> Self
    where
        F: Fn(Arc<MotionConfig>, Host) -> BoxFuture<'static, Result<Arc<dyn Animator>>>
            + Send
            + Sync
            + 'static,
    {
        Self::build(
            self.inner.host.clone(),
            (*self.inner.config).clone(),
            Arc::new(factory),
        )
    }

    fn build(host: Host, config: MotionConfig, factory: AnimatorFactory) -> Self {
        tracing::debug!(reduced_motion = config.reduced_motion, "motion context created");
        Self {
            inner: Arc::new(ContextInner {
                config: Arc::new(config),
                host,
                factory,
                animator: OnceCell::new(),
                constructions: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.inner.config
    }

    pub fn host(&self) -> &Host {
        &self.inner.host
    }

    pub fn reduced_motion(&self) -> bool {
        self.inner.config.reduced_motion
    }

    /// The shared animator, constructing it on first use
    pub async fn animator(&self) -> Result<Arc<dyn Animator>> {
        let inner = &self.inner;
        let result = inner
            .animator
            .get_or_try_init(|| {
                inner.constructions.fetch_add(1, Ordering::SeqCst);
                tracing::debug!("constructing animator");
                (inner.factory)(inner.config.clone(), inner.host.clone())
            })
            .await;

        match result {
            Ok(animator) => Ok(animator.clone()),
            Err(err) => {
                tracing::error!(error = %err, "animator construction failed");
                Err(err)
            }
        }
    }

    /// The animator if it was already constructed
    pub fn animator_if_ready(&self) -> Option<Arc<dyn Animator>> {
        self.inner.animator.get().cloned()
    }

    /// Number of construction attempts so far
    pub fn constructions(&self) -> usize {
        self.inner.constructions.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for MotionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionContext")
            .field("config", &self.inner.config)
            .field("ready", &self.inner.animator.initialized())
            .finish_non_exhaustive()
    }
}

fn default_factory() -> AnimatorFactory {
    Arc::new(|config, host| async move { create_animator(config, host) }.boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::NoopAnimator;
    use crate::error::MotionError;
    use wake_core::headless::HeadlessHost;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_construction() {
        let headless = HeadlessHost::new();
        let context = MotionContext::new(headless.host()).with_animator_factory(|config, host| {
            async move {
                tokio::task::yield_now().await;
                create_animator(config, host)
            }
            .boxed()
        });

        let (a, b, c) = tokio::join!(context.animator(), context.animator(), context.animator());
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert_eq!(context.constructions(), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
    }

    #[tokio::test]
    async fn test_failed_construction_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        let context = MotionContext::new(HeadlessHost::new().host()).with_animator_factory(
            move |_, _| {
                let attempt = attempts_clone.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        Err(MotionError::Unavailable("first attempt".into()))
                    } else {
                        Ok(Arc::new(NoopAnimator) as Arc<dyn Animator>)
                    }
                }
                .boxed()
            },
        );

        assert!(matches!(
            context.animator().await,
            Err(MotionError::Unavailable(_))
        ));
        assert!(context.animator_if_ready().is_none());
        assert!(context.animator().await.is_ok());
        assert_eq!(context.constructions(), 2);
    }

    #[tokio::test]
    async fn test_reduced_motion_host_yields_noop_animator() {
        let headless = HeadlessHost::new().with_reduced_motion(true);
        let context = MotionContext::new(headless.host());

        assert!(context.reduced_motion());
        assert!(context.animator().await.unwrap().is_noop());
    }

    #[tokio::test]
    async fn test_explicit_config_keeps_host_reduced_motion() {
        let headless = HeadlessHost::new().with_reduced_motion(true);
        let context = MotionContext::with_config(headless.host(), MotionConfig::default());
        assert!(context.reduced_motion());
    }
}
