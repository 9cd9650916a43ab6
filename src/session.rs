//! A single view of the resolver: one selection, one detection run.
//!
//! Detection is started at most once per session and publishes its result
//! into a write-once slot. Closing the session flips a liveness flag; a
//! detection that completes afterwards is dropped instead of published.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use once_cell::sync::OnceCell;

use crate::detect::{ClientHintsSource, DetectionResult, detect_environment};
use crate::resolver::{Resolver, ValidationState};

pub struct Session {
    resolver: Resolver,
    detected: Arc<OnceCell<DetectionResult>>,
    alive: Arc<AtomicBool>,
    detection_started: AtomicBool,
}

impl Default for Session {
    fn default() -> Self {
        Self::open()
    }
}

impl Session {
    pub fn open() -> Self {
        Self {
            resolver: Resolver::new(),
            detected: Arc::new(OnceCell::new()),
            alive: Arc::new(AtomicBool::new(true)),
            detection_started: AtomicBool::new(false),
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut Resolver {
        &mut self.resolver
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the session as torn down. Pending detection results are discarded.
    pub fn close(&self) {
        debug!("Closing session");
        self.alive.store(false, Ordering::SeqCst);
    }

    /// The published detection result, if detection has finished.
    pub fn detected(&self) -> Option<&DetectionResult> {
        self.detected.get()
    }

    /// Claims the session's single detection run.
    ///
    /// Returns `None` if detection was already started for this session.
    pub fn detection_handle(&self) -> Option<DetectionHandle> {
        if self.detection_started.swap(true, Ordering::SeqCst) {
            debug!("Detection already started for this session");
            return None;
        }
        Some(DetectionHandle {
            slot: Arc::clone(&self.detected),
            alive: Arc::clone(&self.alive),
        })
    }

    /// Starts and awaits detection in place. Returns the published result.
    pub async fn detect(
        &self,
        client_hints: Option<&dyn ClientHintsSource>,
        user_agent: Option<&str>,
    ) -> Option<&DetectionResult> {
        if let Some(handle) = self.detection_handle() {
            handle.run(client_hints, user_agent).await;
        }
        self.detected()
    }

    /// Applies the published detection result to the selection.
    ///
    /// Returns the result that was applied, or `None` when nothing has been
    /// detected yet (the selection is left untouched).
    pub fn use_detected_info(&mut self) -> Option<(DetectionResult, ValidationState)> {
        let result = self.detected.get()?.clone();
        let state = self.resolver.apply_detected_info(&result);
        Some((result, state))
    }
}

/// Right to publish the session's detection result, detached from the session
/// so it can be driven from a spawned task.
pub struct DetectionHandle {
    slot: Arc<OnceCell<DetectionResult>>,
    alive: Arc<AtomicBool>,
}

impl DetectionHandle {
    /// Runs detection and publishes the result. Returns whether it was published.
    pub async fn run(
        self,
        client_hints: Option<&dyn ClientHintsSource>,
        user_agent: Option<&str>,
    ) -> bool {
        let result = detect_environment(client_hints, user_agent).await;
        self.publish(result)
    }

    /// Writes the result unless the session has been closed.
    pub fn publish(self, result: DetectionResult) -> bool {
        if !self.alive.load(Ordering::SeqCst) {
            debug!("Session closed before detection finished, dropping {:?}", result);
            return false;
        }
        self.slot.set(result).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{HighEntropyValues, MockClientHintsSource};
    use crate::resolver::Platform;
    use anyhow::Result;
    use async_trait::async_trait;
    use tokio::sync::{Mutex, oneshot};

    const WIN32_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win32) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/109.0.5414.120 Safari/537.36";

    /// Client hints that only answer once the test releases them.
    struct GatedHints {
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl ClientHintsSource for GatedHints {
        async fn high_entropy_values(&self) -> Result<HighEntropyValues> {
            if let Some(rx) = self.gate.lock().await.take() {
                let _ = rx.await;
            }
            Ok(HighEntropyValues {
                full_version_list: vec![],
                bitness: Some("64".into()),
            })
        }
    }

    #[tokio::test]
    async fn test_detect_publishes_once() {
        let session = Session::open();
        let result = session.detect(None, Some(WIN32_UA)).await.cloned();

        assert_eq!(
            result,
            Some(DetectionResult {
                version: Some("109.0.5414.120".into()),
                bitness: Some("32".into()),
            })
        );
        assert!(session.detection_handle().is_none());
    }

    #[tokio::test]
    async fn test_second_detect_does_not_query_again() {
        let mut source = MockClientHintsSource::new();
        source
            .expect_high_entropy_values()
            .times(1)
            .returning(|| Ok(HighEntropyValues::default()));

        let session = Session::open();
        session.detect(Some(&source), Some(WIN32_UA)).await;
        let again = session.detect(Some(&source), None).await.cloned();

        assert_eq!(again.and_then(|r| r.bitness).as_deref(), Some("32"));
    }

    #[test]
    fn test_publish_after_close_is_dropped() {
        let session = Session::open();
        let handle = session.detection_handle().unwrap();

        session.close();
        let published = handle.publish(DetectionResult {
            version: Some("120.0.0.1".into()),
            bitness: None,
        });

        assert!(!published);
        assert!(!session.is_alive());
        assert_eq!(session.detected(), None);
    }

    #[tokio::test]
    async fn test_close_while_detection_is_pending() {
        let (tx, rx) = oneshot::channel();
        let hints = Arc::new(GatedHints {
            gate: Mutex::new(Some(rx)),
        });

        let session = Session::open();
        let handle = session.detection_handle().unwrap();

        let task_hints = Arc::clone(&hints);
        let task = tokio::spawn(async move {
            handle
                .run(Some(task_hints.as_ref() as &dyn ClientHintsSource), None)
                .await
        });

        session.close();
        tx.send(()).unwrap();

        assert!(!task.await.unwrap());
        assert_eq!(session.detected(), None);
    }

    #[tokio::test]
    async fn test_detection_does_not_touch_selection_until_applied() {
        let mut session = Session::open();
        session.resolver_mut().set_version("131.0.6778.140");

        session.detect(None, Some(WIN32_UA)).await;
        assert_eq!(session.resolver().version(), "131.0.6778.140");
        assert_eq!(session.resolver().platform(), Platform::Win64);

        let (applied, state) = session.use_detected_info().unwrap();
        assert_eq!(applied.version.as_deref(), Some("109.0.5414.120"));
        assert_eq!(state, ValidationState::Ready);
        assert_eq!(session.resolver().version(), "109.0.5414.120");
        assert_eq!(session.resolver().platform(), Platform::Win32);
    }

    #[test]
    fn test_use_detected_info_before_detection_is_noop() {
        let mut session = Session::open();
        session.resolver_mut().set_version("1.2.3.4");
        assert!(session.use_detected_info().is_none());
        assert_eq!(session.resolver().version(), "1.2.3.4");
    }
}
