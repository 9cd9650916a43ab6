use anyhow::Result;
use log::debug;

use crate::{
    detect::DetectionResult,
    notice::{Notice, NoticeSink},
    runtime::Runtime,
    session::Session,
};

use super::{config::Config, require_url};

/// Detect the browser version and bitness from the configured signals.
///
/// With `apply`, the detection is applied to an empty selection and the
/// resulting download URL is printed.
#[tracing::instrument(skip(config, sink))]
pub async fn detect<R: Runtime>(
    config: &Config<R>,
    apply: bool,
    sink: &dyn NoticeSink,
) -> Result<DetectionResult> {
    let mut session = Session::open();
    let result = session
        .detect(config.client_hints_source(), config.user_agent.as_deref())
        .await
        .cloned()
        .unwrap_or_default();

    print_detection(&result);

    if apply {
        apply_detection(&mut session, &config.base_url, sink)?;
    }

    session.close();
    Ok(result)
}

pub(crate) fn print_detection(result: &DetectionResult) {
    if result.is_empty() {
        println!("No browser information detected.");
        return;
    }
    if let Some(version) = &result.version {
        println!("Detected version: {}", version);
    }
    if let Some(bitness) = &result.bitness {
        println!("Detected arch: {}-bit", bitness);
    }
}

/// Applies the session's detection and prints the URL it leads to.
fn apply_detection(session: &mut Session, base_url: &str, sink: &dyn NoticeSink) -> Result<()> {
    match session.use_detected_info() {
        Some((applied, state)) if !applied.is_empty() => {
            debug!("Applied {:?}, selection is {:?}", applied, state);
            sink.show(&Notice::success("Detected info applied", applied.summary()));
        }
        _ => debug!("Nothing detected to apply"),
    }

    let url = require_url(session.resolver(), base_url, sink)?;
    println!("{}", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::NotReady;
    use crate::detect::JsonClientHints;
    use crate::notice::NoticeKind;
    use crate::resolver::DEFAULT_BASE_URL;
    use crate::runtime::MockRuntime;
    use crate::test_utils::RecordingSink;
    use std::path::PathBuf;

    const WIN64_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/131.0.6778.140 Safari/537.36";

    fn config(user_agent: Option<&str>, client_hints: Option<&str>) -> Config<MockRuntime> {
        Config {
            runtime: MockRuntime::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("/work"),
            user_agent: user_agent.map(str::to_string),
            client_hints: client_hints.map(JsonClientHints::new),
        }
    }

    #[tokio::test]
    async fn test_detect_from_user_agent() {
        let sink = RecordingSink::default();
        let result = detect(&config(Some(WIN64_UA), None), false, &sink)
            .await
            .unwrap();

        assert_eq!(result.version.as_deref(), Some("131.0.6778.140"));
        assert_eq!(result.bitness.as_deref(), Some("64"));
        assert!(sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_detect_prefers_client_hints() {
        let hints = r#"{"fullVersionList":[{"brand":"Chromium","version":"120.0.6099.71"}],"bitness":"32"}"#;
        let sink = RecordingSink::default();
        let result = detect(&config(Some(WIN64_UA), Some(hints)), false, &sink)
            .await
            .unwrap();

        assert_eq!(result.version.as_deref(), Some("120.0.6099.71"));
        assert_eq!(result.bitness.as_deref(), Some("32"));
    }

    #[tokio::test]
    async fn test_detect_without_signals_is_not_an_error() {
        let sink = RecordingSink::default();
        let result = detect(&config(None, Some("garbage")), false, &sink)
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(sink.notices().is_empty());
    }

    #[tokio::test]
    async fn test_detect_apply_notifies() {
        let sink = RecordingSink::default();
        detect(&config(Some(WIN64_UA), None), true, &sink)
            .await
            .unwrap();

        let notices = sink.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Success);
        assert_eq!(notices[0].title, "Detected info applied");
        assert_eq!(
            notices[0].description,
            "Version: 131.0.6778.140 • Platform: 64-bit"
        );
    }

    #[tokio::test]
    async fn test_detect_apply_without_version_is_not_ready() {
        // Bitness only: the platform is picked but there is still no version
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Gecko/20100101 Firefox/133.0";
        let sink = RecordingSink::default();
        let err = detect(&config(Some(ua), None), true, &sink)
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<NotReady>().is_some());
        let titles: Vec<_> = sink.notices().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Detected info applied", "Version not ready"]);
    }
}
