use anyhow::Result;
use log::debug;

use crate::{
    notice::{Notice, NoticeSink},
    resolver::{Platform, Resolver},
    runtime::Runtime,
};

use super::require_url;

/// Copy the download URL for `version`/`platform` to the system clipboard.
///
/// A clipboard failure is reported as a notice, not an error: the URL has
/// already been printed and can be copied by hand.
#[tracing::instrument(skip(runtime, base_url, sink))]
pub fn copy<R: Runtime>(
    runtime: &R,
    version: &str,
    platform: Platform,
    base_url: &str,
    sink: &dyn NoticeSink,
) -> Result<()> {
    let mut resolver = Resolver::new();
    resolver.set_platform(platform);
    resolver.set_version(version);

    let url = require_url(&resolver, base_url, sink)?;
    println!("{}", url);

    match runtime.copy_to_clipboard(&url) {
        Ok(()) => sink.show(&Notice::success(
            "Copied to clipboard",
            "URL has been copied to your clipboard",
        )),
        Err(e) => {
            debug!("Clipboard write failed: {:#}", e);
            sink.show(&Notice::destructive(
                "Copy failed",
                "Could not copy text to clipboard",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::NotReady;
    use crate::notice::NoticeKind;
    use crate::resolver::DEFAULT_BASE_URL;
    use crate::runtime::MockRuntime;
    use crate::test_utils::RecordingSink;
    use mockall::predicate::eq;

    const WIN32_URL: &str = "https://storage.googleapis.com/chrome-for-testing-public/\
        131.0.6778.140/win32/chromedriver-win32.zip";

    #[test]
    fn test_copy_success() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_copy_to_clipboard()
            .with(eq(WIN32_URL))
            .times(1)
            .returning(|_| Ok(()));
        let sink = RecordingSink::default();

        copy(&runtime, "131.0.6778.140", Platform::Win32, DEFAULT_BASE_URL, &sink).unwrap();

        let notices = sink.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Success);
        assert_eq!(notices[0].title, "Copied to clipboard");
        assert_eq!(notices[0].description, "URL has been copied to your clipboard");
    }

    #[test]
    fn test_copy_failure_is_a_notice_not_an_error() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_copy_to_clipboard()
            .returning(|_| Err(anyhow::anyhow!("no clipboard utility found")));
        let sink = RecordingSink::default();

        copy(&runtime, "131.0.6778.140", Platform::Win64, DEFAULT_BASE_URL, &sink).unwrap();

        let notices = sink.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Destructive);
        assert_eq!(notices[0].title, "Copy failed");
        assert_eq!(notices[0].description, "Could not copy text to clipboard");
    }

    #[test]
    fn test_copy_invalid_version_never_touches_clipboard() {
        let mut runtime = MockRuntime::new();
        runtime.expect_copy_to_clipboard().never();
        let sink = RecordingSink::default();

        let err = copy(&runtime, "latest", Platform::Win64, DEFAULT_BASE_URL, &sink).unwrap_err();

        assert!(err.downcast_ref::<NotReady>().is_some());
        assert_eq!(sink.notices()[0].title, "Version not ready");
    }
}
