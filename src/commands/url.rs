use anyhow::Result;
use log::debug;

use crate::{
    notice::NoticeSink,
    resolver::{Platform, Resolver},
};

use super::require_url;

/// Print the download URL for a version and platform.
#[tracing::instrument(skip(base_url, sink))]
pub fn url(
    version: &str,
    platform: Platform,
    base_url: &str,
    sink: &dyn NoticeSink,
) -> Result<String> {
    let mut resolver = Resolver::new();
    resolver.set_version(version);
    let state = resolver.set_platform(platform);
    debug!("Selection {:?} is {:?}", resolver, state);

    let url = require_url(&resolver, base_url, sink)?;
    println!("{}", url);
    Ok(url)
}
