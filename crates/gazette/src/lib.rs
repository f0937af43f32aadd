#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Data and access to it
pub mod api;
pub mod blog;
pub mod errors;
pub mod favorites;
pub mod store;

// Helpers used by the pages, also useful on their own
pub mod dates;
pub mod markdown;
pub mod query;
pub mod share;
pub mod text;

pub mod logging;
pub mod sitemap;

#[cfg(feature = "maud")]
#[cfg_attr(docsrs, doc(cfg(feature = "maud")))]
pub mod pages;

#[cfg(feature = "maud")]
#[cfg_attr(docsrs, doc(cfg(feature = "maud")))]
pub mod site;

mod options;

pub use options::{API_URL_ENV, GazetteOptions};

/// The version of Gazette being used, as shown in the generator tag of every page.
pub const GENERATOR: &str = concat!("Gazette v", env!("CARGO_PKG_VERSION"));

/// Creates a [`store::BlogStore`] reading from the API configured in `options`.
///
/// ## Example
/// ```no_run
/// use gazette::{GazetteOptions, new_store};
///
/// let store = new_store(&GazetteOptions::default());
/// let blogs = store.all_blogs(false)?;
/// # Ok::<(), gazette::errors::StoreError>(())
/// ```
pub fn new_store(options: &GazetteOptions) -> store::BlogStore {
    store::BlogStore::new(api::HttpSource::new(
        options.api_base_url.as_str(),
        options.request_timeout,
    ))
}
