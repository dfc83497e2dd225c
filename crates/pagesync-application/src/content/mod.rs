//! Section content: fetch on mount, local edits, explicit save.

mod fetcher;
mod images;
mod persistence;
mod view;

pub use fetcher::ContentFetcher;
pub use images::TransientImages;
pub use persistence::PersistenceGateway;
pub use view::{ContentView, SaveStatus};

#[cfg(test)]
pub(crate) mod test_support;
