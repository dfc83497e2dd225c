//! Session resolution and the context that broadcasts it.

mod context;
mod resolver;

pub use context::SessionContext;
pub use resolver::SessionResolver;

#[cfg(test)]
pub(crate) mod test_support;
