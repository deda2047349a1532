//! TravelBud library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod resolver;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Reply strategy selectable from the CLI.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResolverKind {
    /// Offline keyword rules with canned itineraries
    Local,
    /// HTTP agent gateway
    Gateway,
}

impl ResolverKind {
    /// The config-file spelling of this resolver.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverKind::Local => "local",
            ResolverKind::Gateway => "gateway",
        }
    }
}
