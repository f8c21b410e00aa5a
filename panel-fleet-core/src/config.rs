//! Resolver configuration

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Ordering applied to multiple reachable matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingStrategy {
    /// Purely numeric server ids, highest first; then scan order
    #[default]
    NumericDesc,
    /// Scan order only
    ScanOrder,
}

/// A subordinate-domain discovery strategy, named as in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// `SubDomain::listsubdomains`
    Subdomains,
    /// `SubDomain::list`
    SubdomainsAlt,
    /// `Addon::listaddondomains`
    Addon,
    /// `Park::listparkeddomains`
    Parked,
}

impl StrategyKind {
    pub const DEFAULT_CASCADE: [Self; 4] = [
        Self::Subdomains,
        Self::SubdomainsAlt,
        Self::Addon,
        Self::Parked,
    ];
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Subdomains => "subdomains",
            Self::SubdomainsAlt => "subdomains-alt",
            Self::Addon => "addon",
            Self::Parked => "parked",
        };
        f.write_str(name)
    }
}

fn default_true() -> bool {
    true
}

fn default_strategies() -> Vec<StrategyKind> {
    StrategyKind::DEFAULT_CASCADE.to_vec()
}

/// Tuning for inventory building and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default)]
    pub ranking: RankingStrategy,
    /// Probe each server before scanning it; failures are reported as unreachable
    #[serde(default = "default_true")]
    pub probe_before_scan: bool,
    /// Re-probe matched servers when a domain is found on more than one
    #[serde(default = "default_true")]
    pub recheck_on_ambiguity: bool,
    /// Discovery cascade, in priority order
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyKind>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ranking: RankingStrategy::default(),
            probe_before_scan: true,
            recheck_on_ambiguity: true,
            strategies: default_strategies(),
        }
    }
}

impl ResolverConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::new();
        for kind in &self.strategies {
            if !seen.insert(*kind) {
                return Err(CoreError::Config(format!(
                    "strategy '{kind}' listed more than once"
                )));
            }
        }
        Ok(())
    }
}
