// Pipeline orchestration
//
// One fetch, then a single sequential pass: normalize, merge, classify,
// project, rules. The graph is never shared before the build returns.

use tracing::{debug, info};

use tailgraph_api::{RawRecord, RecordSource};

use crate::classify::{TagAccumulator, classify};
use crate::config::InventoryOptions;
use crate::engine::JinjaEngine;
use crate::env::{Clock, LocalIdentity};
use crate::error::Error;
use crate::merge::{MergeContext, merge_records};
use crate::model::graph::InventoryGraph;
use crate::normalize::normalize_record;
use crate::project::project;
use crate::rules::{ExpressionEngine, RuleSet, apply_rules};

/// Builds an [`InventoryGraph`] from raw device records.
pub struct InventoryBuilder<'a, E = JinjaEngine> {
    options: &'a InventoryOptions,
    rules: &'a RuleSet,
    engine: E,
}

impl<'a> InventoryBuilder<'a, JinjaEngine> {
    pub fn new(options: &'a InventoryOptions, rules: &'a RuleSet) -> Self {
        Self {
            options,
            rules,
            engine: JinjaEngine::new(),
        }
    }
}

impl<'a, E: ExpressionEngine> InventoryBuilder<'a, E> {
    /// Swap in a different expression engine, mainly for tests.
    pub fn with_engine<F: ExpressionEngine>(self, engine: F) -> InventoryBuilder<'a, F> {
        InventoryBuilder {
            options: self.options,
            rules: self.rules,
            engine,
        }
    }

    /// Fetch records from a source and build the graph.
    pub async fn build(
        &self,
        source: &RecordSource,
        clock: &impl Clock,
        identity: &impl LocalIdentity,
    ) -> Result<(InventoryGraph, TagAccumulator), Error> {
        let records = source.fetch().await?;
        info!(count = records.len(), source = source.label(), "fetched device records");
        self.build_from_records(records, clock, identity)
    }

    /// Build the graph from already-fetched records.
    pub fn build_from_records(
        &self,
        records: Vec<RawRecord>,
        clock: &impl Clock,
        identity: &impl LocalIdentity,
    ) -> Result<(InventoryGraph, TagAccumulator), Error> {
        let normalized = records.into_iter().map(normalize_record).collect();

        let local_hostname = identity.short_hostname();
        let ctx = MergeContext {
            now: clock.now(),
            local_hostname: &local_hostname,
            options: self.options,
        };
        let hosts = merge_records(normalized, &ctx);

        let mut graph = InventoryGraph::new();
        let mut all_tags = TagAccumulator::new();

        if self.options.include_online_offline_groups {
            graph.add_group("online");
            graph.add_group("offline");
        }

        for (_, host) in hosts {
            let groups = classify(&host, self.options, &mut all_tags);
            let vars = project(&host, self.options);
            let name = host.name.clone();

            graph.add_host(host);
            for group in &groups {
                graph.add_host_to_group(&name, group);
            }
            for (var_name, value) in vars {
                graph.set_variable(&name, &var_name, value);
            }
        }

        // Tag groups exist even when every member host came later in the
        // pass; creation is idempotent so this is safe to repeat.
        if self.options.tag_groups {
            for tag in &all_tags {
                graph.add_group(tag);
            }
        }

        apply_rules(&self.engine, self.rules, &mut graph, self.options.strict)?;

        debug!(
            hosts = graph.host_count(),
            groups = graph.group_count(),
            "inventory build complete"
        );
        Ok((graph, all_tags))
    }
}
