use std::sync::Arc;

use anyhow::Context;

use crate::module::{InitCtx, Migration, Module};

/// Catalog modules in the order they were registered
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Arc<dyn Module>) {
        tracing::debug!(module = module.name(), "registering module");
        self.modules.push(module);
    }

    pub fn modules(&self) -> impl Iterator<Item = &Arc<dyn Module>> {
        self.modules.iter()
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|module| module.name()).collect()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Run every module's `init`, stopping at the first failure
    pub async fn init_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(modules = ?self.module_names(), "initializing modules");

        for module in &self.modules {
            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Every module's migrations paired with the owning module name.
    ///
    /// Sorted by migration id rather than registration order, so referenced
    /// tables exist before the tables whose foreign keys point at them.
    pub fn collect_migrations(&self) -> Vec<(&'static str, Migration)> {
        let mut migrations: Vec<_> = self
            .modules
            .iter()
            .flat_map(|module| {
                let owner = module.name();
                module
                    .migrations()
                    .into_iter()
                    .map(move |migration| (owner, migration))
            })
            .collect();

        migrations.sort_by(|a, b| a.1.cmp(&b.1));
        migrations
    }
}
