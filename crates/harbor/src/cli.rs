//! Builtin demo factories and output rendering for the harbor binary.
use std::any::Any;
use std::sync::Arc;

use harbor_core::plugin_system::{FactoryCatalog, factory};
use harbor_core::{DefaultPluginManager, Plugin, PluginManager};

/// Echoes whatever the host hands it. The simplest possible plugin.
struct EchoPlugin;

impl Plugin for EchoPlugin {
    fn name(&self) -> &str {
        "EchoPlugin"
    }
    fn version(&self) -> &str {
        "0.1.0"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Greets the host on broadcast.
struct GreeterPlugin;

impl Plugin for GreeterPlugin {
    fn name(&self) -> &str {
        "GreeterPlugin"
    }
    fn version(&self) -> &str {
        "0.1.0"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The factories compiled into this binary, loadable by declared name.
pub fn builtin_catalog() -> FactoryCatalog {
    let mut catalog = FactoryCatalog::new();
    let builtins = [
        factory("EchoPlugin", || Ok(Arc::new(EchoPlugin) as Arc<dyn Plugin>)),
        factory("GreeterPlugin", || {
            Ok(Arc::new(GreeterPlugin) as Arc<dyn Plugin>)
        }),
    ];
    for builtin in builtins {
        if let Err(error) = catalog.register(builtin) {
            // duplicate/incompatible builtins are a packaging bug, not a
            // runtime condition
            eprintln!("failed to register builtin factory: {error}");
            std::process::exit(1);
        }
    }
    catalog
}

/// Print the manager's registry, as JSON or a plain listing.
pub async fn render_registry(manager: &DefaultPluginManager, json: bool) {
    let infos = manager.plugin_info().await;
    if json {
        match serde_json::to_string_pretty(&infos) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => {
                eprintln!("failed to render registry as JSON: {error}");
                std::process::exit(1);
            }
        }
    } else if infos.is_empty() {
        println!("No plugins registered.");
    } else {
        println!("Registered plugins:");
        for info in infos {
            println!(
                "  - {} (type: {}, version: {})",
                info.identity, info.type_name, info.version
            );
        }
    }
}
