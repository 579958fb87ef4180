use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use futures::future;

use crate::event::PluginFuture;
use crate::plugin_system::error::PluginError;
use crate::plugin_system::factory::{FactoryCatalog, factory};
use crate::plugin_system::manager::{DefaultPluginManager, PluginManager};
use crate::plugin_system::traits::Plugin;

struct NamedPlugin {
    name: String,
}

impl Plugin for NamedPlugin {
    fn name(&self) -> &str {
        &self.name
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn manager_with(names: &[&str]) -> DefaultPluginManager {
    let mut catalog = FactoryCatalog::new();
    for name in names {
        let owned = name.to_string();
        catalog
            .register(factory(owned.clone(), move || {
                Ok(Arc::new(NamedPlugin {
                    name: owned.clone(),
                }))
            }))
            .unwrap();
    }
    DefaultPluginManager::new(catalog)
}

async fn load_all(manager: &DefaultPluginManager, names: &[&str]) {
    for name in names {
        manager
            .load_from_text(&format!("class {name}:\n    pass\n"))
            .await
            .unwrap();
    }
}

fn recording_op(
    visited: Arc<StdMutex<Vec<String>>>,
) -> impl for<'a> FnMut(&'a dyn Plugin) -> PluginFuture<'a> {
    move |plugin: &dyn Plugin| {
        let visited = Arc::clone(&visited);
        let name = plugin.name().to_string();
        Box::pin(async move {
            tokio::task::yield_now().await;
            visited.lock().unwrap().push(name);
            Ok(())
        })
    }
}

#[tokio::test]
async fn broadcast_visits_every_plugin_in_registration_order() {
    let manager = manager_with(&["A", "B", "C"]);
    load_all(&manager, &["A", "B", "C"]).await;

    let visited = Arc::new(StdMutex::new(Vec::new()));
    let recorder = Arc::clone(&visited);
    manager
        .events()
        .broadcast(move |plugin| {
            recorder.lock().unwrap().push(plugin.name().to_string());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(*visited.lock().unwrap(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn broadcast_failure_halts_the_remaining_broadcast() {
    let manager = manager_with(&["A", "B", "C"]);
    load_all(&manager, &["A", "B", "C"]).await;

    let visited = Arc::new(StdMutex::new(Vec::new()));
    let recorder = Arc::clone(&visited);
    let error = manager
        .events()
        .broadcast(move |plugin| {
            recorder.lock().unwrap().push(plugin.name().to_string());
            if plugin.name() == "B" {
                return Err(PluginError::Operation {
                    plugin_id: plugin.name().to_string(),
                    message: "refused".to_string(),
                });
            }
            Ok(())
        })
        .await
        .unwrap_err();

    assert!(matches!(error, PluginError::Operation { .. }));
    assert_eq!(*visited.lock().unwrap(), vec!["A", "B"]);
}

#[tokio::test]
async fn broadcast_over_an_empty_repository_is_a_no_op() {
    let manager = manager_with(&["A"]);
    let calls = AtomicUsize::new(0);
    manager
        .events()
        .broadcast(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn broadcast_async_preserves_order_across_suspension_points() {
    let manager = manager_with(&["A", "B", "C"]);
    load_all(&manager, &["A", "B", "C"]).await;

    let visited = Arc::new(StdMutex::new(Vec::new()));
    manager
        .events()
        .broadcast_async(recording_op(Arc::clone(&visited)))
        .await
        .unwrap();

    assert_eq!(*visited.lock().unwrap(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn broadcast_async_awaits_trivially_ready_operations() {
    let manager = manager_with(&["A"]);
    load_all(&manager, &["A"]).await;
    manager
        .events()
        .broadcast_async(|_: &dyn Plugin| Box::pin(future::ready(Ok(()))) as PluginFuture<'_>)
        .await
        .unwrap();
}

#[tokio::test]
async fn plugins_registered_mid_broadcast_are_not_visited() {
    let manager = Arc::new(manager_with(&["A", "B", "LateArrival"]));
    load_all(&manager, &["A", "B"]).await;

    let visited = Arc::new(StdMutex::new(Vec::new()));
    let recorder = Arc::clone(&visited);
    let loader = Arc::clone(&manager);
    manager
        .events()
        .broadcast_async(move |plugin: &dyn Plugin| {
            let recorder = Arc::clone(&recorder);
            let loader = Arc::clone(&loader);
            let name = plugin.name().to_string();
            Box::pin(async move {
                let first = { recorder.lock().unwrap().is_empty() };
                if first {
                    loader
                        .load_from_text("class LateArrival:\n    pass\n")
                        .await?;
                }
                recorder.lock().unwrap().push(name);
                Ok(())
            })
        })
        .await
        .unwrap();

    // the snapshot predates the mid-broadcast registration
    assert_eq!(*visited.lock().unwrap(), vec!["A", "B"]);
    assert_eq!(manager.plugin_count().await, 3);
}

#[tokio::test]
async fn consecutive_broadcasts_without_mutation_visit_the_same_sequence() {
    let manager = manager_with(&["C", "A", "B"]);
    load_all(&manager, &["C", "A", "B"]).await;

    let mut runs = Vec::new();
    for _ in 0..2 {
        let visited = Arc::new(StdMutex::new(Vec::new()));
        let recorder = Arc::clone(&visited);
        manager
            .events()
            .broadcast(move |plugin| {
                recorder.lock().unwrap().push(plugin.name().to_string());
                Ok(())
            })
            .await
            .unwrap();
        let run = visited.lock().unwrap().clone();
        runs.push(run);
    }
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[0], vec!["C", "A", "B"]);
}
