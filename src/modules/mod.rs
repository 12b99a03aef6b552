pub mod authors;
pub mod books;

use std::sync::Arc;

use bookshelf_cache::Cache;
use bookshelf_db::Store;
use bookshelf_kernel::ModuleRegistry;

/// Register every catalogue module with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: &Store, cache: &Arc<dyn Cache>) {
    registry.register(authors::create_module(store.clone()));
    registry.register(books::create_module(store.clone(), cache.clone()));
}
