use pokedex_catalog::EntryKey;
use tracing::debug;

static ROOT: Route = Route::Catalog;

/// One screen on the navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Details(EntryKey),
    Favorites,
}

/// Stack of routes, the catalog is always at the bottom.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Route::Catalog],
        }
    }
}

impl Navigator {
    pub fn current(&self) -> &Route {
        // the root is never popped
        self.stack.last().unwrap_or(&ROOT)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn navigate(&mut self, route: Route) {
        self.stack.push(route);
        debug!(route = ?self.current(), depth = self.depth(), "navigated");
    }

    /// Pop the current route.
    ///
    /// Returns `false` if already at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        let left = self.stack.pop();
        debug!(?left, current = ?self.current(), "navigated back");
        true
    }
}
