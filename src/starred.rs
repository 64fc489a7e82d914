use anyhow::Result;

use crate::storage::KvStore;

pub const STARRED_KEY: &str = "starredLeagues";

/// The user's starred leagues. Membership lives in memory and every mutation
/// writes the full array back through the store, so the persisted and
/// in-memory views never drift.
#[derive(Debug, Default)]
pub struct StarredLeagues {
    ids: Vec<String>,
    generation: u64,
}

impl StarredLeagues {
    /// Loads the persisted set; absent or corrupt state starts empty.
    pub fn load(store: &KvStore) -> Self {
        let mut ids: Vec<String> = store.get_json(STARRED_KEY, Vec::new());
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        Self { ids, generation: 0 }
    }

    /// Flips membership of `id` and persists the result immediately.
    pub fn toggle(&mut self, store: &mut KvStore, id: &str) -> Result<()> {
        match self.ids.iter().position(|x| x == id) {
            Some(pos) => {
                self.ids.remove(pos);
            }
            None => self.ids.push(id.to_string()),
        }
        store.set_json(STARRED_KEY, &self.ids)?;
        self.generation += 1;
        Ok(())
    }

    pub fn is_starred(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Bumps on every successful toggle; views compare it to detect change.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
