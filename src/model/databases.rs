use super::database::Database;

/// Every configured connection, in configuration order.
///
/// Alias uniqueness is guaranteed by whoever builds the collection (see
/// [`Databases::from_json_str`]); lookups take the first match.
#[derive(Debug, Default)]
pub struct Databases {
    dbs: Vec<Database>,
}

impl Databases {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, db: Database) {
        self.dbs.push(db);
    }

    /// First descriptor whose alias matches; `None` when absent.
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&Database> {
        self.dbs.iter().find(|db| db.alias == alias)
    }

    #[must_use]
    pub fn get_mut(&mut self, alias: &str) -> Option<&mut Database> {
        self.dbs.iter_mut().find(|db| db.alias == alias)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dbs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dbs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Database> {
        self.dbs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Database> {
        self.dbs.iter_mut()
    }

    /// Free every descriptor and its attributes. Open handles are dropped, not
    /// disconnected through their driver; disconnect first if that matters.
    pub fn release(self) {
        drop(self);
    }
}

impl From<Vec<Database>> for Databases {
    fn from(dbs: Vec<Database>) -> Self {
        Self { dbs }
    }
}

impl FromIterator<Database> for Databases {
    fn from_iter<I: IntoIterator<Item = Database>>(iter: I) -> Self {
        Self {
            dbs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Databases {
    type Item = Database;
    type IntoIter = std::vec::IntoIter<Database>;

    fn into_iter(self) -> Self::IntoIter {
        self.dbs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Databases {
    type Item = &'a Database;
    type IntoIter = std::slice::Iter<'a, Database>;

    fn into_iter(self) -> Self::IntoIter {
        self.dbs.iter()
    }
}
