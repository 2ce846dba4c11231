/// Query string of `/api/search`. `query` is accepted as an alias of `q`.
///
/// Repeated parameters keep their first value.
#[derive(Debug, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub query: Option<String>,
    pub tags: Option<String>,
}

impl SearchQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut query.q,
                "query" => &mut query.query,
                "tags" => &mut query.tags,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// First non-empty of `q` and `query`; an empty `q` falls through.
    pub fn text(&self) -> Option<&str> {
        [self.q.as_deref(), self.query.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .or(self.q.as_deref())
    }
}
