use crate::resource::get_base_id;
use crate::types::{Coins, ResourceId};

/// Filter for searching the transfer market.
///
/// Fields are sent as query parameters in the order `type`, `start`, `num`, `maskedDefId`,
/// followed by any other fields in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    /// The type of item to search for. Defaults to `"player"`.
    pub kind: String,
    /// Offset into the results. Defaults to 0.
    pub start: u32,
    /// The number of results. Defaults to 16.
    pub num: u32,
    /// Limit results to versions of this item. Reduced to its base ID before sending.
    pub masked_def_id: Option<ResourceId>,
    /// Any other filter fields.
    pub fields: Vec<(String, String)>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            kind: String::from("player"),
            start: 0,
            num: 16,
            masked_def_id: None,
            fields: Vec::new(),
        }
    }
}

impl SearchFilter {
    /// Creates a new [`SearchFilter`] for players.
    pub fn new() -> Self {
        Self::default()
    }

    /// The type of item, e.g. `"player"`, `"development"` or `"training"`.
    pub fn kind<T>(mut self, kind: T) -> Self
    where
        T: Into<String>,
    {
        self.kind = kind.into();
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn num(mut self, num: u32) -> Self {
        self.num = num;
        self
    }

    pub fn masked_def_id(mut self, resource_id: ResourceId) -> Self {
        self.masked_def_id = Some(resource_id);
        self
    }

    /// Adds a filter field. A field which was already added is replaced in place.
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let key = key.into();
        let value = value.to_string();

        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }

        self
    }

    /// Minimum current bid.
    pub fn min_bid(self, coins: Coins) -> Self {
        self.field("micr", coins)
    }

    /// Maximum current bid.
    pub fn max_bid(self, coins: Coins) -> Self {
        self.field("macr", coins)
    }

    /// Minimum buy now price.
    pub fn min_buy_now(self, coins: Coins) -> Self {
        self.field("minb", coins)
    }

    /// Maximum buy now price.
    pub fn max_buy_now(self, coins: Coins) -> Self {
        self.field("maxb", coins)
    }

    /// Card level, e.g. `"gold"`.
    pub fn level<T>(self, level: T) -> Self
    where
        T: ToString,
    {
        self.field("lev", level)
    }

    pub fn position<T>(self, position: T) -> Self
    where
        T: ToString,
    {
        self.field("pos", position)
    }

    pub fn nationality(self, nation_id: u32) -> Self {
        self.field("nat", nation_id)
    }

    pub fn league(self, league_id: u32) -> Self {
        self.field("leag", league_id)
    }

    pub fn team(self, team_id: u32) -> Self {
        self.field("team", team_id)
    }

    /// The query parameters for this filter. A field added with [`SearchFilter::field`] under
    /// the name of a default parameter replaces it in place.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            (String::from("type"), self.kind.clone()),
            (String::from("start"), self.start.to_string()),
            (String::from("num"), self.num.to_string()),
        ];

        if let Some(resource_id) = self.masked_def_id {
            query.push((String::from("maskedDefId"), get_base_id(resource_id).to_string()));
        }

        for (key, value) in &self.fields {
            let value = match (key.as_str(), value.parse::<ResourceId>()) {
                ("maskedDefId", Ok(resource_id)) => get_base_id(resource_id).to_string(),
                _ => value.clone(),
            };

            match query.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = value,
                None => query.push((key.clone(), value)),
            }
        }

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &[(String, String)]) -> Vec<(&str, &str)> {
        query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn defaults_to_first_page_of_players() {
        assert_eq!(
            pairs(&SearchFilter::new().to_query()),
            vec![("type", "player"), ("start", "0"), ("num", "16")],
        );
    }

    #[test]
    fn normalizes_masked_def_id() {
        let filter = SearchFilter::new()
            .masked_def_id(158023 + 3 * 0x0100_0000)
            .max_buy_now(10_000)
            .level("gold");

        assert_eq!(
            pairs(&filter.to_query()),
            vec![
                ("type", "player"),
                ("start", "0"),
                ("num", "16"),
                ("maskedDefId", "158023"),
                ("maxb", "10000"),
                ("lev", "gold"),
            ],
        );
    }

    #[test]
    fn replaces_repeated_fields() {
        let filter = SearchFilter::new()
            .max_buy_now(10_000)
            .max_buy_now(5_000);

        assert_eq!(filter.fields, vec![(String::from("maxb"), String::from("5000"))]);
    }

    #[test]
    fn fields_override_defaults() {
        let filter = SearchFilter::new()
            .field("type", "staff")
            .field("num", 5)
            .field("maskedDefId", 158023 + 3 * 0x0100_0000u64)
            .min_bid(150);

        assert_eq!(
            pairs(&filter.to_query()),
            vec![
                ("type", "staff"),
                ("start", "0"),
                ("num", "5"),
                ("maskedDefId", "158023"),
                ("micr", "150"),
            ],
        );
    }
}
