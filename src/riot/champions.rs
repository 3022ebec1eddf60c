use std::collections::HashMap;

use super::types::ChampionListDto;

/// Static champion id to display name lookup.
#[derive(Debug, Clone, Default)]
pub struct ChampionTable(HashMap<i64, String>);

impl ChampionTable {
    /// Unknown ids resolve to an empty name.
    pub fn name_of(&self, champion_id: i64) -> &str {
        self.0.get(&champion_id).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, String)> for ChampionTable {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<ChampionListDto> for ChampionTable {
    fn from(list: ChampionListDto) -> Self {
        list.data
            .into_values()
            .filter_map(|champion| {
                champion
                    .key
                    .parse::<i64>()
                    .ok()
                    .map(|id| (id, champion.name))
            })
            .collect()
    }
}
