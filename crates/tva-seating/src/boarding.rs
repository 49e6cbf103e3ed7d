use crate::BoardingMap;

/// Boarding-point labels, one entry per roster passenger.
///
/// Labels are stored as given. Completeness is judged on the trimmed label,
/// so an all-whitespace label counts as missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardingAssignment {
    roster_ids: Vec<String>,
    map: BoardingMap,
}

impl BoardingAssignment {
    /// One empty entry per passenger id.
    pub fn new<I, S>(roster_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roster_ids: Vec<String> = roster_ids.into_iter().map(Into::into).collect();
        let map = roster_ids
            .iter()
            .map(|id| (id.clone(), String::new()))
            .collect();
        Self { roster_ids, map }
    }

    /// Overwrite the label for `passenger_id`. Returns `false` (and changes
    /// nothing) for an id outside the roster.
    pub fn update_boarding_point(&mut self, passenger_id: &str, label: impl Into<String>) -> bool {
        match self.map.get_mut(passenger_id) {
            Some(slot) => {
                *slot = label.into();
                true
            }
            None => false,
        }
    }

    pub fn label(&self, passenger_id: &str) -> Option<&str> {
        self.map.get(passenger_id).map(String::as_str)
    }

    /// True iff every roster passenger has a non-blank label.
    pub fn can_generate(&self) -> bool {
        self.missing().is_empty()
    }

    /// Roster ids (in roster order) still lacking a usable label.
    pub fn missing(&self) -> Vec<&str> {
        self.roster_ids
            .iter()
            .filter(|id| {
                self.map
                    .get(id.as_str())
                    .map_or(true, |label| label.trim().is_empty())
            })
            .map(String::as_str)
            .collect()
    }

    pub fn map(&self) -> &BoardingMap {
        &self.map
    }
}
