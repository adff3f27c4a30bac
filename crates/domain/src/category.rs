use crate::shared::entity::{Entity, ID};

/// A named tag that `Appointment`s can be grouped by. Names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: ID,
    pub name: String,
}

impl Category {
    /// Returns `None` if the name is blank
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            id: Default::default(),
            name: name.to_string(),
        })
    }
}

impl Entity for Category {
    fn id(&self) -> &ID {
        &self.id
    }
}
