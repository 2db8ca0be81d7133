use serde::{Deserialize, Serialize};

/// A stored resource. `id` is assigned by the store on create and never changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub dob: String,
    pub phone: String,
    pub num_of_chickens: i64,
}

/// Client-submitted payload for create/update. Carries no `id`; unknown JSON
/// fields (an `id` included) are dropped during deserialization.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ResourceInput {
    pub name: String,
    pub dob: String,
    pub phone: String,
    pub num_of_chickens: i64,
}

impl ResourceInput {
    /// Sample record inserted at startup when seeding is enabled.
    pub fn sample() -> Self {
        Self {
            name: "Test Feri".into(),
            dob: "1934.04.01".into(),
            phone: "+36305544554".into(),
            num_of_chickens: 1222,
        }
    }

    pub fn into_resource(self, id: impl Into<String>) -> Resource {
        Resource {
            id: id.into(),
            name: self.name,
            dob: self.dob,
            phone: self.phone,
            num_of_chickens: self.num_of_chickens,
        }
    }
}
