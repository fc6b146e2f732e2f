use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub is_emergency: bool,
}

/// A contact before the directory has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub is_emergency: bool,
}

impl NewContact {
    pub fn with_fresh_id(self) -> Contact {
        self.with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(self, id: String) -> Contact {
        Contact {
            id,
            name: self.name,
            phone: self.phone,
            is_emergency: self.is_emergency,
        }
    }
}

/// What the kernel needs to know about the user to build an alert.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub profile: UserProfile,
    pub contacts: Vec<Contact>,
}

pub fn default_contacts() -> Vec<Contact> {
    vec![Contact {
        id: "1".to_string(),
        name: "Emergency Services".to_string(),
        phone: "112".to_string(),
        is_emergency: true,
    }]
}
