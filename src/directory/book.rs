use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::store::{KeyValueStore, StoreError};
use super::types::{default_contacts, Contact, DirectorySnapshot, NewContact, UserProfile};

/// Profile and contact list, persisted after every change.
pub struct UserDirectory {
    store: Box<dyn KeyValueStore>,
    namespace: String,
    profile: UserProfile,
    contacts: Vec<Contact>,
}

impl UserDirectory {
    /// Loads both documents, falling back to defaults for any that is missing.
    pub fn open(store: Box<dyn KeyValueStore>, namespace: &str) -> Result<Self, StoreError> {
        let mut directory = Self {
            store,
            namespace: namespace.to_string(),
            profile: UserProfile::default(),
            contacts: default_contacts(),
        };

        if let Some(profile) = directory.load(&directory.profile_key())? {
            directory.profile = profile;
        }
        if let Some(contacts) = directory.load(&directory.contacts_key())? {
            directory.contacts = contacts;
        }
        Ok(directory)
    }

    pub fn profile_key(&self) -> String {
        format!("{}_profile", self.namespace)
    }

    pub fn contacts_key(&self) -> String {
        format!("{}_contacts", self.namespace)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        DirectorySnapshot {
            profile: self.profile.clone(),
            contacts: self.contacts.clone(),
        }
    }

    pub fn update_profile(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        self.profile = profile;
        let key = self.profile_key();
        let json = to_json(&key, &self.profile)?;
        self.store.put(&key, &json)
    }

    /// Returns the id assigned to the new contact.
    pub fn add_contact(&mut self, contact: NewContact) -> Result<String, StoreError> {
        let contact = contact.with_fresh_id();
        let id = contact.id.clone();
        self.contacts.push(contact);
        self.save_contacts()?;
        Ok(id)
    }

    /// Returns whether a contact with that id existed.
    pub fn remove_contact(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        let removed = self.contacts.len() != before;
        self.save_contacts()?;
        Ok(removed)
    }

    /// Replaces the fields of the contact with `id`, keeping the id.
    pub fn update_contact(&mut self, id: &str, contact: NewContact) -> Result<bool, StoreError> {
        let mut found = false;
        for existing in self.contacts.iter_mut().filter(|c| c.id == id) {
            *existing = contact.clone().with_id(id.to_string());
            found = true;
        }
        self.save_contacts()?;
        Ok(found)
    }

    fn save_contacts(&mut self) -> Result<(), StoreError> {
        let key = self.contacts_key();
        let json = to_json(&key, &self.contacts)?;
        self.store.put(&key, &json)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key)? else {
            debug!(key, "no stored document, using defaults");
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                key: key.to_string(),
                source,
            })
    }
}

fn to_json<T: Serialize>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}
