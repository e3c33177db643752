//! Normalization of zero-or-more client registrations

use crate::types::{ClientOptions, ClientRegistration};

/// Zero, one or many client registrations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientRegistrations(Vec<ClientRegistration>);

impl ClientRegistrations {
    /// No clients
    pub fn none() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientRegistration> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ClientRegistration> {
        self.0
    }
}

impl From<ClientRegistration> for ClientRegistrations {
    fn from(registration: ClientRegistration) -> Self {
        Self(vec![registration])
    }
}

impl From<ClientOptions> for ClientRegistrations {
    fn from(options: ClientOptions) -> Self {
        Self(vec![options.into()])
    }
}

impl From<Option<ClientRegistration>> for ClientRegistrations {
    fn from(registration: Option<ClientRegistration>) -> Self {
        Self(registration.into_iter().collect())
    }
}

impl From<Vec<ClientRegistration>> for ClientRegistrations {
    fn from(registrations: Vec<ClientRegistration>) -> Self {
        Self(registrations)
    }
}

impl FromIterator<ClientRegistration> for ClientRegistrations {
    fn from_iter<I: IntoIterator<Item = ClientRegistration>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ClientRegistrations {
    type Item = ClientRegistration;
    type IntoIter = std::vec::IntoIter<ClientRegistration>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
