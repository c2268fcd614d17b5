//! Mock brand registration.
//!
//! Validates the form client-side, stores the brand under one well-known
//! key and redirects to the availability page. There is no server side.

use crate::page::{ids, Route};
use crate::storage::{BrandStore, StorageError};
use crate::SiteConfig;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Passwords shorter than this, in UTF-16 code units, are rejected.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Which field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidField {
    Brand,
    Email,
    Password,
}

/// A rejected form. The message is the alert shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please enter brand, valid email, and a password (min 6 chars).")]
pub struct ValidationError {
    pub field: InvalidField,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Raw form input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub brand: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn new(brand: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the fields and return the trimmed brand.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let brand = self.brand.trim();
        if brand.is_empty() {
            return Err(ValidationError {
                field: InvalidField::Brand,
            });
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError {
                field: InvalidField::Email,
            });
        }
        if self.password.trim().encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError {
                field: InvalidField::Password,
            });
        }
        Ok(brand)
    }
}

/// Quick-commerce providers offered as one-click sign-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Blinkit,
    Zepto,
    Goat,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Blinkit, Provider::Zepto, Provider::Goat];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Blinkit => "Blinkit",
            Self::Zepto => "Zepto",
            Self::Goat => "Goat",
        }
    }

    /// Id of the shortcut button on the registration page.
    pub fn button_id(&self) -> &'static str {
        match self {
            Self::Blinkit => ids::BLINKIT_BTN,
            Self::Zepto => ids::ZEPTO_BTN,
            Self::Goat => ids::GOAT_BTN,
        }
    }

    /// Placeholder brand stored by the shortcut.
    pub fn placeholder_brand(&self) -> String {
        format!("{} Brand", self.display_name())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Error)]
#[error("Unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blinkit" => Ok(Self::Blinkit),
            "zepto" => Ok(Self::Zepto),
            "goat" => Ok(Self::Goat),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Where the browser goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
}

impl Redirect {
    pub fn location(&self) -> &'static str {
        self.route.file_name()
    }
}

/// Handles form submissions and provider shortcuts.
pub struct RegistrationHandler<S> {
    store: S,
    key: String,
    target: Route,
}

impl<S: BrandStore> RegistrationHandler<S> {
    pub fn new(store: S, config: &SiteConfig) -> Self {
        Self {
            store,
            key: config.storage_key.clone(),
            target: Route::Availability,
        }
    }

    /// Validate and store the brand. A rejected form writes nothing.
    pub fn submit(&mut self, form: &RegistrationForm) -> Result<Redirect, RegistrationError> {
        let brand = match form.validate() {
            Ok(brand) => brand,
            Err(e) => {
                tracing::warn!(field = ?e.field, "Registration rejected");
                return Err(e.into());
            }
        };

        self.persist(brand)
    }

    /// One-click registration through a provider.
    pub fn shortcut(&mut self, provider: Provider) -> Result<Redirect, RegistrationError> {
        self.persist(&provider.placeholder_brand())
    }

    fn persist(&mut self, brand: &str) -> Result<Redirect, RegistrationError> {
        self.store.set_item(&self.key, brand)?;
        tracing::info!(brand, key = %self.key, "Brand registered");
        Ok(Redirect { route: self.target })
    }

    /// The brand stored by the last registration, if any.
    pub fn registered_brand(&self) -> Result<Option<String>, StorageError> {
        self.store.get_item(&self.key)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
