// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Identifier of a configured printer.
///
/// The identifier comes from the device configuration and is unique within
/// a coordinator. Cloning is cheap: the string is shared.
///
/// # Examples
///
/// ```
/// use picaso_lib::event::DeviceId;
///
/// let id = DeviceId::new("workshop");
/// assert_eq!(id.as_str(), "workshop");
/// assert_eq!(id, DeviceId::from("workshop"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(Arc<str>);

impl DeviceId {
    /// Creates a device identifier.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({:?})", &*self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Serialize for DeviceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn equality_by_value() {
        assert_eq!(DeviceId::new("a"), DeviceId::from(String::from("a")));
        assert_ne!(DeviceId::new("a"), DeviceId::new("b"));
    }

    #[test]
    fn clones_share_storage() {
        let id = DeviceId::new("printer");
        let clone = id.clone();
        assert!(Arc::ptr_eq(&id.0, &clone.0));
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(DeviceId::new("garage"), 1);
        assert_eq!(map.get("garage"), Some(&1));
    }

    #[test]
    fn debug_and_display() {
        let id = DeviceId::new("lab");
        assert_eq!(format!("{id:?}"), "DeviceId(\"lab\")");
        assert_eq!(id.to_string(), "lab");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&DeviceId::new("lab")).unwrap();
        assert_eq!(json, "\"lab\"");
    }

    #[test]
    fn serializes_as_map_key_and_field() {
        let map = HashMap::from([(DeviceId::new("garage"), 2)]);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"garage":2}"#);

        let ids = vec![DeviceId::new("a"), DeviceId::new("b")];
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"["a","b"]"#);
    }
}
