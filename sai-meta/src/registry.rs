use std::collections::HashMap;

use crate::{AttrId, AttrMetadata, ObjectType, ValueKind};

/// Lookup of attribute metadata by `(object type, attribute id)`.
///
/// `None` means the pair is unknown, which callers treat as a malformed (or
/// version-mismatched) request.
pub trait MetadataRegistry {
    fn lookup(&self, object_type: ObjectType, attr_id: AttrId) -> Option<&AttrMetadata>;

    /// The attribute name, for diagnostics.
    fn name(&self, object_type: ObjectType, attr_id: AttrId) -> Option<&str> {
        self.lookup(object_type, attr_id).map(|md| md.name.as_str())
    }

    /// Just the value kind of the attribute.
    fn value_kind(&self, object_type: ObjectType, attr_id: AttrId) -> Option<ValueKind> {
        self.lookup(object_type, attr_id).map(|md| md.value_kind)
    }
}

impl<T> MetadataRegistry for &T
where
    T: MetadataRegistry + ?Sized,
{
    fn lookup(&self, object_type: ObjectType, attr_id: AttrId) -> Option<&AttrMetadata> {
        (**self).lookup(object_type, attr_id)
    }
}

/// An in-memory metadata registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    objects: HashMap<ObjectType, String>,
    attrs: HashMap<(ObjectType, AttrId), AttrMetadata>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object type name. Returns the previous name, if any.
    pub fn insert_object(
        &mut self,
        object_type: ObjectType,
        name: impl Into<String>,
    ) -> Option<String> {
        self.objects.insert(object_type, name.into())
    }

    /// Register an attribute. Returns the displaced entry, if any.
    pub fn insert(&mut self, md: AttrMetadata) -> Option<AttrMetadata> {
        self.attrs.insert((md.object_type, md.attr_id), md)
    }

    pub fn object_name(&self, object_type: ObjectType) -> Option<&str> {
        self.objects.get(&object_type).map(String::as_str)
    }

    /// Iterate over all attributes of an object type, in no particular order.
    pub fn attributes(&self, object_type: ObjectType) -> impl Iterator<Item = &AttrMetadata> {
        self.attrs
            .values()
            .filter(move |md| md.object_type == object_type)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl MetadataRegistry for Registry {
    fn lookup(&self, object_type: ObjectType, attr_id: AttrId) -> Option<&AttrMetadata> {
        self.attrs.get(&(object_type, attr_id))
    }
}

impl FromIterator<AttrMetadata> for Registry {
    fn from_iter<I: IntoIterator<Item = AttrMetadata>>(iter: I) -> Self {
        let mut registry = Registry::new();

        for md in iter {
            registry.insert(md);
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let registry: Registry = [
            AttrMetadata::new(ObjectType::PORT, 3, ValueKind::Uint32, "SAI_PORT_ATTR_SPEED"),
            AttrMetadata::new(ObjectType::PORT, 4, ValueKind::Bool, "SAI_PORT_ATTR_FULL_DUPLEX_MODE"),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.value_kind(ObjectType::PORT, 3),
            Some(ValueKind::Uint32)
        );
        assert_eq!(
            registry.name(ObjectType::PORT, 4),
            Some("SAI_PORT_ATTR_FULL_DUPLEX_MODE")
        );
        assert!(registry.lookup(ObjectType::PORT, 5).is_none());
        assert!(registry.lookup(ObjectType::LAG, 3).is_none());
    }

    #[test]
    fn test_insert_displaces() {
        let mut registry = Registry::new();

        assert!(registry
            .insert(AttrMetadata::new(ObjectType::SWITCH, 1, ValueKind::Mac, "A"))
            .is_none());

        let old = registry.insert(AttrMetadata::new(ObjectType::SWITCH, 1, ValueKind::Ipv4, "B"));
        assert_eq!(old.map(|md| md.name), Some("A".to_string()));
        assert_eq!(
            registry.value_kind(ObjectType::SWITCH, 1),
            Some(ValueKind::Ipv4)
        );
        assert_eq!(registry.attributes(ObjectType::SWITCH).count(), 1);
    }

    #[test]
    fn test_lookup_through_reference() {
        fn kind_of(registry: impl MetadataRegistry) -> Option<ValueKind> {
            registry.value_kind(ObjectType::QOS_MAP, 2)
        }

        let mut registry = Registry::new();
        registry.insert(AttrMetadata::new(
            ObjectType::QOS_MAP,
            2,
            ValueKind::QosMapList,
            "SAI_QOS_MAP_ATTR_MAP_TO_VALUE_LIST",
        ));

        assert_eq!(kind_of(&registry), Some(ValueKind::QosMapList));
    }
}
