//! Ordered, validated unit lists.

use std::collections::BTreeMap;

use sea_orm_migration::MigrationTrait;

use crate::error::{MigrationError, MigrationResult};
use crate::identity::MigrationId;

/// What a registry holds; decides the identity prefix it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Schema,
    Seed,
}

impl UnitKind {
    fn prefix(&self) -> char {
        match self {
            UnitKind::Schema => 'm',
            UnitKind::Seed => 's',
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitKind::Schema => f.write_str("migration"),
            UnitKind::Seed => f.write_str("seed"),
        }
    }
}

/// All units of one kind, sorted by identity.
pub struct Registry {
    kind: UnitKind,
    units: BTreeMap<MigrationId, Box<dyn MigrationTrait>>,
}

impl Registry {
    /// Validate identities and order the units.
    ///
    /// Fails on a malformed identity, an identity of the wrong kind, or an
    /// identity registered twice.
    pub fn new(kind: UnitKind, units: Vec<Box<dyn MigrationTrait>>) -> MigrationResult<Self> {
        let mut ordered = BTreeMap::new();

        for unit in units {
            let id = MigrationId::parse(unit.name())?;
            if !id.as_str().starts_with(kind.prefix()) {
                return Err(MigrationError::InvalidIdentity(id.to_string()));
            }
            if ordered.contains_key(&id) {
                return Err(MigrationError::DuplicateIdentity(id));
            }
            ordered.insert(id, unit);
        }

        Ok(Self {
            kind,
            units: ordered,
        })
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Identities in execution order
    pub fn identities(&self) -> Vec<MigrationId> {
        self.units.keys().cloned().collect()
    }

    pub fn get(&self, id: &MigrationId) -> Option<&dyn MigrationTrait> {
        self.units.get(id).map(|unit| unit.as_ref())
    }

    /// Resolve a user-supplied identity against the registry.
    pub fn find(&self, name: &str) -> MigrationResult<MigrationId> {
        let id = MigrationId::parse(name)?;
        if self.units.contains_key(&id) {
            Ok(id)
        } else {
            Err(MigrationError::UnknownIdentity(name.to_string()))
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("units", &self.units.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::prelude::*;

    use super::*;

    struct Named(&'static str);

    impl MigrationName for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Named {
        async fn up(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
            Ok(())
        }

        async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
            Ok(())
        }
    }

    fn boxed(names: &[&'static str]) -> Vec<Box<dyn MigrationTrait>> {
        names
            .iter()
            .map(|name| Box::new(Named(name)) as Box<dyn MigrationTrait>)
            .collect()
    }

    #[test]
    fn sorts_regardless_of_declaration_order() {
        let registry = Registry::new(
            UnitKind::Schema,
            boxed(&["m20240102_000001_b", "m20240101_000001_a"]),
        )
        .unwrap();

        let names: Vec<String> = registry.identities().iter().map(|id| id.to_string()).collect();
        assert_eq!(names, vec!["m20240101_000001_a", "m20240102_000001_b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejects_duplicates() {
        let err = Registry::new(
            UnitKind::Schema,
            boxed(&["m20240101_000001_a", "m20240101_000001_a"]),
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::DuplicateIdentity(_)));
    }

    #[test]
    fn rejects_wrong_kind() {
        let err = Registry::new(UnitKind::Seed, boxed(&["m20240101_000001_a"])).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidIdentity(_)));
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(Registry::new(UnitKind::Schema, boxed(&["create_users"])).is_err());
    }

    #[test]
    fn finds_registered_identity() {
        let registry = Registry::new(UnitKind::Seed, boxed(&["s20240101_000001_a"])).unwrap();
        assert!(registry.find("s20240101_000001_a").is_ok());
        assert!(matches!(
            registry.find("s20240101_000002_b"),
            Err(MigrationError::UnknownIdentity(_))
        ));
        assert!(matches!(
            registry.find("garbage"),
            Err(MigrationError::InvalidIdentity(_))
        ));
    }
}
