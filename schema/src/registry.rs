//! Entity registry: dense object indices, roles and visual scales.

use std::num::NonZeroU16;

use crate::error::{SchemaError, SchemaResult};

/// Largest entity count addressable by the 10-bit absolute change-set index.
pub const MAX_ENTITIES: usize = 1024;

/// Role of a tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityRole {
    /// The distinguished player-controlled cube.
    Player,
    /// Any other simulated cube.
    Prop,
}

/// Stable 1-based object identifier.
///
/// Id `k` maps to dense snapshot index `k - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(NonZeroU16);

impl ObjectId {
    /// Id of the object at index 0.
    pub const FIRST: Self = Self(NonZeroU16::MIN);

    /// Creates an id from its raw 1-based value.
    #[must_use]
    pub const fn new(id: u16) -> Option<Self> {
        match NonZeroU16::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Id of the object stored at dense `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index + 1).ok().and_then(Self::new)
    }

    /// Raw 1-based value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Dense snapshot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

/// Visual scale applied to interpolated output, per role.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleScales {
    pub player: f32,
    pub prop: f32,
}

impl Default for RoleScales {
    fn default() -> Self {
        Self {
            player: 1.5,
            prop: 0.4,
        }
    }
}

impl RoleScales {
    /// Scale for `role`.
    #[must_use]
    pub const fn for_role(&self, role: EntityRole) -> f32 {
        match role {
            EntityRole::Player => self.player,
            EntityRole::Prop => self.prop,
        }
    }
}

/// The fixed entity table shared by encoder and receiver.
///
/// Every snapshot in a stream carries exactly [`len`](Self::len) cubes,
/// one per dense index, and roles are explicit per index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "EntityRegistryFields", into = "EntityRegistryFields")
)]
pub struct EntityRegistry {
    roles: Vec<EntityRole>,
    max_players: u16,
    scales: RoleScales,
}

impl EntityRegistry {
    /// Builds the classic table: one player cube at index 0 followed by props,
    /// `world_objects + max_players` entities in total.
    pub fn new(world_objects: usize, max_players: u16) -> SchemaResult<Self> {
        let count = world_objects.saturating_add(usize::from(max_players));
        check_count(count)?;
        let mut roles = vec![EntityRole::Prop; count];
        roles[0] = EntityRole::Player;
        Ok(Self {
            roles,
            max_players,
            scales: RoleScales::default(),
        })
    }

    /// Builds a registry from an explicit role table.
    pub fn from_roles(roles: Vec<EntityRole>, max_players: u16) -> SchemaResult<Self> {
        check_count(roles.len())?;
        Ok(Self {
            roles,
            max_players,
            scales: RoleScales::default(),
        })
    }

    /// Replaces the per-role visual scales.
    pub fn with_scales(mut self, scales: RoleScales) -> SchemaResult<Self> {
        for scale in [scales.player, scales.prop] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(SchemaError::InvalidScale { scale });
            }
        }
        self.scales = scales;
        Ok(self)
    }

    /// Number of entities, `N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Always `false` for a validated registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    #[must_use]
    pub const fn max_players(&self) -> u16 {
        self.max_players
    }

    #[must_use]
    pub const fn scales(&self) -> &RoleScales {
        &self.scales
    }

    #[must_use]
    pub fn roles(&self) -> &[EntityRole] {
        &self.roles
    }

    /// Role of the entity at dense `index`.
    #[must_use]
    pub fn role(&self, index: usize) -> Option<EntityRole> {
        self.roles.get(index).copied()
    }

    /// Visual scale of the entity at dense `index`.
    #[must_use]
    pub fn scale(&self, index: usize) -> Option<f32> {
        self.role(index).map(|role| self.scales.for_role(role))
    }

    /// Authority tag reported for objects that are not interacting.
    #[must_use]
    pub const fn authority_sentinel(&self) -> u16 {
        self.max_players
    }

    /// Iterates over `(id, role)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, EntityRole)> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter_map(|(index, role)| ObjectId::from_index(index).map(|id| (id, *role)))
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self {
            roles: {
                let mut roles = vec![EntityRole::Prop; 900 + 64];
                roles[0] = EntityRole::Player;
                roles
            },
            max_players: 64,
            scales: RoleScales::default(),
        }
    }
}

/// Serialized form of [`EntityRegistry`]; deserializing goes through
/// [`EntityRegistry::from_roles`] and [`EntityRegistry::with_scales`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct EntityRegistryFields {
    roles: Vec<EntityRole>,
    max_players: u16,
    scales: RoleScales,
}

#[cfg(feature = "serde")]
impl TryFrom<EntityRegistryFields> for EntityRegistry {
    type Error = SchemaError;

    fn try_from(fields: EntityRegistryFields) -> SchemaResult<Self> {
        Self::from_roles(fields.roles, fields.max_players)?.with_scales(fields.scales)
    }
}

#[cfg(feature = "serde")]
impl From<EntityRegistry> for EntityRegistryFields {
    fn from(registry: EntityRegistry) -> Self {
        Self {
            roles: registry.roles,
            max_players: registry.max_players,
            scales: registry.scales,
        }
    }
}

fn check_count(count: usize) -> SchemaResult<()> {
    if count == 0 {
        return Err(SchemaError::EmptyRegistry);
    }
    if count > MAX_ENTITIES {
        return Err(SchemaError::TooManyEntities {
            count,
            max: MAX_ENTITIES,
        });
    }
    Ok(())
}
