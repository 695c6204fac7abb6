//! Deterministic layout hashing.

use blake3::Hasher;

use crate::precision::{CubeFormat, MotionBounds, PrecisionProfile};
use crate::registry::{EntityRegistry, EntityRole};
use crate::StreamLayout;

/// Computes a deterministic 64-bit hash of a stream layout.
///
/// Covers the entity table and every parameter that changes the bit layout
/// or decoded values of a cube record. Visual scales are not hashed.
#[must_use]
pub fn layout_hash(layout: &StreamLayout) -> u64 {
    let mut hasher = Hasher::new();
    write_format(&mut hasher, &layout.format);
    write_registry(&mut hasher, &layout.registry);

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn write_format(hasher: &mut Hasher, format: &CubeFormat) {
    write_profile(hasher, format.profile());
    write_bounds(hasher, format.bounds());
    write_u8(hasher, u8::from(format.with_velocity()));
}

fn write_profile(hasher: &mut Hasher, profile: &PrecisionProfile) {
    write_i32(hasher, profile.position_units());
    write_i32(hasher, profile.velocity_units());
    write_u8(hasher, profile.orientation_bits().get());
}

fn write_bounds(hasher: &mut Hasher, bounds: &MotionBounds) {
    write_f32(hasher, bounds.position_xy);
    write_f32(hasher, bounds.position_z);
    write_f32(hasher, bounds.linear_speed);
    write_f32(hasher, bounds.angular_speed);
}

fn write_registry(hasher: &mut Hasher, registry: &EntityRegistry) {
    write_u32(hasher, registry.len() as u32);
    write_u16(hasher, registry.max_players());
    for role in registry.roles() {
        write_u8(
            hasher,
            match role {
                EntityRole::Player => 0,
                EntityRole::Prop => 1,
            },
        );
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u16(hasher: &mut Hasher, value: u16) {
    hasher.update(&value.to_le_bytes());
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_i32(hasher: &mut Hasher, value: i32) {
    hasher.update(&value.to_le_bytes());
}

fn write_f32(hasher: &mut Hasher, value: f32) {
    write_u32(hasher, value.to_bits());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RoleScales;

    fn layout(format: CubeFormat, world: usize) -> StreamLayout {
        StreamLayout::new(format, EntityRegistry::new(world, 2).unwrap()).unwrap()
    }

    #[test]
    fn hash_is_stable() {
        let a = layout(CubeFormat::standard(), 16);
        let b = layout(CubeFormat::standard(), 16);
        assert_eq!(layout_hash(&a), layout_hash(&b));
    }

    #[test]
    fn hash_changes_with_profile() {
        let standard = layout(CubeFormat::standard(), 16);
        let velocity = layout(CubeFormat::standard_with_velocity(), 16);
        let high = layout(CubeFormat::high_precision(), 16);
        assert_ne!(layout_hash(&standard), layout_hash(&velocity));
        assert_ne!(layout_hash(&velocity), layout_hash(&high));
    }

    #[test]
    fn hash_changes_with_entity_count() {
        let a = layout(CubeFormat::standard(), 16);
        let b = layout(CubeFormat::standard(), 17);
        assert_ne!(layout_hash(&a), layout_hash(&b));
    }

    #[test]
    fn hash_ignores_visual_scales() {
        let a = layout(CubeFormat::standard(), 4);
        let mut b = a.clone();
        b.registry = b
            .registry
            .with_scales(RoleScales {
                player: 2.0,
                prop: 1.0,
            })
            .unwrap();
        assert_eq!(layout_hash(&a), layout_hash(&b));
    }
}
