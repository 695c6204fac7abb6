//! Stream layout definitions for the cubesnap codec.
//!
//! This crate describes how cube state is represented on the wire:
//! - Precision profiles (fixed-point scales and quaternion bit width)
//! - Motion bounds that size the quantized integer fields
//! - The entity registry (dense indices, roles, visual scales)
//! - Deterministic layout hashing
//!
//! # Design Principles
//!
//! - **Validated construction** - Invalid bit widths, scales and entity counts
//!   are rejected when a profile, format or registry is built, never mid-stream.
//! - **One profile per stream** - A [`StreamLayout`] pins a single [`CubeFormat`].
//! - **Deterministic hashing** - The layout hash is stable given the same definition.

mod error;
mod hash;
mod layout;
mod precision;
mod registry;

pub use error::{SchemaError, SchemaResult};
pub use hash::layout_hash;
pub use layout::StreamLayout;
pub use precision::{
    BoundKind, CubeFormat, MotionBounds, OrientationBits, PrecisionProfile, QuantizedBounds,
};
pub use registry::{EntityRegistry, EntityRole, ObjectId, RoleScales, MAX_ENTITIES};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = OrientationBits::STANDARD;
        let _ = PrecisionProfile::HIGH;
        let _ = MotionBounds::default();
        let _ = EntityRole::Player;
        let layout = StreamLayout::default();
        assert_eq!(layout.hash(), layout_hash(&layout));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn layout_serde_roundtrip() {
        let layout = StreamLayout::new(
            CubeFormat::high_precision(),
            EntityRegistry::new(8, 2).unwrap(),
        )
        .unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        let back: StreamLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
        assert_eq!(back.hash(), layout.hash());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn orientation_bits_validated_on_deserialize() {
        assert!(serde_json::from_str::<OrientationBits>("9").is_ok());
        assert!(serde_json::from_str::<OrientationBits>("40").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn layout_with_invalid_parts_is_rejected() {
        let layout = StreamLayout::new(
            CubeFormat::standard(),
            EntityRegistry::new(3, 1).unwrap(),
        )
        .unwrap();
        let json = serde_json::to_string(&layout).unwrap();

        let bad_bound = json.replace("\"angular_speed\":10.0", "\"angular_speed\":-10.0");
        assert_ne!(bad_bound, json);
        assert!(serde_json::from_str::<StreamLayout>(&bad_bound).is_err());

        let no_roles = json.replace(r#"["Player","Prop","Prop","Prop"]"#, "[]");
        assert_ne!(no_roles, json);
        assert!(serde_json::from_str::<StreamLayout>(&no_roles).is_err());
    }
}
