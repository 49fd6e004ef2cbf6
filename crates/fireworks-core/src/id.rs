//! Typed handles into the template catalog
//!
//! Templates (particle types, explosions, comet tails) live in an arena owned
//! by the simulation. Everything else refers to them through these handles, so
//! template graphs may contain cycles without shared ownership.

use std::fmt;

macro_rules! template_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a handle from a raw arena index
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Arena index of this handle
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

template_id!(
    /// Handle to a `ParticleType` template
    ParticleTypeId,
    "type"
);
template_id!(
    /// Handle to an `Explosion` template
    ExplosionId,
    "explosion"
);
template_id!(
    /// Handle to a `CometTail` template
    TailId,
    "tail"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let id = ParticleTypeId::from_raw(42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn test_display_and_debug() {
        assert_eq!(ExplosionId(3).to_string(), "explosion#3");
        assert_eq!(format!("{:?}", TailId(7)), "TailId(7)");
    }

    #[test]
    fn test_ordering() {
        assert!(ParticleTypeId(1) < ParticleTypeId(2));
        assert_ne!(ParticleTypeId(1), ParticleTypeId(2));
    }
}
